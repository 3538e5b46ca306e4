//! Database models, one file per table.

pub mod gym;
pub mod gym_settings;
pub mod profile;

pub use self::gym::*;
pub use self::gym_settings::*;
pub use self::profile::*;
