pub mod gym;
pub mod gym_settings;
pub mod profile;

pub use gym::GymRepository;
pub use gym_settings::GymSettingsRepository;
pub use profile::ProfileRepository;
