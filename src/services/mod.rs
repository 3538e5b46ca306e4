pub mod init;
pub mod reconcile;
pub mod settings;
pub mod settings_form;
pub mod store;
