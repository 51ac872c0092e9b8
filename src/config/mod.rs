pub mod settings;
pub mod service;
pub mod credentials;
pub mod proc_loader;
pub mod proc_initiator;
pub mod proc_validator;
