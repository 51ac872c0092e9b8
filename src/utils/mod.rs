pub mod constants;
pub mod config_loader;
pub mod logging;
pub mod io;
