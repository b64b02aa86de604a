pub mod capability;
pub mod config;
pub mod core;
pub mod loading;
pub mod session;
pub mod sim;
