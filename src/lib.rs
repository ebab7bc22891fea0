pub mod audit;
pub mod brands;
pub mod console_config;
pub mod document;
pub mod editor;
pub mod errors;
pub mod gateway;
pub mod lifecycle;
pub mod logging;
pub mod mount;
pub mod profile;
