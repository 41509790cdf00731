pub mod apis;
pub mod commands;
pub mod utilities;
