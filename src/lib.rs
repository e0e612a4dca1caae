pub mod config;

pub mod database;
pub mod server;
pub mod services;
