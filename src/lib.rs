pub mod backend;
pub mod cli;
pub mod config;
pub mod models;
pub mod services;
