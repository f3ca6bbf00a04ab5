pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod display;
pub mod pipeline;
pub mod providers;
pub mod server;
