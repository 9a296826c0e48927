pub mod config;
pub mod data;
pub mod error;
pub mod flow;
pub mod render;
pub mod utils;
