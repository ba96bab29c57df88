pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod quota;
pub mod render;
pub mod report;
pub mod util;
