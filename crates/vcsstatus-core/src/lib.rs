pub mod aggregate;
pub mod client;
pub mod config;
pub mod daemon;
pub mod handler;
pub mod inspect;
pub mod palette;
pub mod protocol;
pub mod render;
pub mod resolve;
pub mod schema;
pub mod service;
pub mod types;
