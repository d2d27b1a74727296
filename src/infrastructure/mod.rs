pub mod config;
pub mod encoder;
pub mod http;
pub mod repositories;
pub mod workdir;
