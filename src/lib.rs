pub mod api;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod engine;
pub mod fixtures;
pub mod http;
pub mod stub;
pub mod version;
