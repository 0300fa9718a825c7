pub mod audit;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod llm;
pub mod logging;
pub mod output;
pub mod pro;
pub mod profile;
pub mod scoring;
pub mod server;
