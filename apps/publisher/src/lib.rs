pub mod config;
pub mod errors;
pub mod evaluator;
pub mod hub_client;
pub mod models;
pub mod publish;
