pub mod api_client;
pub mod cache;
pub mod category;
pub mod clock;
pub mod command;
pub mod config;
pub mod locations;
pub mod orchestrator;
pub mod refresh;
pub mod state;
pub mod store;
pub mod sun;
