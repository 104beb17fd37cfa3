pub mod api_connection;
pub mod catalog;
pub mod cli;
pub mod nav;
pub mod orchestrator;
pub mod session;
