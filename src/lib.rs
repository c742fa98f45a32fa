pub mod app;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod validation;

pub use app::app;
pub use state::AppState;
