pub mod bootstrap;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;

pub use config::Config;
pub use context::AppContext;
pub use error::BootstrapError;
