pub mod api;
pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod models;
pub mod scope;
pub mod seed;
pub mod store;

pub use app::Crm;
pub use db::Database;
