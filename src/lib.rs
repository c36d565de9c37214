pub mod auth;
pub mod cache;
pub mod db;
pub mod errors;
pub mod geo;
pub mod handlers;
pub mod models;
pub mod payment;
pub mod proration;

pub use db::create_pool;
