pub mod http;
pub mod models;
pub mod store;
