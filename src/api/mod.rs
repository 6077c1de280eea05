pub mod client;
pub mod routes;

pub use client::{ApiClient, Payload, RequestOptions};
