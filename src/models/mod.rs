pub mod alert;
pub mod capture;
pub mod config;
pub mod filter;
pub mod packet;
pub mod stats;
