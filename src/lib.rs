pub mod api;
pub mod commands;
pub mod console;
pub mod models;
pub mod query;
pub mod session;
pub mod ui;
pub mod utils;
pub mod view;
