// File: src/lib.rs
pub mod client;
pub mod config;
pub mod draft;
pub mod inventory;
pub mod model;
pub mod notify;
pub mod paths;
pub mod report;
pub mod session;
pub mod tui;
