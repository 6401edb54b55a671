// ABOUTME: Library crate for Churn Desk exposing the streaming consumer, exporter and TUI for testing

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod export;
pub mod models;
pub mod streaming;
