pub mod action;
pub mod api;
pub mod app;
pub mod articles;
pub mod config;
pub mod effects;
pub mod error;
pub mod modal;
pub mod notify;
pub mod theme;
pub mod tui;
