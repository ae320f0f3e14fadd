//! TapCard: digital business cards backed by a relational store.
//!
//! Users get one public profile with ordered links, can claim a verified NFC
//! tag, and can mint short-lived QR tokens that resolve to their profile.

pub mod app;
pub mod auth;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod migrations;
pub mod models;
pub mod openapi;
pub mod routing;
pub mod services;
pub mod testing;

pub use app::App;
pub use config::Config;
pub use error::AppError;
pub use testing::{TestApp, TestClient, TestResponse};
