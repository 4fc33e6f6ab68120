//! HTTP API handlers

pub mod auth;
pub mod files;
pub mod health;
pub mod progress;
pub mod workflow;
