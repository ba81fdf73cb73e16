//! HTTP API: cart controller, response rendering, routing, and session wiring.

pub mod app;
pub mod config;
pub mod context;
pub mod controller;
pub mod middleware;
pub mod render;
