//! Outfit recommendation API
//!
//! Keeps a closet and style preferences per user and builds outfit
//! suggestions from them with an LLM, current trends and shopping links.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
