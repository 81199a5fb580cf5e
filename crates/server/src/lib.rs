pub mod auth;
pub mod config;
pub mod metrics;
pub mod middleware;
pub mod rest;
pub mod service;
pub mod store;
