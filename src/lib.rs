// Admin session lifecycle and security utilities for the agency console
pub mod auth;
pub mod config;
pub mod models;
pub mod security;
pub mod session;
pub mod storage;
