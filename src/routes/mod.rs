//! Page route handlers

pub mod monitor;
