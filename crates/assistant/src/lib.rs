//! Forneria Assistant library.
//!
//! This crate provides the ordering-assistant service as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clients;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod models;
pub mod ports;
pub mod profiles;
pub mod routes;
pub mod services;
pub mod sessions;
pub mod state;
