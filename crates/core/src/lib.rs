//! Forneria Core - Shared domain types.
//!
//! This crate provides common types used across all Forneria components:
//! - `assistant` - Headless ordering-assistant service backing the chat widget
//! - `cli` - Command-line tools for exercising the assistant
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, CEPs and phones
//! - [`geo`] - Coordinates and great-circle distance
//! - [`hours`] - Store opening schedule
//! - [`masks`] - Brazilian document and phone input masks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod geo;
pub mod hours;
pub mod masks;
pub mod types;

pub use geo::{Coordinates, haversine_km};
pub use hours::{StoreHours, StoreStatus};
pub use types::*;
