//! Core types for Forneria.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cep;
pub mod id;
pub mod money;
pub mod phone;

pub use cep::{Cep, CepError};
pub use id::*;
pub use money::{Money, MoneyError};
pub use phone::{Phone, PhoneError};
