//! Traits the conversation engine talks through.
//!
//! The engine never holds a concrete HTTP client or filesystem handle;
//! it sees these traits. Production wires in the clients from
//! [`crate::clients`] and the file store from [`crate::profiles`],
//! tests substitute in-memory fakes.

use async_trait::async_trait;
use forneria_core::{Coordinates, DeviceId};
use thiserror::Error;

use crate::models::{
    CouponDiscount, CustomerProfile, Menu, OrderReceipt, OrderSubmission, SiteConfig,
};

// ====== Geocoding ======

/// A point found by the geocoder, with whatever address parts it knows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub road: Option<String>,
    pub suburb: Option<String>,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding service returned status {0}")]
    Status(u16),
}

/// Resolves Brazilian addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up an 8-digit CEP. `Ok(None)` when the CEP is unknown.
    async fn locate_cep(&self, cep: &str) -> Result<Option<ResolvedLocation>, GeocodeError>;

    /// Searches by street or neighbourhood name. `Ok(None)` when nothing
    /// nearby matches.
    async fn search_street(&self, text: &str) -> Result<Option<ResolvedLocation>, GeocodeError>;
}

// ====== Restaurant back office ======

#[derive(Debug, Error)]
pub enum RestaurantError {
    #[error("restaurant API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("restaurant API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("restaurant API sent an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What the back office said about a coupon code.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponOutcome {
    Valid(CouponDiscount),
    Invalid { message: String },
}

/// What the back office said about a submitted order.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Accepted(OrderReceipt),
    Rejected { message: String },
}

/// The restaurant's own API: menu, settings, coupons, orders, loyalty.
#[async_trait]
pub trait RestaurantApi: Send + Sync {
    async fn site_config(&self) -> Result<SiteConfig, RestaurantError>;

    async fn menu(&self) -> Result<Menu, RestaurantError>;

    async fn validate_coupon(&self, code: &str) -> Result<CouponOutcome, RestaurantError>;

    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderOutcome, RestaurantError>;

    /// Loyalty points accumulated by a phone number.
    async fn loyalty_points(&self, phone: &str) -> Result<u32, RestaurantError>;
}

// ====== Customer profiles ======

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile data is corrupt: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Persists what the assistant remembers about each device.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads the profile for a device, empty when none was saved yet.
    async fn load(&self, device: &DeviceId) -> Result<CustomerProfile, ProfileError>;

    async fn save(&self, device: &DeviceId, profile: &CustomerProfile)
    -> Result<(), ProfileError>;
}
