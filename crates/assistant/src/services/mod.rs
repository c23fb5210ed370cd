//! Conversation services.
//!
//! [`ChatService`] owns the free-text dispatch, [`CheckoutService`] runs the
//! order funnel inside a session and [`DeliveryService`] turns addresses into
//! distances and fees. All three see collaborators only through the traits in
//! [`crate::ports`].

pub mod chat;
pub mod checkout;
pub mod delivery;

pub use chat::{BUSY_REPLY, ChatService, SessionGreeting};
pub use checkout::CheckoutService;
pub use delivery::{DeliveryAssessment, DeliveryService};

use tracing::warn;

use crate::models::SiteConfig;
use crate::ports::RestaurantApi;

/// Current site settings, falling back to the built-in defaults when the
/// back office cannot be reached. The conversation keeps going either way.
pub(crate) async fn site_settings(restaurant: &dyn RestaurantApi) -> SiteConfig {
    match restaurant.site_config().await {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "Falling back to default site settings");
            SiteConfig::fallback()
        }
    }
}
