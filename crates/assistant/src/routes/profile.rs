//! Customer-profile route handlers.
//!
//! Profiles are keyed by the device token the widget persists, so they
//! survive sessions and browser restarts.

use axum::{
    Json,
    extract::{Path, State},
};
use forneria_core::DeviceId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::models::{CustomerProfile, FavoriteItem};
use crate::state::AppState;

/// Fetch the profile stored for a device.
///
/// GET /api/profile/{device}
///
/// Unknown devices get an empty profile rather than a 404; a first visit
/// and a returning visit look the same to the widget.
///
/// # Errors
///
/// Returns `500` when the profile store cannot be read.
pub async fn show(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> Result<Json<CustomerProfile>> {
    let device = DeviceId::from_token(device);
    let profile = state.profiles().load(&device).await?;

    Ok(Json(profile))
}

/// Response from toggling a favorite.
#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    /// Whether the item is a favorite after the toggle.
    pub favorite: bool,
    pub favorites: Vec<FavoriteItem>,
}

/// Star or unstar a menu item.
///
/// POST /api/profile/{device}/favorites/toggle
///
/// # Errors
///
/// Returns `500` when the profile store cannot be read or written.
#[instrument(skip_all, fields(item = %item.name))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(device): Path<String>,
    Json(item): Json<FavoriteItem>,
) -> Result<Json<ToggleFavoriteResponse>> {
    let device = DeviceId::from_token(device);
    let mut profile = state.profiles().load(&device).await?;

    let favorite = profile.toggle_favorite(item);
    state.profiles().save(&device, &profile).await?;

    Ok(Json(ToggleFavoriteResponse {
        favorite,
        favorites: profile.favorites,
    }))
}

/// Widget preference updates. Absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct PreferencesRequest {
    #[serde(default)]
    pub sound_muted: Option<bool>,
    #[serde(default)]
    pub welcome_played: Option<bool>,
}

/// Update widget preferences for a device.
///
/// POST /api/profile/{device}/preferences
///
/// # Errors
///
/// Returns `500` when the profile store cannot be read or written.
pub async fn update_preferences(
    State(state): State<AppState>,
    Path(device): Path<String>,
    Json(req): Json<PreferencesRequest>,
) -> Result<Json<CustomerProfile>> {
    let device = DeviceId::from_token(device);
    let mut profile = state.profiles().load(&device).await?;

    if let Some(muted) = req.sound_muted {
        profile.sound_muted = muted;
    }
    if let Some(played) = req.welcome_played {
        profile.welcome_played = played;
    }

    state.profiles().save(&device, &profile).await?;

    Ok(Json(profile))
}
