//! Chat-session route handlers.
//!
//! Sessions live in the in-memory registry and are driven one message at a
//! time. Each session sits behind its own async mutex; `message` takes it
//! with `try_lock`, so a message that lands while the previous answer is
//! still being produced gets the busy line instead of interleaving two
//! conversations in one session.

use axum::{
    Json,
    extract::{Path, State},
};
use forneria_core::{DeviceId, SessionId};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::{AppError, Result};
use crate::models::{Cart, CartLine, Reply};
use crate::services::BUSY_REPLY;
use crate::sessions::SharedSession;
use crate::state::AppState;

/// Request to start a chat session.
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Device token the widget persisted on an earlier visit.
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Response from starting a chat session.
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: SessionId,
    /// Echoed (or freshly minted) token the widget should persist.
    pub device_id: DeviceId,
    /// Persona name for the widget header.
    pub assistant_name: String,
    pub replies: Vec<Reply>,
}

/// Replies produced by a session operation.
#[derive(Debug, Serialize)]
pub struct RepliesResponse {
    pub replies: Vec<Reply>,
}

/// Cart contents for the widget's cart pane.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    /// Formatted subtotal, e.g. `R$ 59,90`.
    pub subtotal: String,
    pub item_count: usize,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            subtotal: cart.subtotal().display_brl(),
            item_count: cart.len(),
        }
    }
}

/// Start a new chat session.
///
/// POST /api/session
#[instrument(skip_all)]
pub async fn start(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Json<StartSessionResponse> {
    let device = req
        .device_id
        .map_or_else(DeviceId::generate, DeviceId::from_token);

    let shared = state.sessions().create(device.clone()).await;
    let session_id = shared.lock().await.id;

    let greeting = state.chat().start_session().await;

    Json(StartSessionResponse {
        session_id,
        device_id: device,
        assistant_name: greeting.assistant_name.to_owned(),
        replies: greeting.replies,
    })
}

/// Request carrying one user chat message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Route one user message through the conversation engine.
///
/// POST /api/session/{id}/message
///
/// # Errors
///
/// Returns `404` for an unknown or expired session.
#[instrument(skip_all, fields(session = %id))]
pub async fn message(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<RepliesResponse>> {
    let shared = session_or_404(&state, id).await?;

    let Ok(mut session) = shared.try_lock() else {
        return Ok(Json(RepliesResponse {
            replies: vec![Reply::text(BUSY_REPLY)],
        }));
    };

    let mut profile = state.profiles().load(&session.device).await?;
    let replies = state
        .chat()
        .handle_message(&mut session, &mut profile, &req.text)
        .await;

    // The replies are already committed to the session; a failed profile
    // write must not swallow them.
    if let Err(err) = state.profiles().save(&session.device, &profile).await {
        warn!(error = %err, "Failed to persist profile after message");
    }

    Ok(Json(RepliesResponse { replies }))
}

/// Fetch the cart for a session.
///
/// GET /api/session/{id}/cart
///
/// # Errors
///
/// Returns `404` for an unknown or expired session.
pub async fn show_cart(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<CartView>> {
    let shared = session_or_404(&state, id).await?;
    let session = shared.lock().await;

    Ok(Json(CartView::from(&session.cart)))
}

/// Request to add a menu item to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub name: String,
    /// Display price as shown on the menu, e.g. `R$ 59,90`.
    pub price: String,
}

/// Replies plus the refreshed cart.
#[derive(Debug, Serialize)]
pub struct CartUpdateResponse {
    pub replies: Vec<Reply>,
    pub cart: CartView,
}

/// Add a menu item to the cart.
///
/// POST /api/session/{id}/cart/add
///
/// # Errors
///
/// Returns `404` for an unknown or expired session.
#[instrument(skip_all, fields(session = %id, item = %req.name))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<CartUpdateResponse>> {
    let shared = session_or_404(&state, id).await?;
    let mut session = shared.lock().await;

    let replies = state.chat().add_item(&mut session, &req.name, &req.price);

    Ok(Json(CartUpdateResponse {
        replies,
        cart: CartView::from(&session.cart),
    }))
}

/// Request to remove a cart line.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    /// Zero-based index into the cart lines.
    pub index: usize,
}

/// Remove a cart line by index. Out-of-range indexes leave the cart as is.
///
/// POST /api/session/{id}/cart/remove
///
/// # Errors
///
/// Returns `404` for an unknown or expired session.
#[instrument(skip_all, fields(session = %id, index = req.index))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<RemoveFromCartRequest>,
) -> Result<Json<CartUpdateResponse>> {
    let shared = session_or_404(&state, id).await?;
    let mut session = shared.lock().await;

    let replies = state.chat().remove_item(&mut session, req.index);

    Ok(Json(CartUpdateResponse {
        replies,
        cart: CartView::from(&session.cart),
    }))
}

/// Start the checkout funnel, the same entry the "finalizar" message uses.
///
/// POST /api/session/{id}/checkout
///
/// # Errors
///
/// Returns `404` for an unknown or expired session.
#[instrument(skip_all, fields(session = %id))]
pub async fn begin_checkout(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<RepliesResponse>> {
    let shared = session_or_404(&state, id).await?;
    let mut session = shared.lock().await;

    Ok(Json(RepliesResponse {
        replies: state.chat().begin_checkout(&mut session),
    }))
}

async fn session_or_404(state: &AppState, id: SessionId) -> Result<SharedSession> {
    state
        .sessions()
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))
}
