//! Application state shared across handlers.

use std::sync::Arc;

use crate::clients::{NominatimClient, RestaurantClient, ViaCepClient};
use crate::config::AssistantConfig;
use crate::knowledge::{KnowledgeBase, KnowledgeError};
use crate::ports::{GeocodeError, Geocoder, ProfileStore, RestaurantApi, RestaurantError};
use crate::profiles::FileProfileStore;
use crate::services::{ChatService, CheckoutService, DeliveryService};
use crate::sessions::SessionRegistry;

/// Error wiring up the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("geocoder client: {0}")]
    Geocoder(#[from] GeocodeError),
    #[error("restaurant client: {0}")]
    Restaurant(#[from] RestaurantError),
    #[error("viacep client: {0}")]
    ViaCep(#[from] crate::clients::ViaCepError),
    #[error("knowledge base: {0}")]
    Knowledge(#[from] KnowledgeError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the session registry and the dialogue engine.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AssistantConfig,
    sessions: SessionRegistry,
    profiles: Arc<dyn ProfileStore>,
    restaurant: Arc<dyn RestaurantApi>,
    viacep: ViaCepClient,
    chat: ChatService,
}

impl AppState {
    /// Create a new application state, building all collaborator clients
    /// from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when an HTTP client cannot be built or the knowledge
    /// base file does not parse.
    pub fn new(config: AssistantConfig) -> Result<Self, StateInitError> {
        let restaurant: Arc<dyn RestaurantApi> = Arc::new(RestaurantClient::new(
            &config.restaurant,
            config.lookup_timeout,
        )?);
        let geocoder: Arc<dyn Geocoder> =
            Arc::new(NominatimClient::new(&config.geocode, config.lookup_timeout)?);
        let viacep = ViaCepClient::new(&config.geocode, config.lookup_timeout)?;

        let knowledge = match &config.knowledge_file {
            Some(path) => KnowledgeBase::load(path)?,
            None => KnowledgeBase::default(),
        };

        let delivery = DeliveryService::new(geocoder, config.delivery.clone());
        let checkout = CheckoutService::new(Arc::clone(&restaurant), delivery.clone());
        let chat = ChatService::new(
            Arc::clone(&restaurant),
            delivery,
            checkout,
            knowledge,
            config.utc_offset_hours,
        );

        let sessions = SessionRegistry::new(config.session_idle);
        let profiles: Arc<dyn ProfileStore> = Arc::new(FileProfileStore::new(&config.profile_dir));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                profiles,
                restaurant,
                viacep,
                chat,
            }),
        })
    }

    /// Get a reference to the assistant configuration.
    #[must_use]
    pub fn config(&self) -> &AssistantConfig {
        &self.inner.config
    }

    /// Get a reference to the session registry.
    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }

    /// Get a reference to the customer-profile store.
    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileStore {
        self.inner.profiles.as_ref()
    }

    /// Get a reference to the restaurant backend client.
    #[must_use]
    pub fn restaurant(&self) -> &dyn RestaurantApi {
        self.inner.restaurant.as_ref()
    }

    /// Get a reference to the ViaCEP client.
    #[must_use]
    pub fn viacep(&self) -> &ViaCepClient {
        &self.inner.viacep
    }

    /// Get a reference to the dialogue engine.
    #[must_use]
    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }
}
