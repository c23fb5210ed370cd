//! Shared fakes for the scenario tests.
//!
//! The engine sees its collaborators only through the traits in
//! `forneria_assistant::ports`, so these in-memory stand-ins replace the
//! restaurant back office and the geocoder. Distances are produced by
//! placing the resolved point due north of the single test unit.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use forneria_core::{Coordinates, DeviceId};

use forneria_assistant::knowledge::KnowledgeBase;
use forneria_assistant::models::{
    ChatSession, CheckoutStage, CouponDiscount, CustomerProfile, DeliveryUnit, Menu, MenuCategory,
    MenuItem, OrderReceipt, OrderSubmission, Reply, SiteConfig, VoiceGender,
};
use forneria_assistant::ports::{
    CouponOutcome, GeocodeError, Geocoder, OrderOutcome, ResolvedLocation, RestaurantApi,
    RestaurantError,
};
use forneria_assistant::services::{ChatService, CheckoutService, DeliveryService};

use forneria_assistant::config::DeliveryConfig;
use forneria_core::Money;

/// The single test unit sits at Praça da Sé.
pub const UNIT_LAT: f64 = -23.5505;
pub const UNIT_LON: f64 = -46.6333;

/// A point close to `km` kilometers due north of the test unit.
///
/// One degree of latitude spans `R * pi / 180` kilometers, so moving only
/// in latitude keeps the haversine distance equal to the offset.
pub fn point_at_km(km: f64) -> Coordinates {
    let degrees = km / (6371.0 * std::f64::consts::PI / 180.0);
    Coordinates::new(UNIT_LAT + degrees, UNIT_LON)
}

pub fn test_site() -> SiteConfig {
    SiteConfig {
        store_name: "Pizzaria Colonial".to_owned(),
        wait_estimate: "40-50 min".to_owned(),
        voice: VoiceGender::Female,
        units: vec![DeliveryUnit {
            name: "Unidade Centro".to_owned(),
            lat: UNIT_LAT,
            lon: UNIT_LON,
            address: "Praça da Sé, 100 - Centro".to_owned(),
            phone: "5511999990000".to_owned(),
        }],
    }
}

fn menu_item(name: &str, price: &str) -> MenuItem {
    MenuItem {
        name: name.to_owned(),
        description: String::new(),
        price_text: price.to_owned(),
        photo: None,
        visible: true,
        sold_out: false,
    }
}

pub fn test_menu() -> Menu {
    Menu {
        categories: vec![
            MenuCategory {
                name: "Pizzas Salgadas".to_owned(),
                items: vec![
                    menu_item("Pizza Calabresa", "R$ 49,90"),
                    menu_item("Pizza Portuguesa", "R$ 54,90"),
                ],
            },
            MenuCategory {
                name: "Churrasco".to_owned(),
                items: vec![menu_item("Espeto de Alcatra", "R$ 12,00")],
            },
            MenuCategory {
                name: "Bebidas".to_owned(),
                items: vec![menu_item("Coca-Cola 2L", "R$ 14,00")],
            },
        ],
    }
}

/// Radius and fees the scenarios assume: 6 km, R$ 3,00 + R$ 1,50/km.
pub fn delivery_config() -> DeliveryConfig {
    DeliveryConfig {
        radius_km: 6.0,
        fee_base: Money::from_cents(300),
        fee_per_km: Money::from_cents(150),
    }
}

// ============================================================================
// Fake collaborators
// ============================================================================

/// In-memory restaurant back office. Records every submitted order.
pub struct FakeRestaurant {
    pub site: SiteConfig,
    pub menu: Menu,
    /// `Some` makes any coupon code valid with this discount.
    pub coupon: Option<CouponDiscount>,
    /// `Some` makes the back office refuse orders with this message.
    pub reject_message: Option<String>,
    /// Simulates the order endpoint being unreachable. Flippable so a
    /// scenario can fail once and then let the retry through.
    pub fail_submission: AtomicBool,
    pub loyalty: u32,
    pub submissions: Mutex<Vec<OrderSubmission>>,
}

impl FakeRestaurant {
    pub fn new() -> Self {
        Self {
            site: test_site(),
            menu: test_menu(),
            coupon: None,
            reject_message: None,
            fail_submission: AtomicBool::new(false),
            loyalty: 0,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn set_submission_failure(&self, fail: bool) {
        self.fail_submission.store(fail, Ordering::SeqCst);
    }
}

impl Default for FakeRestaurant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestaurantApi for FakeRestaurant {
    async fn site_config(&self) -> Result<SiteConfig, RestaurantError> {
        Ok(self.site.clone())
    }

    async fn menu(&self) -> Result<Menu, RestaurantError> {
        Ok(self.menu.clone())
    }

    async fn validate_coupon(&self, _code: &str) -> Result<CouponOutcome, RestaurantError> {
        match &self.coupon {
            Some(discount) => Ok(CouponOutcome::Valid(discount.clone())),
            None => Ok(CouponOutcome::Invalid {
                message: "Cupom inválido ou expirado.".to_owned(),
            }),
        }
    }

    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderOutcome, RestaurantError> {
        if self.fail_submission.load(Ordering::SeqCst) {
            return Err(RestaurantError::Api {
                status: 503,
                message: "order intake offline".to_owned(),
            });
        }

        self.submissions
            .lock()
            .expect("submissions lock")
            .push(order.clone());

        if let Some(message) = &self.reject_message {
            return Ok(OrderOutcome::Rejected {
                message: message.clone(),
            });
        }

        Ok(OrderOutcome::Accepted(OrderReceipt {
            order_id: 4242,
            order_link: Some("https://forneria.test/pedido/4242".to_owned()),
        }))
    }

    async fn loyalty_points(&self, _phone: &str) -> Result<u32, RestaurantError> {
        Ok(self.loyalty)
    }
}

/// Geocoder that always answers with the configured locations.
pub struct FixedGeocoder {
    pub cep_hit: Option<ResolvedLocation>,
    pub street_hit: Option<ResolvedLocation>,
    /// Simulates the geocoding service being down.
    pub fail: bool,
}

impl FixedGeocoder {
    /// Resolves nothing at all.
    pub fn empty() -> Self {
        Self {
            cep_hit: None,
            street_hit: None,
            fail: false,
        }
    }

    /// Resolves any CEP to a street `km` kilometers from the unit.
    pub fn cep_at_km(km: f64) -> Self {
        Self {
            cep_hit: Some(ResolvedLocation {
                coordinates: point_at_km(km),
                road: Some("Avenida Paulista".to_owned()),
                suburb: Some("Bela Vista".to_owned()),
            }),
            street_hit: None,
            fail: false,
        }
    }

    /// Resolves any street search to a point `km` kilometers from the unit.
    pub fn street_at_km(km: f64) -> Self {
        Self {
            cep_hit: None,
            street_hit: Some(ResolvedLocation {
                coordinates: point_at_km(km),
                road: Some("Rua Augusta".to_owned()),
                suburb: Some("Consolação".to_owned()),
            }),
            fail: false,
        }
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn locate_cep(&self, _cep: &str) -> Result<Option<ResolvedLocation>, GeocodeError> {
        if self.fail {
            return Err(GeocodeError::Status(503));
        }
        Ok(self.cep_hit.clone())
    }

    async fn search_street(&self, _text: &str) -> Result<Option<ResolvedLocation>, GeocodeError> {
        if self.fail {
            return Err(GeocodeError::Status(503));
        }
        Ok(self.street_hit.clone())
    }
}

// ============================================================================
// Scenario harness
// ============================================================================

/// One conversation wired to the fakes, ready to receive messages.
pub struct Scenario {
    pub restaurant: Arc<FakeRestaurant>,
    pub chat: ChatService,
    pub session: ChatSession,
    pub profile: CustomerProfile,
}

impl Scenario {
    pub fn with(restaurant: FakeRestaurant, geocoder: FixedGeocoder) -> Self {
        let restaurant = Arc::new(restaurant);
        let api: Arc<dyn RestaurantApi> = Arc::clone(&restaurant) as Arc<dyn RestaurantApi>;

        let delivery = DeliveryService::new(Arc::new(geocoder), delivery_config());
        let checkout = CheckoutService::new(Arc::clone(&api), delivery.clone());
        let chat = ChatService::new(api, delivery, checkout, KnowledgeBase::default(), -3);

        Self {
            restaurant,
            chat,
            session: ChatSession::new(DeviceId::generate()),
            profile: CustomerProfile::default(),
        }
    }

    /// A conversation whose CEP lookups land `km` kilometers from the unit.
    pub fn delivering_at(km: f64) -> Self {
        Self::with(FakeRestaurant::new(), FixedGeocoder::cep_at_km(km))
    }

    pub async fn say(&mut self, text: &str) -> Vec<Reply> {
        self.chat
            .handle_message(&mut self.session, &mut self.profile, text)
            .await
    }

    pub fn add_to_cart(&mut self, name: &str, price: &str) -> Vec<Reply> {
        self.chat.add_item(&mut self.session, name, price)
    }

    pub fn stage(&self) -> Option<CheckoutStage> {
        self.session.checkout.as_ref().map(|flow| flow.stage)
    }

    pub fn submissions(&self) -> Vec<OrderSubmission> {
        self.restaurant
            .submissions
            .lock()
            .expect("submissions lock")
            .clone()
    }
}

/// All reply texts joined, for substring assertions.
pub fn text_of(replies: &[Reply]) -> String {
    replies
        .iter()
        .map(|reply| reply.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
