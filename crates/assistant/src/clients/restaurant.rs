//! Client for the restaurant's own back office.
//!
//! Fetches site settings and the menu (cached with `moka`, 5-minute
//! TTL), validates coupons, submits orders and reads loyalty balances.
//!
//! The intake endpoints report business failures as JSON bodies even on
//! 4xx/5xx, so coupon and order responses are parsed before the status
//! code is considered.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};

use crate::config::RestaurantApiConfig;
use crate::models::{
    CouponDiscount, DiscountKind, Menu, MenuCategory, MenuItem, OrderReceipt, OrderSubmission,
    SiteConfig,
};
use crate::ports::{CouponOutcome, OrderOutcome, RestaurantApi, RestaurantError};

const CONFIG_CACHE_KEY: &str = "site-config";
const MENU_CACHE_KEY: &str = "menu";

/// Cached back-office responses.
#[derive(Debug, Clone)]
enum CacheValue {
    Config(SiteConfig),
    Menu(Menu),
}

/// Client for the restaurant backend REST API.
#[derive(Clone)]
pub struct RestaurantClient {
    inner: Arc<RestaurantClientInner>,
}

struct RestaurantClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl RestaurantClient {
    /// Create a new back-office client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &RestaurantApiConfig, timeout: Duration) -> Result<Self, RestaurantError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(RestaurantClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, RestaurantError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RestaurantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RestaurantApi for RestaurantClient {
    #[instrument(skip(self))]
    async fn site_config(&self) -> Result<SiteConfig, RestaurantError> {
        if let Some(CacheValue::Config(config)) = self.inner.cache.get(CONFIG_CACHE_KEY).await {
            debug!("Cache hit for site config");
            return Ok(config);
        }

        let mut config: SiteConfig = self.get_json("/api/config/geral").await?;
        config.ensure_unit();

        self.inner
            .cache
            .insert(
                CONFIG_CACHE_KEY.to_owned(),
                CacheValue::Config(config.clone()),
            )
            .await;

        Ok(config)
    }

    #[instrument(skip(self))]
    async fn menu(&self) -> Result<Menu, RestaurantError> {
        if let Some(CacheValue::Menu(menu)) = self.inner.cache.get(MENU_CACHE_KEY).await {
            debug!("Cache hit for menu");
            return Ok(menu);
        }

        let payload: MenuPayload = self.get_json("/api/cardapio").await?;
        let menu = payload.into_menu();

        self.inner
            .cache
            .insert(MENU_CACHE_KEY.to_owned(), CacheValue::Menu(menu.clone()))
            .await;

        Ok(menu)
    }

    #[instrument(skip(self), fields(code = %code))]
    async fn validate_coupon(&self, code: &str) -> Result<CouponOutcome, RestaurantError> {
        let url = format!("{}/api/cupom/validar", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .json(&serde_json::json!({ "codigo": code }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<CouponResponse>(&body) {
            Ok(parsed) => Ok(parsed.into_outcome()),
            Err(err) if status.is_success() => Err(RestaurantError::Decode(err)),
            Err(_) => Err(RestaurantError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    #[instrument(skip(self, order), fields(method = %order.method, items = order.items.len()))]
    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderOutcome, RestaurantError> {
        let url = format!("{}/api/pedido/novo", self.inner.base_url);
        let response = self.inner.client.post(&url).json(order).send().await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<OrderResponse>(&body) {
            Ok(parsed) => Ok(parsed.into_outcome()),
            Err(err) if status.is_success() => Err(RestaurantError::Decode(err)),
            Err(_) => Err(RestaurantError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    #[instrument(skip(self, phone))]
    async fn loyalty_points(&self, phone: &str) -> Result<u32, RestaurantError> {
        let url = format!("{}/api/fidelidade/pontos", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RestaurantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let balance: LoyaltyResponse = response.json().await?;
        Ok(balance.pontos)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct MenuItemDto {
    #[serde(rename = "nome")]
    name: String,
    desc: Option<String>,
    #[serde(rename = "preco")]
    price: String,
    #[serde(rename = "foto")]
    photo: Option<String>,
    #[serde(rename = "visivel")]
    visible: Option<bool>,
    #[serde(rename = "esgotado")]
    sold_out: Option<bool>,
}

impl MenuItemDto {
    fn into_item(self) -> MenuItem {
        MenuItem {
            name: self.name,
            description: self.desc.unwrap_or_default(),
            price_text: self.price,
            photo: self.photo,
            visible: self.visible.unwrap_or(true),
            sold_out: self.sold_out.unwrap_or(false),
        }
    }
}

/// The menu arrives as a JSON object of category name to items, in the
/// order the back office sorts them. A plain map would lose that order.
#[derive(Debug)]
struct MenuPayload(Vec<(String, Vec<MenuItemDto>)>);

impl MenuPayload {
    fn into_menu(self) -> Menu {
        Menu {
            categories: self
                .0
                .into_iter()
                .map(|(name, items)| MenuCategory {
                    name,
                    items: items.into_iter().map(MenuItemDto::into_item).collect(),
                })
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for MenuPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MenuVisitor;

        impl<'de> serde::de::Visitor<'de> for MenuVisitor {
            type Value = MenuPayload;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of category name to menu items")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some(entry) = access.next_entry()? {
                    entries.push(entry);
                }
                Ok(MenuPayload(entries))
            }
        }

        deserializer.deserialize_map(MenuVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct CouponResponse {
    valid: bool,
    codigo: Option<String>,
    tipo: Option<DiscountKind>,
    valor: Option<Decimal>,
    message: Option<String>,
}

impl CouponResponse {
    fn into_outcome(self) -> CouponOutcome {
        let discount = match (self.codigo, self.tipo, self.valor) {
            (Some(code), Some(kind), Some(value)) => Some(CouponDiscount { code, kind, value }),
            _ => None,
        };

        match discount {
            Some(discount) if self.valid => CouponOutcome::Valid(discount),
            _ => CouponOutcome::Invalid {
                message: self
                    .message
                    .unwrap_or_else(|| "Cupom inválido ou expirado.".to_owned()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    success: bool,
    order_id: Option<i64>,
    order_link: Option<String>,
    message: Option<String>,
}

impl OrderResponse {
    fn into_outcome(self) -> OrderOutcome {
        match (self.success, self.order_id) {
            (true, Some(order_id)) => OrderOutcome::Accepted(OrderReceipt {
                order_id,
                order_link: self.order_link,
            }),
            _ => OrderOutcome::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| "Tente novamente.".to_owned()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoyaltyResponse {
    pontos: u32,
}
