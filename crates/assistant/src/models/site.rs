use forneria_core::{Coordinates, haversine_km};
use serde::Deserialize;

/// A restaurant location able to take orders.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeliveryUnit {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub address: String,
    /// WhatsApp number in international digits, e.g. `5511999999999`.
    pub phone: String,
}

impl DeliveryUnit {
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }

    /// `wa.me` link that opens a chat with `message` pre-filled.
    #[must_use]
    pub fn whatsapp_link(&self, message: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.phone,
            urlencoding::encode(message)
        )
    }
}

/// Which persona voices the assistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    #[default]
    Female,
    Male,
}

impl VoiceGender {
    /// Name the assistant introduces itself with.
    #[must_use]
    pub const fn assistant_name(self) -> &'static str {
        match self {
            Self::Female => "Val",
            Self::Male => "Giovani",
        }
    }

    /// Name with the article, as used in the welcome line.
    #[must_use]
    pub const fn introduction(self) -> &'static str {
        match self {
            Self::Female => "a Val",
            Self::Male => "o Giovani",
        }
    }
}

/// Site-wide settings maintained in the back office.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_store_name", rename = "nome_fantasia")]
    pub store_name: String,
    /// Average wait shown in the greeting, e.g. `40-50 min`.
    #[serde(default = "default_wait_estimate", rename = "tempo_espera")]
    pub wait_estimate: String,
    #[serde(default, rename = "voice_gender")]
    pub voice: VoiceGender,
    #[serde(default)]
    pub units: Vec<DeliveryUnit>,
}

impl SiteConfig {
    /// Replaces an empty unit list with the single default location.
    pub fn ensure_unit(&mut self) {
        if self.units.is_empty() {
            self.units.push(DeliveryUnit {
                name: "Unidade Principal".to_owned(),
                lat: -23.5505,
                lon: -46.6333,
                address: "Endereço não configurado".to_owned(),
                phone: "5511999999999".to_owned(),
            });
        }
    }

    /// Settings used when the back office cannot be reached.
    #[must_use]
    pub fn fallback() -> Self {
        let mut config = Self::default();
        config.ensure_unit();
        config
    }

    /// Unit used when no delivery distance has been computed yet.
    #[must_use]
    pub fn primary_unit(&self) -> Option<&DeliveryUnit> {
        self.units.first()
    }

    /// Unit closest to `point`, with the distance in km.
    #[must_use]
    pub fn nearest_unit(&self, point: Coordinates) -> Option<(&DeliveryUnit, f64)> {
        self.units
            .iter()
            .map(|unit| (unit, haversine_km(point, unit.coordinates())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            store_name: default_store_name(),
            wait_estimate: default_wait_estimate(),
            voice: VoiceGender::default(),
            units: Vec::new(),
        }
    }
}

fn default_store_name() -> String {
    "Pizzaria Colonial".to_owned()
}

fn default_wait_estimate() -> String {
    "40-50 min".to_owned()
}
