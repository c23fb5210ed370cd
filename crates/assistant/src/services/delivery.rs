//! Delivery range and fee assessment.
//!
//! An address (CEP or free text) is geocoded, matched against the nearest
//! configured unit and priced. The nearest unit is recomputed on every
//! assessment; only the geocoder itself may cache.

use std::sync::Arc;

use forneria_core::Money;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::config::DeliveryConfig;
use crate::models::{DeliveryUnit, SiteConfig};
use crate::ports::{GeocodeError, Geocoder, ResolvedLocation};

/// Outcome of geocoding an address against the configured units.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAssessment {
    /// The unit closest to the resolved point.
    pub unit: DeliveryUnit,
    pub distance_km: f64,
    /// Fee for that distance, regardless of range.
    pub fee: Money,
    /// Whether the distance falls inside the delivery radius.
    pub in_range: bool,
    pub road: Option<String>,
    pub suburb: Option<String>,
}

/// Computes whether and for how much the store delivers to an address.
#[derive(Clone)]
pub struct DeliveryService {
    geocoder: Arc<dyn Geocoder>,
    config: DeliveryConfig,
}

impl DeliveryService {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: DeliveryConfig) -> Self {
        Self { geocoder, config }
    }

    /// Flat base plus a per-kilometer rate, rounded to centavos.
    #[must_use]
    pub fn fee_for(&self, distance_km: f64) -> Money {
        let km = Decimal::try_from(distance_km).unwrap_or_default();
        let variable = self.config.fee_per_km.amount() * km;
        Money::new((self.config.fee_base.amount() + variable).round_dp(2))
    }

    /// The radius as shown in chat messages, without a trailing `.0`.
    #[must_use]
    pub fn radius_label(&self) -> String {
        if self.config.radius_km.fract().abs() < f64::EPSILON {
            format!("{}", self.config.radius_km as i64)
        } else {
            format!("{}", self.config.radius_km)
        }
    }

    /// Assess delivery to a CEP. `Ok(None)` when the geocoder does not know
    /// the code.
    #[instrument(skip(self, site))]
    pub async fn assess_cep(
        &self,
        cep: &str,
        site: &SiteConfig,
    ) -> Result<Option<DeliveryAssessment>, GeocodeError> {
        let location = self.geocoder.locate_cep(cep).await?;
        Ok(location.and_then(|loc| self.assess(loc, site)))
    }

    /// Assess delivery to a street or neighbourhood name.
    #[instrument(skip(self, site))]
    pub async fn assess_street(
        &self,
        text: &str,
        site: &SiteConfig,
    ) -> Result<Option<DeliveryAssessment>, GeocodeError> {
        let location = self.geocoder.search_street(text).await?;
        Ok(location.and_then(|loc| self.assess(loc, site)))
    }

    fn assess(&self, location: ResolvedLocation, site: &SiteConfig) -> Option<DeliveryAssessment> {
        let (unit, distance_km) = site.nearest_unit(location.coordinates)?;

        Some(DeliveryAssessment {
            unit: unit.clone(),
            distance_km,
            fee: self.fee_for(distance_km),
            in_range: distance_km <= self.config.radius_km,
            road: location.road,
            suburb: location.suburb,
        })
    }
}
