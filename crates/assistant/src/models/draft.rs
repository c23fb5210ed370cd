use forneria_core::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentMethod {
    Delivery,
    Pickup,
}

impl FulfillmentMethod {
    /// Label used in order payloads and WhatsApp messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivery => "Entrega",
            Self::Pickup => "Retirada",
        }
    }
}

/// How the customer pays on handover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Card,
    Cash,
    Pix,
}

impl PaymentMethod {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Cartão (Levamos maquininha)",
            Self::Cash => "Dinheiro",
            Self::Pix => "Pix (Chave na entrega ou QR Code)",
        }
    }
}

/// Whether a coupon takes a flat amount or a percentage off the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountKind {
    #[serde(rename = "fixo")]
    Fixed,
    #[serde(rename = "porcentagem")]
    Percentage,
}

/// A coupon accepted by the back office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponDiscount {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "tipo")]
    pub kind: DiscountKind,
    #[serde(rename = "valor")]
    pub value: Decimal,
}

impl CouponDiscount {
    /// Amount this coupon takes off `total`.
    #[must_use]
    pub fn amount_off(&self, total: Money) -> Money {
        match self.kind {
            DiscountKind::Fixed => Money::new(self.value),
            DiscountKind::Percentage => total.percentage(self.value),
        }
    }
}

/// Everything collected during checkout, filled in step by step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub method: Option<FulfillmentMethod>,
    pub customer_name: String,
    pub phone: String,
    /// CEP as typed, or `Não informado` when the address came from a
    /// street-name search.
    pub cep: String,
    pub street: String,
    pub address_number: String,
    pub distance_km: Option<f64>,
    pub delivery_fee: Money,
    pub coupon: Option<CouponDiscount>,
    pub payment: Option<PaymentMethod>,
    /// `Sem troco` or the bill the customer will pay with.
    pub change_for: String,
    pub notes: String,
}

impl OrderDraft {
    /// `street, number (cep)` when a street is known, else the raw CEP.
    #[must_use]
    pub fn full_address(&self) -> String {
        if self.street.is_empty() {
            self.cep.clone()
        } else {
            format!("{}, {} ({})", self.street, self.address_number, self.cep)
        }
    }

    #[must_use]
    pub fn payment_label(&self) -> &'static str {
        self.payment.map_or("", PaymentMethod::label)
    }
}

/// Where the conversation stands inside the checkout funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    /// Waiting for delivery or pickup.
    ChooseMethod,
    /// Waiting for a CEP or a street name.
    CollectAddress,
    /// Waiting for the street number and complement.
    CollectAddressNumber,
    /// Address is out of range; offered to switch to pickup.
    OfferPickupFallback,
    /// Asked whether to reuse the contact saved on this device.
    ConfirmSavedContact,
    CollectName,
    CollectPhone,
    CollectCoupon,
    ChoosePayment,
    /// Cash chosen; waiting for the change amount.
    CollectCashChange,
    /// Last step before the order is submitted.
    CollectNotes,
}

/// An in-progress checkout: the current stage plus the draft built so far.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutFlow {
    pub stage: CheckoutStage,
    pub draft: OrderDraft,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: CheckoutStage::ChooseMethod,
            draft: OrderDraft::default(),
        }
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}
