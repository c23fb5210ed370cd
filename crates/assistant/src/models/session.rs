use forneria_core::{DeviceId, SessionId};

use super::{Cart, CheckoutFlow, DeliveryUnit};

/// A follow-up the assistant asked for outside the checkout funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingPrompt {
    /// The category list was shown; the next message picks one.
    MenuCategory,
    /// A CEP lookup failed; the next message names a neighbourhood.
    Neighborhood,
}

/// Mutable conversation state for one connected widget.
#[derive(Debug)]
pub struct ChatSession {
    pub id: SessionId,
    pub device: DeviceId,
    pub cart: Cart,
    pub checkout: Option<CheckoutFlow>,
    pub pending: Option<PendingPrompt>,
    /// Unit chosen by the latest successful delivery check.
    pub nearest_unit: Option<DeliveryUnit>,
}

impl ChatSession {
    #[must_use]
    pub fn new(device: DeviceId) -> Self {
        Self {
            id: SessionId::new(),
            device,
            cart: Cart::default(),
            checkout: None,
            pending: None,
            nearest_unit: None,
        }
    }

    /// True while the checkout funnel is driving the conversation.
    #[must_use]
    pub fn in_checkout(&self) -> bool {
        self.checkout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sessions_start_idle() {
        let session = ChatSession::new(DeviceId::generate());

        assert!(session.cart.is_empty());
        assert!(!session.in_checkout());
        assert!(session.pending.is_none());
    }

    #[test]
    fn entering_the_funnel_flips_in_checkout() {
        let mut session = ChatSession::new(DeviceId::generate());
        session.checkout = Some(CheckoutFlow::new());
        assert!(session.in_checkout());
    }
}
