//! End-to-end checkout conversations against in-memory collaborators.
//!
//! Each test walks a session through the funnel the way a customer types,
//! then inspects the order the back office received. The fakes resolve
//! every CEP to a point a chosen distance from the single test unit, so
//! fees and range decisions are exact.

mod common;

use common::{FakeRestaurant, FixedGeocoder, Scenario, text_of};
use forneria_assistant::models::{CheckoutStage, CouponDiscount, DiscountKind, FulfillmentMethod};
use rust_decimal::Decimal;

// ============================================================================
// Happy Paths
// ============================================================================

#[tokio::test]
async fn test_delivery_checkout_submits_order() {
    let mut scenario = Scenario::delivering_at(3.2);
    scenario.add_to_cart("Pizza Calabresa", "R$ 49,90");

    scenario.say("quero finalizar").await;
    assert_eq!(scenario.stage(), Some(CheckoutStage::ChooseMethod));

    scenario.say("Entrega").await;
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectAddress));

    let replies = scenario.say("01310-100").await;
    let text = text_of(&replies);
    assert!(text.contains("Entregamos sim"), "got: {text}");
    assert!(text.contains("3.2km"), "got: {text}");
    assert!(text.contains("R$ 7,80"), "got: {text}");
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectAddressNumber));

    scenario.say("123").await;
    scenario.say("Maria").await;
    scenario.say("11987654321").await;
    scenario.say("não").await; // no coupon
    scenario.say("cartão").await;
    let replies = scenario.say("não").await; // no notes

    // Funnel closed, cart cleared
    assert!(!scenario.session.in_checkout());
    assert!(scenario.session.cart.is_empty());

    let submissions = scenario.submissions();
    assert_eq!(submissions.len(), 1);
    let order = &submissions[0];
    assert_eq!(order.customer, "Maria");
    assert_eq!(order.phone, "11987654321");
    assert_eq!(order.method, "Entrega");
    assert_eq!(order.address, "Avenida Paulista - Bela Vista, 123 (01310-100)");
    assert_eq!(order.fee, "R$ 7,80");
    assert_eq!(order.total, "R$ 57,70");
    assert_eq!(order.payment_method, "Cartão (Levamos maquininha)");
    assert_eq!(order.change, "");
    assert_eq!(order.coupon, None);
    assert_eq!(order.obs, "");

    // Confirmation carries the WhatsApp handoff and the tracking link
    let text = text_of(&replies);
    assert!(text.contains("Pedido Pronto"), "got: {text}");
    assert!(text.contains("R$ 57,70"), "got: {text}");
    let first_link = replies[0].link.as_ref().expect("whatsapp link");
    assert!(first_link.url.contains("wa.me/5511999990000"));
    let tracking = replies[1].link.as_ref().expect("tracking link");
    assert_eq!(tracking.url, "https://forneria.test/pedido/4242");

    // Contact remembered for the next order
    assert_eq!(scenario.profile.name.as_deref(), Some("Maria"));
    assert_eq!(scenario.profile.phone.as_deref(), Some("11987654321"));
}

#[tokio::test]
async fn test_pickup_checkout_has_no_fee_or_address() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());
    scenario.add_to_cart("Espeto de Alcatra", "R$ 12,00");

    scenario.say("fechar pedido").await;
    scenario.say("2").await;
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectName));

    scenario.say("João").await;
    scenario.say("1133334444").await;
    scenario.say("nao").await;
    scenario.say("pix").await;
    scenario.say("sem cebola").await;

    let submissions = scenario.submissions();
    assert_eq!(submissions.len(), 1);
    let order = &submissions[0];
    assert_eq!(order.method, "Retirada");
    assert_eq!(order.address, "Retirada na Loja");
    assert_eq!(order.fee, "R$ 0,00");
    assert_eq!(order.total, "R$ 12,00");
    assert_eq!(order.payment_method, "Pix (Chave na entrega ou QR Code)");
    assert_eq!(order.obs, "sem cebola");
}

// ============================================================================
// Coupons
// ============================================================================

fn fixed_coupon(code: &str, reais: i64) -> CouponDiscount {
    CouponDiscount {
        code: code.to_owned(),
        kind: DiscountKind::Fixed,
        value: Decimal::from(reais),
    }
}

/// Walks a delivery funnel up to the coupon question.
async fn delivery_until_coupon(scenario: &mut Scenario) {
    scenario.add_to_cart("Pizza Calabresa", "R$ 49,90");
    scenario.say("finalizar").await;
    scenario.say("Entrega").await;
    scenario.say("01310-100").await;
    scenario.say("123").await;
    scenario.say("Maria").await;
    scenario.say("11987654321").await;
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectCoupon));
}

#[tokio::test]
async fn test_fixed_coupon_comes_off_items_plus_fee() {
    let mut restaurant = FakeRestaurant::new();
    restaurant.coupon = Some(fixed_coupon("PIZZA10", 10));
    let mut scenario = Scenario::with(restaurant, FixedGeocoder::cep_at_km(3.2));

    delivery_until_coupon(&mut scenario).await;
    let replies = scenario.say("PIZZA10").await;
    assert!(text_of(&replies).contains("aplicado com sucesso"));

    scenario.say("cartão").await;
    scenario.say("não").await;

    // 49,90 + 7,80 - 10,00
    let order = &scenario.submissions()[0];
    assert_eq!(order.total, "R$ 47,70");
    assert_eq!(order.coupon.as_deref(), Some("PIZZA10"));
}

#[tokio::test]
async fn test_percentage_coupon_comes_off_items_plus_fee() {
    let mut restaurant = FakeRestaurant::new();
    restaurant.coupon = Some(CouponDiscount {
        code: "DEZ".to_owned(),
        kind: DiscountKind::Percentage,
        value: Decimal::from(10),
    });
    let mut scenario = Scenario::with(restaurant, FixedGeocoder::cep_at_km(3.2));

    delivery_until_coupon(&mut scenario).await;
    scenario.say("DEZ").await;
    scenario.say("cartão").await;
    scenario.say("não").await;

    // 10% of 57,70 is 5,77
    let order = &scenario.submissions()[0];
    assert_eq!(order.total, "R$ 51,93");
}

#[tokio::test]
async fn test_discount_never_drives_total_negative() {
    let mut restaurant = FakeRestaurant::new();
    restaurant.coupon = Some(fixed_coupon("GIGANTE", 25));
    let mut scenario = Scenario::with(restaurant, FixedGeocoder::empty());

    scenario.add_to_cart("Espeto de Alcatra", "R$ 12,00");
    scenario.say("finalizar").await;
    scenario.say("retirada").await;
    scenario.say("João").await;
    scenario.say("1133334444").await;
    scenario.say("GIGANTE").await;
    scenario.say("pix").await;
    scenario.say("não").await;

    let order = &scenario.submissions()[0];
    assert_eq!(order.total, "R$ 0,00");
}

#[tokio::test]
async fn test_invalid_coupon_reprompts_without_advancing() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());
    scenario.add_to_cart("Espeto de Alcatra", "R$ 12,00");

    scenario.say("finalizar").await;
    scenario.say("retirada").await;
    scenario.say("João").await;
    scenario.say("1133334444").await;

    let replies = scenario.say("NADA2024").await;
    assert!(text_of(&replies).contains("Tente outro código"));
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectCoupon));

    // The skip button value still works afterwards
    scenario.say("não").await;
    assert_eq!(scenario.stage(), Some(CheckoutStage::ChoosePayment));
}

// ============================================================================
// Cash and Change
// ============================================================================

#[tokio::test]
async fn test_cash_payment_collects_change() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());
    scenario.add_to_cart("Pizza Portuguesa", "R$ 54,90");

    scenario.say("finalizar").await;
    scenario.say("retirada").await;
    scenario.say("Ana").await;
    scenario.say("11912345678").await;
    scenario.say("não").await;

    scenario.say("dinheiro").await;
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectCashChange));

    scenario.say("100").await;
    let replies = scenario.say("não").await;

    let order = &scenario.submissions()[0];
    assert_eq!(order.payment_method, "Dinheiro");
    assert_eq!(order.change, "100");
    assert!(text_of(&replies).contains("(100)"));
}

#[tokio::test]
async fn test_declining_change_records_none_needed() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());
    scenario.add_to_cart("Pizza Portuguesa", "R$ 54,90");

    scenario.say("finalizar").await;
    scenario.say("retirada").await;
    scenario.say("Ana").await;
    scenario.say("11912345678").await;
    scenario.say("não").await;
    scenario.say("dinheiro").await;
    scenario.say("não").await;
    scenario.say("não").await;

    let order = &scenario.submissions()[0];
    assert_eq!(order.change, "Sem troco");
}

// ============================================================================
// Out of Range
// ============================================================================

#[tokio::test]
async fn test_far_address_offers_pickup_fallback() {
    let mut scenario = Scenario::delivering_at(8.0);
    scenario.add_to_cart("Pizza Calabresa", "R$ 49,90");

    scenario.say("finalizar").await;
    scenario.say("Entrega").await;

    let replies = scenario.say("01310-100").await;
    let text = text_of(&replies);
    assert!(text.contains("fica longe (8.0km)"), "got: {text}");
    assert!(text.contains("Limite: 6km"), "got: {text}");
    assert_eq!(scenario.stage(), Some(CheckoutStage::OfferPickupFallback));
}

#[tokio::test]
async fn test_accepting_fallback_switches_to_pickup() {
    let mut scenario = Scenario::delivering_at(8.0);
    scenario.add_to_cart("Pizza Calabresa", "R$ 49,90");

    scenario.say("finalizar").await;
    scenario.say("Entrega").await;
    scenario.say("01310-100").await;
    scenario.say("sim").await;

    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectName));
    let flow = scenario.session.checkout.as_ref().expect("in checkout");
    assert_eq!(flow.draft.method, Some(FulfillmentMethod::Pickup));
    assert!(flow.draft.delivery_fee.is_zero());
}

#[tokio::test]
async fn test_declining_fallback_cancels_but_keeps_cart() {
    let mut scenario = Scenario::delivering_at(8.0);
    scenario.add_to_cart("Pizza Calabresa", "R$ 49,90");

    scenario.say("finalizar").await;
    scenario.say("Entrega").await;
    scenario.say("01310-100").await;
    let replies = scenario.say("não").await;

    assert!(text_of(&replies).contains("Pedido cancelado"));
    assert!(!scenario.session.in_checkout());
    assert_eq!(scenario.session.cart.len(), 1);
    assert!(scenario.submissions().is_empty());
}

// ============================================================================
// Validation Re-prompts
// ============================================================================

#[tokio::test]
async fn test_bad_cep_and_short_phone_reprompt_in_place() {
    let mut scenario = Scenario::delivering_at(3.2);
    scenario.add_to_cart("Pizza Calabresa", "R$ 49,90");

    scenario.say("finalizar").await;
    scenario.say("Entrega").await;

    let replies = scenario.say("0131").await;
    assert!(text_of(&replies).contains("CEP inválido"));
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectAddress));

    scenario.say("01310-100").await;

    let replies = scenario.say("sem número aqui").await;
    assert!(text_of(&replies).contains("faltou o número"));
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectAddressNumber));

    scenario.say("123").await;
    scenario.say("Maria").await;

    let replies = scenario.say("119876543").await; // 9 digits
    assert!(text_of(&replies).contains("curto demais"));
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectPhone));
}

// ============================================================================
// Saved Contact
// ============================================================================

#[tokio::test]
async fn test_saved_contact_skips_name_phone_and_payment() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());
    scenario.profile.remember_contact("Maria", "11987654321");
    scenario.add_to_cart("Espeto de Alcatra", "R$ 12,00");

    scenario.say("finalizar").await;
    let replies = scenario.say("retirada").await;
    assert!(text_of(&replies).contains("Encontrei seus dados: **Maria**"));
    assert_eq!(scenario.stage(), Some(CheckoutStage::ConfirmSavedContact));

    scenario.say("pode usar").await;
    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectNotes));
    scenario.say("não").await;

    let order = &scenario.submissions()[0];
    assert_eq!(order.customer, "Maria");
    assert_eq!(order.phone, "11987654321");
    // This shortcut never asks how the customer pays
    assert_eq!(order.payment_method, "");
}

#[tokio::test]
async fn test_refusing_saved_contact_collects_fresh_data() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());
    scenario.profile.remember_contact("Maria", "11987654321");
    scenario.add_to_cart("Espeto de Alcatra", "R$ 12,00");

    scenario.say("finalizar").await;
    scenario.say("retirada").await;
    scenario.say("não").await;

    assert_eq!(scenario.stage(), Some(CheckoutStage::CollectName));
}

// ============================================================================
// Submission Failures
// ============================================================================

#[tokio::test]
async fn test_failed_submission_keeps_cart_and_allows_retry() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());
    scenario.restaurant.set_submission_failure(true);
    scenario.add_to_cart("Espeto de Alcatra", "R$ 12,00");

    scenario.say("finalizar").await;
    scenario.say("retirada").await;
    scenario.say("João").await;
    scenario.say("1133334444").await;
    scenario.say("não").await;
    scenario.say("pix").await;

    let replies = scenario.say("não").await;
    assert!(text_of(&replies).contains("Erro de conexão"));
    assert!(scenario.session.in_checkout());
    assert_eq!(scenario.session.cart.len(), 1);
    assert!(scenario.submissions().is_empty());

    // Backend comes back; the next message retries from the notes step
    scenario.restaurant.set_submission_failure(false);
    let replies = scenario.say("não").await;
    assert!(text_of(&replies).contains("Pedido Pronto"));
    assert!(!scenario.session.in_checkout());
    assert!(scenario.session.cart.is_empty());
    assert_eq!(scenario.submissions().len(), 1);
}

#[tokio::test]
async fn test_rejected_order_reports_backend_message() {
    let mut restaurant = FakeRestaurant::new();
    restaurant.reject_message = Some("Loja fechada no momento.".to_owned());
    let mut scenario = Scenario::with(restaurant, FixedGeocoder::empty());
    scenario.add_to_cart("Espeto de Alcatra", "R$ 12,00");

    scenario.say("finalizar").await;
    scenario.say("retirada").await;
    scenario.say("João").await;
    scenario.say("1133334444").await;
    scenario.say("não").await;
    scenario.say("pix").await;
    let replies = scenario.say("não").await;

    let text = text_of(&replies);
    assert!(text.contains("Erro no Pedido"), "got: {text}");
    assert!(text.contains("Loja fechada no momento."), "got: {text}");
    assert!(scenario.session.in_checkout());
    assert_eq!(scenario.session.cart.len(), 1);
    // The backend saw the order and turned it down; nothing was lost in transit
    assert_eq!(scenario.submissions().len(), 1);
}

// ============================================================================
// Entry Guards
// ============================================================================

#[tokio::test]
async fn test_checkout_needs_items_in_cart() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());

    let replies = scenario.say("finalizar").await;
    assert!(text_of(&replies).contains("carrinho está vazio"));
    assert!(!scenario.session.in_checkout());
}

#[tokio::test]
async fn test_unrecognized_method_reprompts() {
    let mut scenario = Scenario::with(FakeRestaurant::new(), FixedGeocoder::empty());
    scenario.add_to_cart("Espeto de Alcatra", "R$ 12,00");

    scenario.say("finalizar").await;
    let replies = scenario.say("de bicicleta").await;

    assert!(text_of(&replies).contains("1 para Entrega ou 2 para Retirada"));
    assert_eq!(scenario.stage(), Some(CheckoutStage::ChooseMethod));
}
