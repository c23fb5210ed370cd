//! The checkout funnel.
//!
//! A strict stage-by-stage dialogue: fulfillment method, address (delivery
//! only), contact, coupon, payment, notes, then submission to the restaurant
//! backend. Each stage owns its validation; invalid input re-prompts without
//! advancing, so the draft only ever holds vetted values.

use std::sync::Arc;

use forneria_core::{Cep, Money, Phone};
use tracing::{info, instrument, warn};

use crate::models::{
    ChatSession, CheckoutFlow, CheckoutStage, CustomerProfile, FulfillmentMethod, OrderSubmission,
    PaymentMethod, Reply,
};
use crate::ports::{CouponOutcome, OrderOutcome, RestaurantApi};
use crate::services::delivery::DeliveryService;
use crate::services::site_settings;

/// What a funnel stage decided to do with the flow.
enum Step {
    /// Keep the checkout alive; the stage may have moved.
    Stay(Vec<Reply>),
    /// Checkout is over, completed or cancelled.
    End(Vec<Reply>),
}

/// Drives the order funnel for one session at a time.
#[derive(Clone)]
pub struct CheckoutService {
    restaurant: Arc<dyn RestaurantApi>,
    delivery: DeliveryService,
}

impl CheckoutService {
    pub fn new(restaurant: Arc<dyn RestaurantApi>, delivery: DeliveryService) -> Self {
        Self {
            restaurant,
            delivery,
        }
    }

    /// Starts (or restarts) the funnel. Rejected when the cart is empty.
    pub fn begin(&self, session: &mut ChatSession) -> Vec<Reply> {
        if session.cart.is_empty() {
            return vec![Reply::text(
                "Seu carrinho está vazio! 🛒 Adicione itens do cardápio primeiro.",
            )];
        }

        session.checkout = Some(CheckoutFlow::new());

        vec![
            Reply::text("Vamos fechar seu pedido! 📝\nComo você prefere receber?")
                .with_quick_reply("🛵 Entrega", "Entrega")
                .with_quick_reply("🏪 Retirada", "Retirada"),
        ]
    }

    /// Feeds one user message into the active funnel. No-op when the session
    /// has no checkout in progress.
    #[instrument(skip_all, fields(session = %session.id))]
    pub async fn advance(
        &self,
        session: &mut ChatSession,
        profile: &mut CustomerProfile,
        text: &str,
    ) -> Vec<Reply> {
        let Some(mut flow) = session.checkout.take() else {
            return Vec::new();
        };
        let text = text.trim();

        let step = match flow.stage {
            CheckoutStage::ChooseMethod => choose_method(&mut flow, profile, text),
            CheckoutStage::CollectAddress => self.collect_address(session, &mut flow, text).await,
            CheckoutStage::CollectAddressNumber => collect_address_number(&mut flow, profile, text),
            CheckoutStage::OfferPickupFallback => offer_pickup_fallback(&mut flow, profile, text),
            CheckoutStage::ConfirmSavedContact => confirm_saved_contact(&mut flow, profile, text),
            CheckoutStage::CollectName => collect_name(&mut flow, text),
            CheckoutStage::CollectPhone => collect_phone(&mut flow, text),
            CheckoutStage::CollectCoupon => self.collect_coupon(&mut flow, text).await,
            CheckoutStage::ChoosePayment => choose_payment(&mut flow, text),
            CheckoutStage::CollectCashChange => collect_cash_change(&mut flow, text),
            CheckoutStage::CollectNotes => {
                flow.draft.notes = if is_refusal(text) {
                    String::new()
                } else {
                    text.to_owned()
                };
                self.finish(session, profile, &mut flow).await
            }
        };

        match step {
            Step::Stay(replies) => {
                session.checkout = Some(flow);
                replies
            }
            Step::End(replies) => replies,
        }
    }

    /// CEP or street-name input for a delivery order.
    async fn collect_address(
        &self,
        session: &mut ChatSession,
        flow: &mut CheckoutFlow,
        text: &str,
    ) -> Step {
        let mut replies = Vec::new();
        let site = site_settings(self.restaurant.as_ref()).await;

        // Digit-leading input is treated as a CEP attempt, anything else as
        // a street name.
        let street_search = !text.chars().next().is_some_and(|c| c.is_ascii_digit());

        let result = if street_search {
            replies.push(Reply::text(format!("🔎 Buscando rua \"{text}\"...")));
            self.delivery.assess_street(text, &site).await
        } else {
            let Ok(cep) = Cep::parse(text) else {
                return Step::Stay(vec![Reply::text(
                    "CEP inválido. Use o formato 00000-000 ou digite o nome da rua.",
                )]);
            };
            self.delivery.assess_cep(cep.as_digits(), &site).await
        };

        let assessment = match result {
            Ok(Some(assessment)) => assessment,
            Ok(None) => {
                replies.push(Reply::text(if street_search {
                    "Não encontrei essa rua próxima. 😕 Tente o CEP ou o nome do bairro."
                } else {
                    "Não encontrei esse CEP. 😕 Tente o nome da rua."
                }));
                return Step::Stay(replies);
            }
            Err(err) => {
                warn!(error = %err, "Checkout address lookup failed");
                replies.push(Reply::text("Erro ao verificar localização. Tente novamente."));
                return Step::Stay(replies);
            }
        };

        let street = assessment.road.clone().unwrap_or_else(|| {
            if street_search {
                text.to_owned()
            } else {
                "Rua identificada".to_owned()
            }
        });

        if assessment.in_range {
            session.nearest_unit = Some(assessment.unit.clone());

            flow.draft.cep = if street_search {
                "Não informado".to_owned()
            } else {
                text.to_owned()
            };
            flow.draft.street = match &assessment.suburb {
                Some(suburb) if !suburb.is_empty() => format!("{street} - {suburb}"),
                _ => street,
            };
            flow.draft.distance_km = Some(assessment.distance_km);
            flow.draft.delivery_fee = assessment.fee;
            flow.stage = CheckoutStage::CollectAddressNumber;

            replies.push(Reply::text(format!(
                "Entregamos sim! (Distância: {:.1}km)\n📍 Local: **{}**\nTaxa: {}\n\nPor favor, digite o **número e complemento**.",
                assessment.distance_km,
                flow.draft.street,
                assessment.fee.display_brl(),
            )));
            Step::Stay(replies)
        } else {
            flow.stage = CheckoutStage::OfferPickupFallback;
            replies.push(
                Reply::text(format!(
                    "Poxa, **{street}** fica longe ({:.1}km). Limite: {}km. 😕\nDeseja mudar para **Retirada**?",
                    assessment.distance_km,
                    self.delivery.radius_label(),
                ))
                .with_quick_reply("Sim", "Sim")
                .with_quick_reply("Não", "Não"),
            );
            Step::Stay(replies)
        }
    }

    /// Coupon code, or the skip answer.
    async fn collect_coupon(&self, flow: &mut CheckoutFlow, text: &str) -> Step {
        if is_refusal(text) {
            flow.stage = CheckoutStage::ChoosePayment;
            return Step::Stay(vec![payment_prompt(
                "Tudo bem! Como você prefere **pagar**?",
            )]);
        }

        match self.restaurant.validate_coupon(text).await {
            Ok(CouponOutcome::Valid(discount)) => {
                flow.stage = CheckoutStage::ChoosePayment;
                let prompt = payment_prompt(&format!(
                    "🎉 Cupom **{}** aplicado com sucesso!\nComo você prefere **pagar**?",
                    discount.code,
                ));
                flow.draft.coupon = Some(discount);
                Step::Stay(vec![prompt])
            }
            Ok(CouponOutcome::Invalid { message }) => Step::Stay(vec![
                Reply::text(format!("❌ {message}\nTente outro código ou clique abaixo:"))
                    .with_quick_reply("Continuar sem cupom", "Não"),
            ]),
            Err(err) => {
                warn!(error = %err, "Coupon validation failed");
                Step::Stay(vec![Reply::text(
                    "Erro ao validar cupom. Digite 'não' para continuar.",
                )])
            }
        }
    }

    /// Submits the finished draft and closes the funnel.
    ///
    /// On rejection or a transport failure the flow stays at the notes stage
    /// with the cart intact, so the customer's next message retries.
    async fn finish(
        &self,
        session: &mut ChatSession,
        profile: &mut CustomerProfile,
        flow: &mut CheckoutFlow,
    ) -> Step {
        let draft = &flow.draft;
        let method = draft.method.unwrap_or(FulfillmentMethod::Pickup);

        // Remembered even if the submission fails, like a paper notepad.
        profile.remember_contact(&draft.customer_name, &draft.phone);

        let change_note = if draft.change_for.is_empty() {
            String::new()
        } else {
            format!("({})", draft.change_for)
        };

        let mut message = format!(
            "Olá! Gostaria de fazer um pedido ({}):\n\n",
            method.label()
        );
        message.push_str(&format!("👤 *Cliente:* {}\n", draft.customer_name));
        message.push_str(&format!("📱 *Tel:* {}\n", draft.phone));
        message.push_str(&format!(
            "💳 *Pagamento:* {} {}\n",
            draft.payment_label(),
            change_note
        ));
        if method == FulfillmentMethod::Delivery {
            message.push_str(&format!("📍 *Endereço:* {}\n", draft.full_address()));
        }

        message.push_str("\n🛒 *Itens:* \n");
        for line in session.cart.lines() {
            message.push_str(&format!("- {} ({})\n", line.name, line.price_text));
        }

        let mut total = session.cart.subtotal() + draft.delivery_fee;
        let discount = draft.coupon.as_ref().map(|coupon| coupon.amount_off(total));
        if let (Some(coupon), Some(discount)) = (&draft.coupon, discount) {
            total = total.saturating_sub(discount);
            message.push_str(&format!(
                "\n🎟️ *Cupom ({}):* -{}",
                coupon.code,
                discount.display_brl()
            ));
        }

        let submission = OrderSubmission {
            customer: draft.customer_name.clone(),
            phone: draft.phone.clone(),
            method: method.label().to_owned(),
            address: if method == FulfillmentMethod::Delivery {
                draft.full_address()
            } else {
                "Retirada na Loja".to_owned()
            },
            items: session.cart.lines().to_vec(),
            total: total.display_brl(),
            obs: draft.notes.clone(),
            coupon: draft.coupon.as_ref().map(|coupon| coupon.code.clone()),
            fee: draft.delivery_fee.display_brl(),
            payment_method: draft.payment_label().to_owned(),
            change: draft.change_for.clone(),
        };

        let receipt = match self.restaurant.submit_order(&submission).await {
            Ok(OrderOutcome::Accepted(receipt)) => receipt,
            Ok(OrderOutcome::Rejected { message }) => {
                return Step::Stay(vec![Reply::text(format!(
                    "❌ **Erro no Pedido:** {message}"
                ))]);
            }
            Err(err) => {
                warn!(error = %err, "Order submission failed");
                return Step::Stay(vec![Reply::text(
                    "❌ Erro de conexão ao registrar pedido. Tente novamente.",
                )]);
            }
        };

        info!(order_id = receipt.order_id, method = method.label(), "Order submitted");

        if method == FulfillmentMethod::Delivery {
            message.push_str(&format!(
                "\n🛵 *Taxa de Entrega:* {}",
                draft.delivery_fee.display_brl()
            ));
        }
        message.push_str(&format!("\n💰 *Total Final:* {}", total.display_brl()));
        if !draft.notes.is_empty() {
            message.push_str(&format!("\n\n📝 *Obs:* {}", draft.notes));
        }

        let site = site_settings(self.restaurant.as_ref()).await;
        let unit = session
            .nearest_unit
            .clone()
            .or_else(|| site.primary_unit().cloned());

        let mut summary = format!(
            "✅ **Pedido Pronto!**\nTipo: **{}**\nCliente: {}\nPagamento: **{}** {}\nTotal: **{}**",
            method.label(),
            draft.customer_name,
            draft.payment_label(),
            change_note,
            total.display_brl(),
        );
        if let Some(coupon) = &draft.coupon {
            summary.push_str(&format!("\n(Desconto aplicado: {})", coupon.code));
        }
        if !draft.notes.is_empty() {
            summary.push_str(&format!("\nObs: {}", draft.notes));
        }
        if let Some(unit) = &unit {
            summary.push_str(&format!("\n\n📍 Unidade: {}", unit.name));
        }

        let mut reply = Reply::text(summary);
        if let Some(unit) = &unit {
            reply = reply.with_link("📲 Enviar para WhatsApp", unit.whatsapp_link(&message));
        }

        let mut replies = vec![reply];
        if let Some(order_link) = receipt.order_link {
            replies.push(
                Reply::text("Acompanhe seu pedido por aqui! 👇")
                    .with_link("🧾 Ver comprovante do pedido", order_link),
            );
        }

        session.cart.clear();
        Step::End(replies)
    }
}

// ====== Stage handlers without remote calls ======

fn choose_method(flow: &mut CheckoutFlow, profile: &CustomerProfile, text: &str) -> Step {
    let lower = text.to_lowercase();

    if lower.contains('1') || lower.contains("entrega") {
        flow.draft.method = Some(FulfillmentMethod::Delivery);
        flow.stage = CheckoutStage::CollectAddress;
        return Step::Stay(vec![Reply::text(
            "Ótimo! Por favor, digite o **CEP** para entrega:",
        )]);
    }

    if lower.contains('2') || lower.contains("retirada") || lower.contains("buscar") {
        flow.draft.method = Some(FulfillmentMethod::Pickup);
        return Step::Stay(vec![ask_contact(
            flow,
            profile,
            "",
            "Certo! Qual é o seu **nome**?",
        )]);
    }

    Step::Stay(vec![Reply::text(
        "Por favor, escolha 1 para Entrega ou 2 para Retirada.",
    )])
}

fn collect_address_number(flow: &mut CheckoutFlow, profile: &CustomerProfile, text: &str) -> Step {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return Step::Stay(vec![Reply::text(
            "Parece que faltou o número. 🏠 Por favor, digite o **número** do endereço (ex: 123).",
        )]);
    }

    flow.draft.address_number = text.to_owned();
    Step::Stay(vec![ask_contact(
        flow,
        profile,
        "Anotado! 📝\n",
        "Anotado! 📝\nQual é o seu **nome**?",
    )])
}

fn offer_pickup_fallback(flow: &mut CheckoutFlow, profile: &CustomerProfile, text: &str) -> Step {
    if agrees(text) {
        flow.draft.method = Some(FulfillmentMethod::Pickup);
        flow.draft.delivery_fee = Money::ZERO;
        return Step::Stay(vec![ask_contact(
            flow,
            profile,
            "Combinado! Retirada na loja.\n",
            "Combinado! Retirada na loja. Qual é o seu **nome**?",
        )]);
    }

    Step::End(vec![Reply::text(
        "Tudo bem. Pedido cancelado. Se mudar de ideia, estou aqui!",
    )])
}

fn confirm_saved_contact(flow: &mut CheckoutFlow, profile: &CustomerProfile, text: &str) -> Step {
    if accepts_saved(text)
        && let Some(contact) = profile.saved_contact()
    {
        flow.draft.customer_name = contact.name;
        flow.draft.phone = contact.phone;
        flow.stage = CheckoutStage::CollectNotes;
        return Step::Stay(vec![Reply::text(
            "Dados confirmados! ✅\nAlguma **observação** para o pedido? (Ex: sem cebola, troco para 50).\nSe não tiver, digite 'não'.",
        )]);
    }

    flow.stage = CheckoutStage::CollectName;
    Step::Stay(vec![Reply::text("Sem problemas. Qual é o seu **nome**?")])
}

fn collect_name(flow: &mut CheckoutFlow, text: &str) -> Step {
    flow.draft.customer_name = text.to_owned();
    flow.stage = CheckoutStage::CollectPhone;
    Step::Stay(vec![Reply::text(format!(
        "Prazer, {text}! Agora, qual seu **celular/WhatsApp** (com DDD)?"
    ))])
}

fn collect_phone(flow: &mut CheckoutFlow, text: &str) -> Step {
    if Phone::parse(text).is_err() {
        return Step::Stay(vec![Reply::text(
            "O número parece curto demais. 📱 Por favor, digite o DDD + Número (mínimo 10 dígitos).",
        )]);
    }

    flow.draft.phone = text.to_owned();
    flow.stage = CheckoutStage::CollectCoupon;
    Step::Stay(vec![
        Reply::text("Anotado! 📱\nVocê tem algum **cupom de desconto**? Digite o código ou clique abaixo:")
            .with_quick_reply("Não tenho cupom", "Não"),
    ])
}

fn choose_payment(flow: &mut CheckoutFlow, text: &str) -> Step {
    let lower = text.to_lowercase();

    let method = if lower.contains("cart") || lower.contains("crédito") || lower.contains("débito")
    {
        PaymentMethod::Card
    } else if lower.contains("pix") {
        PaymentMethod::Pix
    } else if lower.contains("dinheiro") || lower.contains("nota") || lower.contains("cedula") {
        flow.draft.payment = Some(PaymentMethod::Cash);
        flow.stage = CheckoutStage::CollectCashChange;
        return Step::Stay(vec![Reply::text(
            "Certo! Vai precisar de **troco** para quanto? (Digite o valor ou 'não')",
        )]);
    } else {
        return Step::Stay(vec![Reply::text(
            "Não entendi. Escolha: Cartão, Dinheiro ou Pix.",
        )]);
    };

    flow.draft.payment = Some(method);
    flow.stage = CheckoutStage::CollectNotes;
    Step::Stay(vec![
        Reply::text(format!(
            "Ok, {}.\nAlguma **observação** para o pedido? (Ex: sem cebola).",
            method.label()
        ))
        .with_quick_reply("Sem observações", "Não"),
    ])
}

fn collect_cash_change(flow: &mut CheckoutFlow, text: &str) -> Step {
    flow.draft.change_for = if is_refusal(text) {
        "Sem troco".to_owned()
    } else {
        text.to_owned()
    };
    flow.stage = CheckoutStage::CollectNotes;
    Step::Stay(vec![
        Reply::text("Anotado. Alguma **observação** final para o pedido?")
            .with_quick_reply("Sem observações", "Não"),
    ])
}

// ====== Shared prompts and matchers ======

/// Jumps to the saved-contact confirmation when the device has ordered
/// before, otherwise asks for the name. Each caller brings its own lead-in.
fn ask_contact(
    flow: &mut CheckoutFlow,
    profile: &CustomerProfile,
    saved_prefix: &str,
    ask_name: &str,
) -> Reply {
    if let Some(contact) = profile.saved_contact() {
        flow.stage = CheckoutStage::ConfirmSavedContact;
        Reply::text(format!(
            "{saved_prefix}Encontrei seus dados: **{}** ({}).\nDeseja usá-los?",
            contact.name, contact.phone
        ))
        .with_quick_reply("Sim", "Sim")
        .with_quick_reply("Não", "Não")
    } else {
        flow.stage = CheckoutStage::CollectName;
        Reply::text(ask_name)
    }
}

fn payment_prompt(text: &str) -> Reply {
    Reply::text(text)
        .with_quick_reply("💳 Cartão", "Cartão")
        .with_quick_reply("💵 Dinheiro", "Dinheiro")
        .with_quick_reply("💠 Pix", "Pix")
}

/// Loose yes-match; an `s` anywhere counts, so "não sei" reads as yes too.
fn agrees(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains('s') || lower.contains("quero")
}

/// Yes-match for reusing saved data; also takes "pode".
fn accepts_saved(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains('s') || lower.contains("pode") || lower.contains("quero")
}

/// Exactly 'não'/'nao', the value the skip quick-replies send.
fn is_refusal(text: &str) -> bool {
    matches!(text.to_lowercase().as_str(), "não" | "nao")
}
