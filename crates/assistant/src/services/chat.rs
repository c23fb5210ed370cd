//! Free-text dialogue dispatch.
//!
//! Outside checkout, each message is matched against a fixed priority list:
//! active checkout, a CEP anywhere in the text, pending followups
//! (neighbourhood, menu category), then the intent patterns, and finally the
//! knowledge base. The first hit wins.

use std::sync::{Arc, LazyLock};

use chrono::{NaiveDateTime, Utc};
use forneria_core::{StoreHours, StoreStatus};
use rand::seq::IndexedRandom;
use regex::Regex;
use tracing::{instrument, warn};

use crate::knowledge::KnowledgeBase;
use crate::models::{
    CartLine, ChatSession, CustomerProfile, MenuCategory, MenuItemView, MenuSectionView,
    PendingPrompt, Reply,
};
use crate::ports::RestaurantApi;
use crate::services::checkout::CheckoutService;
use crate::services::delivery::DeliveryService;
use crate::services::site_settings;

/// Sent when a message arrives while the previous one is still being
/// processed for the same session.
pub const BUSY_REPLY: &str = "Um momentinho! Ainda estou cuidando da sua última mensagem... ⏳";

const CATEGORY_INTRO: &str = "Com certeza! O que você manda hoje? 😋";

static CEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{5}-?\d{3}\b").expect("valid regex"));
static CHECKOUT_INTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(finalizar|fechar|pedido|carrinho|comprar)\b").expect("valid regex")
});
static LOYALTY_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(pontos|fidelidade|saldo)\b").expect("valid regex"));
static SUGGESTION_INTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)o que tem de bom|sugestão|indicação|recomenda|destaque|sugere")
        .expect("valid regex")
});
static MENU_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(cardápio|menu|opções|fome)\b").expect("valid regex"));

/// What a freshly started session greets with.
#[derive(Debug, Clone)]
pub struct SessionGreeting {
    /// Persona name for the widget header.
    pub assistant_name: &'static str,
    pub replies: Vec<Reply>,
}

/// The conversation engine for one restaurant.
pub struct ChatService {
    restaurant: Arc<dyn RestaurantApi>,
    delivery: DeliveryService,
    checkout: CheckoutService,
    knowledge: KnowledgeBase,
    hours: StoreHours,
    utc_offset_hours: i32,
}

impl ChatService {
    pub fn new(
        restaurant: Arc<dyn RestaurantApi>,
        delivery: DeliveryService,
        checkout: CheckoutService,
        knowledge: KnowledgeBase,
        utc_offset_hours: i32,
    ) -> Self {
        Self {
            restaurant,
            delivery,
            checkout,
            knowledge,
            hours: StoreHours::default(),
            utc_offset_hours,
        }
    }

    /// Greeting for a new session: persona introduction plus the store
    /// status line.
    pub async fn start_session(&self) -> SessionGreeting {
        let site = site_settings(self.restaurant.as_ref()).await;
        let status = self.store_status();

        let welcome = format!(
            "Olá! Bem-vindo à {}. Eu sou {}, seu assistente virtual.",
            site.store_name,
            site.voice.introduction()
        );
        let greeting = if status.open {
            format!(
                "Boa noite! A chapa está quente 🔥.\n🕒 Tempo médio de espera: **{}**.\nO que manda hoje?",
                site.wait_estimate
            )
        } else {
            format!(
                "Olá! {} Posso ajudar com o cardápio ou agendar um pedido?",
                status.message
            )
        };

        SessionGreeting {
            assistant_name: site.voice.assistant_name(),
            replies: vec![Reply::text(welcome), Reply::text(greeting)],
        }
    }

    /// Routes one user message and returns the bot replies.
    #[instrument(skip_all, fields(session = %session.id))]
    pub async fn handle_message(
        &self,
        session: &mut ChatSession,
        profile: &mut CustomerProfile,
        text: &str,
    ) -> Vec<Reply> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if session.in_checkout() {
            return self.checkout.advance(session, profile, text).await;
        }

        if let Some(cep) = find_cep(text) {
            return self.delivery_check_cep(session, &cep).await;
        }

        if session.pending == Some(PendingPrompt::Neighborhood) {
            session.pending = None;
            return self.delivery_check_neighborhood(session, text).await;
        }

        if session.pending == Some(PendingPrompt::MenuCategory) {
            return self.pick_menu_category(session, profile, text).await;
        }

        if CHECKOUT_INTENT.is_match(text) {
            return self.checkout.begin(session);
        }

        if LOYALTY_INTENT.is_match(text) {
            return self.loyalty_balance(profile).await;
        }

        if SUGGESTION_INTENT.is_match(text) {
            return self.suggest_highlights(session, profile).await;
        }

        if MENU_INTENT.is_match(text) {
            return vec![self.categories_prompt(session, CATEGORY_INTRO)];
        }

        vec![Reply::text(self.knowledge.reply(text))]
    }

    /// Starts the checkout funnel, for the widget's own button.
    pub fn begin_checkout(&self, session: &mut ChatSession) -> Vec<Reply> {
        self.checkout.begin(session)
    }

    // ====== Cart ======

    /// Adds a line and confirms, suggesting a drink when none is in the cart.
    pub fn add_item(&self, session: &mut ChatSession, name: &str, price: &str) -> Vec<Reply> {
        let line = CartLine::new(name, price);
        let is_drink = line.is_drink();
        session.cart.add(line);

        let mut replies = vec![Reply::text(format!(
            "✅ **{name}** adicionado!\n🛒 Carrinho: {} item(ns).",
            session.cart.len()
        ))];

        if !is_drink && !session.cart.has_drink() {
            replies.push(Reply::text(
                "Que tal uma bebida geladinha para acompanhar? 🥤",
            ));
        }

        replies
    }

    /// Removes a line by index. When the cart empties out, nudges back to
    /// the menu.
    pub fn remove_item(&self, session: &mut ChatSession, index: usize) -> Vec<Reply> {
        session.cart.remove(index);

        if session.cart.is_empty() {
            return vec![
                Reply::text("Seu carrinho ficou vazio! 🛒 Que tal adicionar algo?"),
                self.categories_prompt(session, CATEGORY_INTRO),
            ];
        }

        Vec::new()
    }

    // ====== Menu ======

    /// The numbered category prompt; leaves the session waiting for a pick.
    fn categories_prompt(&self, session: &mut ChatSession, intro: &str) -> Reply {
        session.pending = Some(PendingPrompt::MenuCategory);
        Reply::text(format!(
            "{intro}\nDigite o número ou nome da opção:\n1️⃣ **Pizzas**\n2️⃣ **Churrasco**\n3️⃣ **Hambúrgueres**\n4️⃣ **Marmitex**\n5️⃣ **Bebidas**\n6️⃣ **Ver Tudo**\n7️⃣ **⭐ Favoritos**"
        ))
    }

    /// Resolves the category answer; unknown input keeps the prompt alive.
    async fn pick_menu_category(
        &self,
        session: &mut ChatSession,
        profile: &CustomerProfile,
        text: &str,
    ) -> Vec<Reply> {
        match parse_category(text) {
            CategoryChoice::Show(filter) => {
                session.pending = None;
                self.show_menu(profile, filter.as_deref()).await
            }
            CategoryChoice::Favorites => {
                session.pending = None;
                vec![show_favorites(profile)]
            }
            CategoryChoice::Unknown => vec![Reply::text(
                "Não entendi. 😕 Digite o número ou nome:\n1. Pizzas\n2. Churrasco\n3. Hambúrgueres\n4. Marmitex\n5. Bebidas\n6. Ver Tudo\n7. Favoritos",
            )],
        }
    }

    /// Fetches the menu and renders the requested categories (all when
    /// `filter` is `None`).
    async fn show_menu(&self, profile: &CustomerProfile, filter: Option<&[&str]>) -> Vec<Reply> {
        let mut replies = vec![Reply::text("Buscando as melhores opções para você... 😋")];

        let menu = match self.restaurant.menu().await {
            Ok(menu) => menu,
            Err(err) => {
                warn!(error = %err, "Menu fetch failed");
                replies.push(Reply::text(
                    "Desculpe, tive um problema ao carregar o cardápio. 😕 Mas você pode ver na aba 'Cardápio' do site!",
                ));
                return replies;
            }
        };

        if menu.categories.is_empty() {
            replies.push(Reply::text(
                "O cardápio parece estar vazio no momento. 😕 Tente novamente mais tarde.",
            ));
            return replies;
        }

        let sections: Vec<MenuSectionView> = match filter {
            Some(names) => names
                .iter()
                .filter_map(|name| menu.category(name))
                .map(|category| section_view(category, profile))
                .collect(),
            None => menu
                .categories
                .iter()
                .map(|category| section_view(category, profile))
                .collect(),
        };

        replies.push(Reply::text("📋 Aqui está:").with_sections(sections));
        replies
    }

    /// Up to three random available items.
    async fn suggest_highlights(
        &self,
        session: &mut ChatSession,
        profile: &CustomerProfile,
    ) -> Vec<Reply> {
        let mut replies = vec![Reply::text(
            "Deixa comigo! Vou separar umas opções deliciosas para você... 👩‍🍳",
        )];

        let menu = match self.restaurant.menu().await {
            Ok(menu) => menu,
            Err(err) => {
                warn!(error = %err, "Highlights fetch failed");
                replies.push(Reply::text(
                    "Tive um probleminha para consultar os destaques. Mas você pode ver o cardápio completo!",
                ));
                replies.push(self.categories_prompt(session, CATEGORY_INTRO));
                return replies;
            }
        };

        let available = menu.available_items();
        if available.is_empty() {
            replies.push(Reply::text(
                "No momento estamos atualizando nosso cardápio. Tente ver as categorias!",
            ));
            replies.push(self.categories_prompt(session, CATEGORY_INTRO));
            return replies;
        }

        let items: Vec<MenuItemView> = available
            .choose_multiple(&mut rand::rng(), 3)
            .map(|item| MenuItemView {
                name: item.name.clone(),
                description: item.description.clone(),
                price: item.price_text.clone(),
                sold_out: false,
                favorite: profile.is_favorite(&item.name),
            })
            .collect();

        replies.push(Reply::text("🌟 Minhas sugestões de hoje:").with_sections(vec![
            MenuSectionView {
                title: String::new(),
                items,
            },
        ]));
        replies
    }

    // ====== Loyalty ======

    async fn loyalty_balance(&self, profile: &CustomerProfile) -> Vec<Reply> {
        let Some(phone) = profile.phone.as_deref().filter(|p| !p.is_empty()) else {
            return vec![Reply::text(
                "Para consultar seus pontos, preciso saber quem é você. Faça seu primeiro pedido para começar a pontuar! 🍕",
            )];
        };

        match self.restaurant.loyalty_points(phone).await {
            Ok(points) => vec![Reply::text(format!(
                "🏆 Você tem **{points} pontos** no Clube Colonial!\nContinue pedindo para acumular mais."
            ))],
            Err(err) => {
                warn!(error = %err, "Loyalty lookup failed");
                vec![Reply::text(
                    "Não consegui consultar seus pontos agora. 😕 Tente novamente mais tarde.",
                )]
            }
        }
    }

    // ====== Standalone delivery checks ======

    /// A bare CEP in chat: feasibility, fee estimate and a WhatsApp link.
    async fn delivery_check_cep(&self, session: &mut ChatSession, cep: &str) -> Vec<Reply> {
        if session.pending == Some(PendingPrompt::Neighborhood) {
            session.pending = None;
        }

        let site = site_settings(self.restaurant.as_ref()).await;

        match self.delivery.assess_cep(cep, &site).await {
            Ok(None) => {
                session.pending = Some(PendingPrompt::Neighborhood);
                vec![Reply::text(
                    "Não consegui localizar esse CEP. 😓 Poderia me dizer qual é o seu **bairro**?",
                )]
            }
            Ok(Some(assessment)) => {
                let street = assessment
                    .road
                    .clone()
                    .unwrap_or_else(|| "Rua identificada pelo CEP".to_owned());

                if assessment.in_range {
                    session.nearest_unit = Some(assessment.unit.clone());

                    let mut text = format!(
                        "Boas notícias! 🎉 Localizei a rua **{street}**.\nVocê está a **{:.1}km** da unidade **{}**.\nFazemos entrega aí sim!\n💰 **Taxa de entrega estimada:** {}",
                        assessment.distance_km,
                        assessment.unit.name,
                        assessment.fee.display_brl(),
                    );
                    let status = self.store_status();
                    if !status.open {
                        text.push_str(&format!(
                            "\n\n⚠️ **{}** 🕒\nMas você pode deixar agendado!",
                            status.message
                        ));
                    }

                    let link = assessment.unit.whatsapp_link(&format!(
                        "Olá, gostaria de fazer um pedido para o CEP {cep}"
                    ));
                    vec![Reply::text(text).with_link("Clique aqui para pedir no WhatsApp", link)]
                } else {
                    vec![Reply::text(format!(
                        "Poxa! 😕 A rua **{street}** fica a **{:.1}km** da unidade mais próxima ({}). Para garantir a qualidade, nosso delivery vai até {}km.\n\nMas não fique na vontade! 🍕\nVenha nos visitar em **{}**. O rodízio está incrível e o ambiente é perfeito para sua família. Vale a pena o passeio!",
                        assessment.distance_km,
                        assessment.unit.name,
                        self.delivery.radius_label(),
                        assessment.unit.address,
                    ))]
                }
            }
            Err(err) => {
                warn!(error = %err, "CEP delivery check failed");
                vec![Reply::text(
                    "Tive um problema técnico ao verificar seu CEP. Pode tentar novamente ou chamar no WhatsApp?",
                )]
            }
        }
    }

    /// Followup after an unknown CEP: try the neighbourhood name instead.
    async fn delivery_check_neighborhood(
        &self,
        session: &mut ChatSession,
        neighborhood: &str,
    ) -> Vec<Reply> {
        let site = site_settings(self.restaurant.as_ref()).await;

        match self.delivery.assess_street(neighborhood, &site).await {
            Ok(None) => {
                let maps = format!(
                    "https://www.google.com/maps/search/{}",
                    urlencoding::encode(&site.store_name)
                );
                vec![
                    Reply::text(
                        "Também não consegui localizar o bairro. 😕\n\nMas não fique na vontade! 🍕\nVenha nos visitar em uma de nossas unidades. O rodízio está incrível e vale a pena o passeio!",
                    )
                    .with_link("Encontrar a unidade mais próxima no Mapa", maps),
                ]
            }
            Ok(Some(assessment)) if assessment.in_range => {
                session.nearest_unit = Some(assessment.unit.clone());

                let mut text = format!(
                    "Encontrei seu bairro! 🎉 Você está a aprox. **{:.1}km** da unidade **{}**.\nFazemos entrega aí sim!\n💰 **Taxa de entrega estimada:** {}",
                    assessment.distance_km,
                    assessment.unit.name,
                    assessment.fee.display_brl(),
                );
                let status = self.store_status();
                if !status.open {
                    text.push_str(&format!(
                        "\n\n⚠️ **{}** 🕒\nMas você pode deixar agendado!",
                        status.message
                    ));
                }

                let link = assessment.unit.whatsapp_link(&format!(
                    "Olá, gostaria de fazer um pedido para o bairro {neighborhood}"
                ));
                vec![Reply::text(text).with_link("Clique aqui para pedir no WhatsApp", link)]
            }
            Ok(Some(assessment)) => vec![Reply::text(format!(
                "Poxa! 😕 O bairro {neighborhood} fica a aprox. **{:.1}km** da unidade mais próxima ({}). Para garantir a qualidade, nosso delivery vai até {}km.\n\nMas não fique na vontade! 🍕\nVenha nos visitar em **{}**.",
                assessment.distance_km,
                assessment.unit.name,
                self.delivery.radius_label(),
                assessment.unit.address,
            ))],
            Err(err) => {
                warn!(error = %err, "Neighbourhood delivery check failed");
                vec![Reply::text(
                    "Tive um problema técnico ao verificar seu bairro. Pode tentar chamar no WhatsApp?",
                )]
            }
        }
    }

    // ====== Store clock ======

    /// Open/closed right now, in the restaurant's own time zone.
    pub fn store_status(&self) -> StoreStatus {
        self.hours.status_at(self.local_now())
    }

    fn local_now(&self) -> NaiveDateTime {
        (Utc::now() + chrono::Duration::hours(i64::from(self.utc_offset_hours))).naive_utc()
    }
}

/// First CEP-shaped token, separator stripped.
fn find_cep(text: &str) -> Option<String> {
    CEP_PATTERN.find(text).map(|m| m.as_str().replace('-', ""))
}

enum CategoryChoice {
    /// Show these categories, or the whole menu when `None`.
    Show(Option<Vec<&'static str>>),
    Favorites,
    Unknown,
}

fn parse_category(text: &str) -> CategoryChoice {
    let lower = text.to_lowercase();

    if text == "2" || lower.contains("churrasco") || lower.contains("espeto") {
        CategoryChoice::Show(Some(vec!["Churrasco"]))
    } else if text == "3"
        || lower.contains("hamburguer")
        || lower.contains("burger")
        || lower.contains("lanche")
    {
        CategoryChoice::Show(Some(vec!["Hambúrgueres"]))
    } else if text == "4" || lower.contains("marmita") || lower.contains("almoço") {
        CategoryChoice::Show(Some(vec!["Marmitex"]))
    } else if text == "5" || lower.contains("bebida") || lower.contains("refri") {
        CategoryChoice::Show(Some(vec!["Bebidas"]))
    } else if text == "6"
        || lower.contains("tudo")
        || lower.contains("completo")
        || lower.contains("todos")
    {
        CategoryChoice::Show(None)
    } else if text == "7" || lower.contains("favorito") {
        CategoryChoice::Favorites
    } else if lower.contains("doce") || lower.contains("sobremesa") {
        CategoryChoice::Show(Some(vec!["Pizzas Doces"]))
    } else if lower.contains("salgada") || lower.contains("tradicional") {
        CategoryChoice::Show(Some(vec!["Pizzas Salgadas"]))
    } else if text == "1" || lower.contains("pizza") {
        // Both pizza categories.
        CategoryChoice::Show(Some(vec!["Pizzas Salgadas", "Pizzas Doces"]))
    } else {
        CategoryChoice::Unknown
    }
}

fn section_view(category: &MenuCategory, profile: &CustomerProfile) -> MenuSectionView {
    MenuSectionView {
        title: category.name.clone(),
        items: category
            .items
            .iter()
            .filter(|item| item.visible)
            .map(|item| MenuItemView {
                name: item.name.clone(),
                description: item.description.clone(),
                price: item.price_text.clone(),
                sold_out: item.sold_out,
                favorite: profile.is_favorite(&item.name),
            })
            .collect(),
    }
}

fn show_favorites(profile: &CustomerProfile) -> Reply {
    if profile.favorites.is_empty() {
        return Reply::text(
            "Você ainda não tem favoritos! ⭐\nClique na estrela ao lado dos itens do cardápio para salvar.",
        );
    }

    let items = profile
        .favorites
        .iter()
        .map(|favorite| MenuItemView {
            name: favorite.name.clone(),
            description: favorite.description.clone(),
            price: favorite.price_text.clone(),
            sold_out: false,
            favorite: true,
        })
        .collect();

    Reply::text("⭐ Seus Favoritos:").with_sections(vec![MenuSectionView {
        title: String::new(),
        items,
    }])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forneria_core::DeviceId;

    use super::*;
    use crate::models::FavoriteItem;

    #[test]
    fn test_find_cep_with_and_without_dash() {
        assert_eq!(find_cep("meu cep é 01310-100").as_deref(), Some("01310100"));
        assert_eq!(find_cep("01310100").as_deref(), Some("01310100"));
        assert_eq!(find_cep("entregam aí?"), None);
        // Too short to be a CEP.
        assert_eq!(find_cep("12345-67"), None);
    }

    #[test]
    fn test_intent_patterns() {
        assert!(CHECKOUT_INTENT.is_match("quero finalizar"));
        assert!(CHECKOUT_INTENT.is_match("ver meu carrinho"));
        assert!(LOYALTY_INTENT.is_match("quantos pontos tenho?"));
        assert!(SUGGESTION_INTENT.is_match("o que tem de bom hoje?"));
        assert!(MENU_INTENT.is_match("me mostra o cardápio"));
        assert!(!MENU_INTENT.is_match("cardapiozinho"));
    }

    #[test]
    fn test_parse_category_by_number_and_keyword() {
        assert!(matches!(
            parse_category("2"),
            CategoryChoice::Show(Some(cats)) if cats == ["Churrasco"]
        ));
        assert!(matches!(
            parse_category("quero um lanche"),
            CategoryChoice::Show(Some(cats)) if cats == ["Hambúrgueres"]
        ));
        assert!(matches!(
            parse_category("1"),
            CategoryChoice::Show(Some(cats)) if cats == ["Pizzas Salgadas", "Pizzas Doces"]
        ));
        assert!(matches!(parse_category("ver tudo"), CategoryChoice::Show(None)));
        assert!(matches!(parse_category("7"), CategoryChoice::Favorites));
        assert!(matches!(parse_category("sei lá"), CategoryChoice::Unknown));
    }

    #[test]
    fn test_sweet_pizza_beats_generic_pizza() {
        // "pizza doce" must land on the sweet category, not on both.
        assert!(matches!(
            parse_category("pizza doce"),
            CategoryChoice::Show(Some(cats)) if cats == ["Pizzas Doces"]
        ));
    }

    #[test]
    fn test_show_favorites_empty_and_filled() {
        let mut profile = CustomerProfile::default();
        let reply = show_favorites(&profile);
        assert!(reply.text.contains("ainda não tem favoritos"));

        profile.toggle_favorite(FavoriteItem {
            name: "Calabresa".to_owned(),
            price_text: "R$ 49,90".to_owned(),
            description: String::new(),
        });
        let reply = show_favorites(&profile);
        assert_eq!(reply.menu_sections.len(), 1);
        assert_eq!(reply.menu_sections[0].items[0].name, "Calabresa");
        assert!(reply.menu_sections[0].items[0].favorite);
    }

    #[test]
    fn test_section_view_hides_invisible_items() {
        use crate::models::MenuItem;

        let category = MenuCategory {
            name: "Pizzas Salgadas".to_owned(),
            items: vec![
                MenuItem {
                    name: "Calabresa".to_owned(),
                    description: String::new(),
                    price_text: "R$ 49,90".to_owned(),
                    photo: None,
                    visible: true,
                    sold_out: true,
                },
                MenuItem {
                    name: "Secreta".to_owned(),
                    description: String::new(),
                    price_text: "R$ 99,00".to_owned(),
                    photo: None,
                    visible: false,
                    sold_out: false,
                },
            ],
        };

        let view = section_view(&category, &CustomerProfile::default());
        assert_eq!(view.items.len(), 1);
        assert!(view.items[0].sold_out);
    }

    #[test]
    fn test_busy_reply_is_pt_br() {
        assert!(BUSY_REPLY.contains("momentinho"));
    }

    // Cart handling does not touch the collaborators, so a service with
    // unreachable endpoints works fine here.
    fn offline_service() -> ChatService {
        use crate::clients::{NominatimClient, RestaurantClient};
        use crate::config::{DeliveryConfig, GeocodeConfig, RestaurantApiConfig};
        use forneria_core::Money;
        use std::time::Duration;

        let restaurant: Arc<dyn RestaurantApi> = Arc::new(
            RestaurantClient::new(
                &RestaurantApiConfig {
                    base_url: "http://127.0.0.1:9".to_owned(),
                },
                Duration::from_millis(10),
            )
            .unwrap(),
        );
        let geocoder = Arc::new(
            NominatimClient::new(
                &GeocodeConfig {
                    nominatim_url: "http://127.0.0.1:9".to_owned(),
                    viacep_url: "http://127.0.0.1:9".to_owned(),
                    region_hint: "SP".to_owned(),
                },
                Duration::from_millis(10),
            )
            .unwrap(),
        );
        let delivery = DeliveryService::new(
            geocoder,
            DeliveryConfig {
                radius_km: 6.0,
                fee_base: Money::from_cents(300),
                fee_per_km: Money::from_cents(150),
            },
        );
        let checkout = CheckoutService::new(Arc::clone(&restaurant), delivery.clone());
        ChatService::new(
            restaurant,
            delivery,
            checkout,
            KnowledgeBase::default(),
            -3,
        )
    }

    #[test]
    fn test_add_item_suggests_a_drink_once() {
        let service = offline_service();
        let mut session = ChatSession::new(DeviceId::generate());

        let replies = service.add_item(&mut session, "Pizza Calabresa", "R$ 49,90");
        assert!(replies[0].text.contains("**Pizza Calabresa** adicionado"));
        assert!(replies[0].text.contains("1 item(ns)"));
        assert_eq!(replies.len(), 2, "non-drink add should suggest a drink");

        let replies = service.add_item(&mut session, "Guaraná 2L", "R$ 12,00");
        assert_eq!(replies.len(), 1, "drink add should not suggest another");

        let replies = service.add_item(&mut session, "Pizza Quatro Queijos", "R$ 55,00");
        assert_eq!(replies.len(), 1, "cart already has a drink");
    }

    #[test]
    fn test_remove_last_item_prompts_menu() {
        let service = offline_service();
        let mut session = ChatSession::new(DeviceId::generate());
        session.cart.add(CartLine::new("Pizza", "R$ 40,00"));

        let replies = service.remove_item(&mut session, 0);
        assert!(replies[0].text.contains("carrinho ficou vazio"));
        assert_eq!(session.pending, Some(PendingPrompt::MenuCategory));
    }

    #[test]
    fn test_remove_with_items_left_is_silent() {
        let service = offline_service();
        let mut session = ChatSession::new(DeviceId::generate());
        session.cart.add(CartLine::new("Pizza", "R$ 40,00"));
        session.cart.add(CartLine::new("Coca", "R$ 10,00"));

        let replies = service.remove_item(&mut session, 1);
        assert!(replies.is_empty());
        assert_eq!(session.cart.len(), 1);
    }
}
