//! Interactive terminal chat against the assistant engine.
//!
//! Wires the same engine the HTTP service uses, against the real
//! collaborators, and drives it from stdin. The widget adds items to the
//! cart through buttons; here the `/add`, `/rm` and `/carrinho` commands
//! stand in for them.
//!
//! # Usage
//!
//! ```bash
//! forneria chat
//! forneria chat --device my-test-device
//! ```
//!
//! Inside the session:
//!
//! ```text
//! /add Pizza Calabresa | R$ 49,90    add a cart line
//! /rm 1                              remove cart line 1
//! /carrinho                          show the cart
//! /sair                              leave
//! ```
//!
//! # Environment Variables
//!
//! The same set the service reads; see `AssistantConfig::from_env`.

use std::io::Write as _;

use forneria_assistant::config::{AssistantConfig, ConfigError};
use forneria_assistant::models::{ChatSession, Reply};
use forneria_assistant::ports::ProfileError;
use forneria_assistant::state::{AppState, StateInitError};
use forneria_core::DeviceId;
use thiserror::Error;

/// Errors that can occur while running the terminal chat.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration could not be loaded from the environment.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The engine and its clients could not be built.
    #[error("Engine setup error: {0}")]
    State(#[from] StateInitError),

    /// The customer profile could not be read or written.
    #[error("Profile store error: {0}")]
    Profile(#[from] ProfileError),

    /// Terminal input or output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Run an interactive chat session.
pub async fn run(device: Option<String>) -> Result<(), ChatError> {
    let config = AssistantConfig::from_env()?;
    let state = AppState::new(config)?;

    let device = device.map_or_else(DeviceId::generate, DeviceId::from_token);
    println!("device: {device}");

    let shared = state.sessions().create(device.clone()).await;

    let greeting = state.chat().start_session().await;
    println!("== {} ==", greeting.assistant_name);
    for reply in &greeting.replies {
        print_reply(reply);
    }

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("/sair") {
            break;
        }

        let mut session = shared.lock().await;

        if text.eq_ignore_ascii_case("/carrinho") {
            print_cart(&session);
            continue;
        }
        if let Some(rest) = text.strip_prefix("/add ") {
            let Some((name, price)) = rest.split_once('|') else {
                println!("uso: /add Nome do Item | R$ 49,90");
                continue;
            };
            let replies = state.chat().add_item(&mut session, name.trim(), price.trim());
            for reply in &replies {
                print_reply(reply);
            }
            continue;
        }
        if let Some(rest) = text.strip_prefix("/rm ") {
            let Ok(number) = rest.trim().parse::<usize>() else {
                println!("uso: /rm 1");
                continue;
            };
            // The printed cart counts from 1.
            let replies = state.chat().remove_item(&mut session, number.saturating_sub(1));
            for reply in &replies {
                print_reply(reply);
            }
            print_cart(&session);
            continue;
        }

        let mut profile = state.profiles().load(&device).await?;
        let replies = state
            .chat()
            .handle_message(&mut session, &mut profile, text)
            .await;
        state.profiles().save(&device, &profile).await?;
        drop(session);

        for reply in &replies {
            print_reply(reply);
        }
    }

    println!("Até a próxima! 🍕");
    Ok(())
}

/// Print one bot reply, with its sections, link and quick replies.
fn print_reply(reply: &Reply) {
    println!("{}", reply.text);

    for section in &reply.menu_sections {
        if !section.title.is_empty() {
            println!("--- {} ---", section.title);
        }
        for item in &section.items {
            let mut line = format!("  {} ({})", item.name, item.price);
            if item.sold_out {
                line.push_str(" [esgotado]");
            }
            if item.favorite {
                line.push_str(" ⭐");
            }
            println!("{line}");
            if !item.description.is_empty() {
                println!("      {}", item.description);
            }
        }
    }

    if let Some(link) = &reply.link {
        println!("  [{}] {}", link.label, link.url);
    }

    if !reply.quick_replies.is_empty() {
        let options: Vec<&str> = reply
            .quick_replies
            .iter()
            .map(|quick| quick.label.as_str())
            .collect();
        println!("  ({})", options.join(" | "));
    }
}

/// Print the cart with 1-based line numbers, matching `/rm`.
fn print_cart(session: &ChatSession) {
    if session.cart.is_empty() {
        println!("carrinho vazio");
        return;
    }
    for (index, item) in session.cart.lines().iter().enumerate() {
        println!("  {}. {} ({})", index + 1, item.name, item.price_text);
    }
    println!("  total: {}", session.cart.subtotal().display_brl());
}
