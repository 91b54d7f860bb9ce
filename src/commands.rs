//! Command implementations for the CLI

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::demo::{self, ScenarioPlayer};
use crate::landing::{pricing_tiers, NavMenu, PriceMode, Section};
use crate::models::{OutboundMessage, WebhookPayload};
use crate::tui::{self, LogTail};
use crate::whatsapp::catalog;
use crate::whatsapp::handler::{Outbox, WebhookHandler};
use crate::whatsapp::payload::{
    create_category_selection_message, create_confirm_buttons_message, create_main_menu_message,
    create_product_action_message, create_product_list_message, create_text_message,
    messages_endpoint,
};
use crate::whatsapp::routing::{route_button_click, ConversationState};
use crate::whatsapp::session::InMemorySessionStore;
use crate::whatsapp::webhook::{parse_webhook_json, verify_subscription};
use crate::PayloadKind;

/// Product used by the `product-actions` payload.
const SAMPLE_PRODUCT: &str = "prod_makita_hr2470";
/// Category used by the `product-list` payload.
const SAMPLE_CATEGORY: &str = "rotary";

/// Launch the scenario player. Flags override the config file.
pub async fn demo(
    scenarios: Option<&Path>,
    contact: Option<String>,
    no_nav: bool,
    no_dots: bool,
    no_caption: bool,
    logs: LogTail,
) -> Result<()> {
    let config = Config::load()?;
    let mut options = config.player_options();
    if let Some(contact) = contact {
        options.contact_name = contact;
    }
    options.show_navigation &= !no_nav;
    options.show_dots &= !no_dots;
    options.show_caption &= !no_caption;

    let scenarios = demo::load_scenarios(scenarios)?;
    tracing::info!("Loaded {} scenario(s)", scenarios.len());
    let player = ScenarioPlayer::new(scenarios, options)?;
    tui::run(player, logs).await
}

pub fn list_scenarios(scenarios: Option<&Path>) -> Result<()> {
    let scenarios = demo::load_scenarios(scenarios)?;

    println!("\nScenarios:");
    println!("{:-<60}", "");
    for (idx, scenario) in scenarios.iter().enumerate() {
        let replies = scenario.messages.iter().filter(|m| m.is_customer()).count();
        println!("{}. {}", idx + 1, scenario.title);
        println!(
            "   {} messages ({} from the customer)",
            scenario.messages.len(),
            replies
        );
    }
    Ok(())
}

fn build_payload(kind: PayloadKind, to: &str) -> Result<OutboundMessage> {
    let message = match kind {
        PayloadKind::Text => create_text_message(to, "שלום! איך אפשר לעזור?", false),
        PayloadKind::MainMenu => create_main_menu_message(to)?,
        PayloadKind::Categories => create_category_selection_message(to)?,
        PayloadKind::ProductActions => {
            let product = catalog::product_by_id(SAMPLE_PRODUCT)
                .with_context(|| format!("Unknown product {}", SAMPLE_PRODUCT))?;
            create_product_action_message(to, &product.name)?
        }
        PayloadKind::ProductList => {
            create_product_list_message(to, &catalog::products_by_category(SAMPLE_CATEGORY))
        }
        PayloadKind::Confirm => create_confirm_buttons_message(
            to,
            "לאשר את הבקשה להצעת מחיר?",
            "confirm_order",
            None,
        )?,
    };
    Ok(message)
}

pub fn print_payload(kind: PayloadKind, to: &str) -> Result<()> {
    let message = build_payload(kind, to)?;

    let config = Config::load()?;
    match config.phone_number_id.as_deref() {
        Some(phone_number_id) => tracing::info!(
            "POST {}",
            messages_endpoint(&config.api_version, phone_number_id)
        ),
        None => tracing::debug!("No phone_number_id configured, skipping endpoint"),
    }

    let json = serde_json::to_string_pretty(&message).context("Failed to serialize payload")?;
    println!("{}", json);
    Ok(())
}

pub fn parse_file(path: &Path) -> Result<()> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let interactions = parse_webhook_json(&body)
        .with_context(|| format!("Invalid webhook JSON in {}", path.display()))?;

    if interactions.is_empty() {
        tracing::info!("No messages in {} (status-only notification?)", path.display());
    }
    let json =
        serde_json::to_string_pretty(&interactions).context("Failed to serialize interactions")?;
    println!("{}", json);
    Ok(())
}

pub fn route(button: &str, state: ConversationState) {
    let next = route_button_click("cli", button, state);
    println!("{} --{}--> {}", state, button, next);
}

pub fn simulate(files: &[PathBuf]) -> Result<()> {
    let mut handler = WebhookHandler::new(InMemorySessionStore::new(), Outbox::new());

    for path in files {
        let body = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let payload: WebhookPayload = serde_json::from_str(&body)
            .with_context(|| format!("Invalid webhook JSON in {}", path.display()))?;

        let handled = handler.handle_payload(&payload)?;
        tracing::info!(
            "{}: {} message(s) in, {} queued",
            path.display(),
            handled,
            handler.sink().len()
        );

        println!("\n{}", path.display());
        println!("{:-<60}", "");
        let queued = handler.sink_mut().drain();
        if queued.is_empty() {
            println!("  (nothing sent)");
        }
        for item in queued {
            println!("[{}] {}", item.id, item.message.summary());
        }
    }

    println!("\nSessions:");
    println!("{:-<60}", "");
    for (user, session) in handler.store().iter_sorted() {
        println!("{}: {}", user, session.state);
        if let Some(category) = &session.context.category {
            println!("  Category: {}", category);
        }
        if let Some(product) = &session.context.product_id {
            println!("  Product:  {}", product);
        }
    }
    Ok(())
}

pub fn verify(mode: &str, token: &str, challenge: &str) -> Result<()> {
    let config = Config::load()?;
    let Some(verify_token) = config.verify_token.as_deref() else {
        bail!(
            "No verify_token configured (set it in {})",
            Config::config_path()?.display()
        );
    };

    match verify_subscription(mode, token, challenge, verify_token) {
        Some(challenge) => {
            tracing::info!("Webhook verified");
            println!("{}", challenge);
            Ok(())
        }
        None => bail!("Verification failed (mode {:?})", mode),
    }
}

pub fn sections(price_mode: Option<PriceMode>, goto: Option<&str>) -> Result<()> {
    let mut menu = NavMenu::default();

    if let Some(anchor) = goto {
        let section =
            Section::from_anchor(anchor).with_context(|| format!("Unknown section #{}", anchor))?;
        menu.toggle();
        tracing::debug!("Menu open: {}", menu.open);
        println!("#{}", menu.scroll_to(section));
        return Ok(());
    }

    println!("\nSections:");
    println!("{:-<60}", "");
    for section in Section::ALL {
        println!("#{}", section.anchor());
    }

    println!("\nNavbar:");
    println!("{:-<60}", "");
    for item in menu.items() {
        println!("{} -> #{}", item.label, item.target.anchor());
    }

    println!("\nPricing:");
    println!("{:-<60}", "");
    for tier in pricing_tiers(price_mode) {
        let period = match tier.mode {
            PriceMode::OneTime => "one-time",
            PriceMode::Monthly => "per month",
        };
        println!("{}  {} ({})", tier.name, tier.price_label(), period);
        println!("  {}", tier.blurb);
    }
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save()?;
    println!("Wrote {}", path.display());
    Ok(())
}
