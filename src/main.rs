//! Parts Concierge binary - composition root.
//!
//! Wires the crate into a small interactive chat loop:
//! 1. Load configuration from the environment
//! 2. Build the completion providers (or the offline mock when keyless)
//! 3. Build the session cache (Redis when configured, in-memory otherwise)
//! 4. Seed a demo catalog and run a stdin REPL

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use parts_concierge::adapters::ai::{
    AnthropicConfig, AnthropicProvider, CircuitBreakerConfig, MockCompletionProvider,
    OpenAIConfig, OpenAIProvider, ResilientCompletionClient,
};
use parts_concierge::adapters::{
    HashEmbedder, InMemoryConversationLog, InMemoryProductStore, InMemorySessionCache,
    RedisSessionCache,
};
use parts_concierge::application::{Orchestrator, SessionContextStore};
use parts_concierge::config::{AiProvider, AppConfig};
use parts_concierge::domain::agent::UiAction;
use parts_concierge::domain::conversation::ConversationTurn;
use parts_concierge::domain::foundation::{ConversationId, UserId};
use parts_concierge::ports::{CompletionProvider, ConversationLog, ProductRecord, SessionCache};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Parts Concierge v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    config.validate()?;

    let (primary, fallback) = build_providers(&config);
    let client = Arc::new(ResilientCompletionClient::with_breaker_config(
        primary,
        fallback,
        CircuitBreakerConfig {
            failure_threshold: config.ai.breaker_failure_threshold,
            reset_window: config.ai.breaker_reset_window(),
        },
    ));

    let cache = build_session_cache(&config).await;
    let sessions = SessionContextStore::new(cache).with_ttl(config.session.ttl());

    let store = Arc::new(InMemoryProductStore::new());
    let embedder = Arc::new(HashEmbedder::new());
    seed_catalog(&store, embedder.as_ref()).await;

    let orchestrator = Orchestrator::new(client, store, embedder, sessions);
    let log = InMemoryConversationLog::new();
    let conversation_id = ConversationId::new();
    let user_id = UserId::new("local-user")?;

    println!("Parts Concierge. Ask about appliance parts; Ctrl-D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }

        let history = log.replay(conversation_id).await?;
        let response = orchestrator.process(&user_id, utterance, &history).await;

        println!("{}", response.message);
        for product in &response.products {
            match product.price {
                Some(price) => println!("  [{}] {} (${price:.2})", product.part_number, product.name),
                None => println!("  [{}] {}", product.part_number, product.name),
            }
        }
        for action in &response.actions {
            print_action(action);
        }

        log.append(conversation_id, ConversationTurn::user(utterance))
            .await?;
        log.append(
            conversation_id,
            ConversationTurn::assistant(&response.message),
        )
        .await?;
    }

    Ok(())
}

/// Builds primary and fallback providers from the configuration.
///
/// Without any API key the process runs fully offline against a canned mock,
/// which keeps the catalog and session paths usable for local development.
fn build_providers(
    config: &AppConfig,
) -> (Arc<dyn CompletionProvider>, Arc<dyn CompletionProvider>) {
    let openai: Option<Arc<dyn CompletionProvider>> =
        config.ai.openai_api_key.as_ref().filter(|k| !k.is_empty()).map(|key| {
            Arc::new(OpenAIProvider::new(
                OpenAIConfig::new(key.clone())
                    .with_model(config.ai.openai_model.clone())
                    .with_timeout(config.ai.timeout()),
            )) as Arc<dyn CompletionProvider>
        });
    let anthropic: Option<Arc<dyn CompletionProvider>> =
        config.ai.anthropic_api_key.as_ref().filter(|k| !k.is_empty()).map(|key| {
            Arc::new(AnthropicProvider::new(
                AnthropicConfig::new(key.clone())
                    .with_model(config.ai.anthropic_model.clone())
                    .with_timeout(config.ai.timeout()),
            )) as Arc<dyn CompletionProvider>
        });

    let mock = || {
        Arc::new(MockCompletionProvider::new().always_respond(
            "I can look up parts and check compatibility, but free-form answers need a \
             configured completion provider.",
        )) as Arc<dyn CompletionProvider>
    };

    match (openai, anthropic) {
        (Some(openai), Some(anthropic)) => match config.ai.primary_provider {
            AiProvider::OpenAI => (openai, anthropic),
            AiProvider::Anthropic => (anthropic, openai),
        },
        (Some(openai), None) => (openai, mock()),
        (None, Some(anthropic)) => (anthropic, mock()),
        (None, None) => {
            tracing::warn!("no completion provider configured; running with canned responses");
            (mock(), mock())
        }
    }
}

/// Builds the session cache: Redis when a URL is configured, else in-memory.
async fn build_session_cache(config: &AppConfig) -> Arc<dyn SessionCache> {
    if let Some(url) = config.redis.url.as_deref().filter(|u| !u.is_empty()) {
        match connect_redis(url).await {
            Ok(conn) => {
                tracing::info!("session cache backed by Redis");
                return Arc::new(
                    RedisSessionCache::new(conn)
                        .with_key_prefix(config.redis.key_prefix.clone()),
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, using in-memory session cache");
            }
        }
    }
    Arc::new(InMemorySessionCache::new())
}

async fn connect_redis(
    url: &str,
) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
    let client = redis::Client::open(url)?;
    client.get_multiplexed_tokio_connection().await
}

/// Seeds a handful of demo products so lookups work out of the box.
async fn seed_catalog(store: &InMemoryProductStore, embedder: &HashEmbedder) {
    let records = [
        ProductRecord {
            part_number: "PS11752778".to_string(),
            name: "Refrigerator door shelf bin".to_string(),
            description: "Clear door shelf bin for bottom-freezer refrigerators".to_string(),
            price: 34.95,
            product_url: Some("https://example.com/parts/PS11752778".to_string()),
            install_guide_url: Some("https://example.com/guides/PS11752778".to_string()),
        },
        ProductRecord {
            part_number: "PS354363".to_string(),
            name: "Dishwasher drain pump".to_string(),
            description: "Drain pump and motor assembly for dishwashers".to_string(),
            price: 52.40,
            product_url: Some("https://example.com/parts/PS354363".to_string()),
            install_guide_url: None,
        },
        ProductRecord {
            part_number: "PS2071928".to_string(),
            name: "Dryer heating element".to_string(),
            description: "Heating element assembly for electric dryers".to_string(),
            price: 41.99,
            product_url: Some("https://example.com/parts/PS2071928".to_string()),
            install_guide_url: Some("https://example.com/guides/PS2071928".to_string()),
        },
    ];
    for record in records {
        let embedding = embedder.embed_sync(&record.description);
        store.insert_with_embedding(record, embedding).await;
    }
    store.set_fitment("PS11752778", "WDT780SAEM1", true).await;
    store.set_fitment("PS354363", "WDT780SAEM1", true).await;
    store.set_fitment("PS2071928", "WDT780SAEM1", false).await;
}

fn print_action(action: &UiAction) {
    match action {
        UiAction::InputRequest { prompt, .. } => println!("  ? {prompt}"),
        UiAction::ButtonGroup { prompt, options } => {
            println!("  ? {prompt}: {}", options.join(" | "));
        }
        UiAction::ProductDisplay { part_numbers } => {
            println!("  * showing: {}", part_numbers.join(", "));
        }
        UiAction::GuideLink { title, url } => println!("  * {title}: {url}"),
        UiAction::CompletionOffer { suggestions } => {
            println!("  ? Anything else? {}", suggestions.join(" | "));
        }
    }
}
