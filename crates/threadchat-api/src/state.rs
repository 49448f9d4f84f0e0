//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and the
//! web server. Core services are generic over repository/backend traits, but
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use threadchat_core::conversation::store::ConversationStore;
use threadchat_core::exchange::ConversationExchangeHandler;
use threadchat_core::message::store::MessageStore;
use threadchat_infra::backend::http::HttpChatBackend;
use threadchat_infra::config::{load_config, resolve_data_dir, resolve_database_url};
use threadchat_infra::sqlite::conversation::SqliteConversationRepository;
use threadchat_infra::sqlite::message::SqliteMessageRepository;
use threadchat_infra::sqlite::pool::DatabasePool;
use threadchat_types::config::AppConfig;

use crate::http::render::Templates;

/// Concrete type alias for the exchange handler pinned to infra implementations.
pub type ConcreteExchangeHandler = ConversationExchangeHandler<
    SqliteConversationRepository,
    SqliteMessageRepository,
    HttpChatBackend,
>;

/// Shared application state.
///
/// Used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub exchange: Arc<ConcreteExchangeHandler>,
    pub templates: Arc<Templates>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    ///
    /// `backend_url` overrides `[backend] base_url` from the config file.
    pub async fn init(backend_url: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;

        let mut config = load_config(&data_dir).await;
        if let Some(url) = backend_url {
            config.backend.base_url = url;
        }

        let db_url = resolve_database_url(&config, &data_dir);
        let db_pool = DatabasePool::new(&db_url)
            .await
            .with_context(|| format!("opening database {db_url}"))?;

        let backend = HttpChatBackend::from_config(&config.backend)?;
        tracing::debug!(
            base_url = %backend.base_url(),
            timeout_secs = config.backend.effective_timeout_secs(),
            "Chat backend configured"
        );

        Self::from_parts(config, data_dir, db_pool, backend)
    }

    /// Wire services over an already opened pool and backend client.
    pub fn from_parts(
        config: AppConfig,
        data_dir: PathBuf,
        db_pool: DatabasePool,
        backend: HttpChatBackend,
    ) -> anyhow::Result<Self> {
        let exchange = ConversationExchangeHandler::new(
            ConversationStore::new(SqliteConversationRepository::new(db_pool.clone())),
            MessageStore::new(SqliteMessageRepository::new(db_pool.clone())),
            backend,
        );

        let templates = Templates::new().context("compiling templates")?;

        Ok(Self {
            exchange: Arc::new(exchange),
            templates: Arc::new(templates),
            config,
            data_dir,
            db_pool,
        })
    }
}
