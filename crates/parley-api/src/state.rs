//! Application state wiring the store, service, and gateway together.
//!
//! AppState holds the concrete instances used by both the CLI and the HTTP
//! server. The service and gateway are generic over the repository trait,
//! but AppState pins them to the SQLite implementation.

use std::sync::Arc;

use parley_core::gateway::ChatGateway;
use parley_core::service::message::MessageService;
use parley_infra::sqlite::message::SqliteMessageRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_types::config::ServerConfig;

/// Concrete type aliases for the generics pinned to infra implementations.
pub type ConcreteMessageService = MessageService<SqliteMessageRepository>;

pub type ConcreteChatGateway = ChatGateway<SqliteMessageRepository>;

/// Shared application state.
///
/// The gateway is constructed here and handed to every component that needs
/// to broadcast; nothing looks it up globally.
#[derive(Clone)]
pub struct AppState {
    pub message_service: Arc<ConcreteMessageService>,
    pub gateway: Arc<ConcreteChatGateway>,
    pub config: Arc<ServerConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire service and gateway.
    ///
    /// The gateway starts `Pending`; `serve` opens it once the listener is bound.
    pub async fn init(config: ServerConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url).await?;

        let message_service = Arc::new(MessageService::new(SqliteMessageRepository::new(
            db_pool.clone(),
        )));
        let gateway = Arc::new(ChatGateway::new(
            message_service.clone(),
            config.history_limit,
        ));

        Ok(Self {
            message_service,
            gateway,
            config: Arc::new(config),
            db_pool,
        })
    }
}
