//! Room chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomchat-server
//! cargo run --bin roomchat-server -- --host 0.0.0.0 --port 3000 --tokens-file tokens.json
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use roomchat_server::{
    config::{DEFAULT_HISTORY_LIMIT, ServerConfig},
    domain::{AdminElection, IdentityProvider, RandomElection, RoomPolicy},
    infrastructure::{
        history::{InMemoryHistoryStore, inmemory::DEFAULT_CAPACITY},
        identity::{GuestIdentityProvider, StaticTokenIdentityProvider},
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::{AppState, Server},
};
use roomchat_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "roomchat-server")]
#[command(about = "Room-based group chat relay over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Highest accepted room id
    #[arg(long, default_value_t = RoomPolicy::DEFAULT_MAX_ROOM_ID)]
    max_room_id: u32,

    /// Maximum number of rooms alive at the same time
    #[arg(long, default_value_t = RoomPolicy::DEFAULT_MAX_ROOMS)]
    max_rooms: usize,

    /// Maximum number of members per room
    #[arg(long, default_value_t = RoomPolicy::DEFAULT_MAX_MEMBERS)]
    max_members: usize,

    /// Number of recent messages sent to a joiner
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Allow rooms without a password
    #[arg(long)]
    allow_open_rooms: bool,

    /// Seed for admin election (reproducible runs)
    #[arg(long)]
    election_seed: Option<u64>,

    /// JSON token table; when omitted any non-empty token is accepted as a guest name
    #[arg(long)]
    tokens_file: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            policy: RoomPolicy {
                max_room_id: args.max_room_id,
                max_rooms: args.max_rooms,
                max_members: args.max_members,
                require_secret: !args.allow_open_rooms,
            },
            history_limit: args.history_limit,
            election_seed: args.election_seed,
            tokens_file: args.tokens_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(&args);
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. HistoryStore / IdentityProvider
    // 4. AppState (UseCases)
    // 5. Server

    // 1. Create Repository (in-memory registry)
    let election: Box<dyn AdminElection> = match config.election_seed {
        Some(seed) => Box::new(RandomElection::seeded(seed)),
        None => Box::new(RandomElection::new()),
    };
    let repository = Arc::new(InMemoryRoomRepository::new(config.policy, election));
    tracing::info!(
        "Room registry ready: ids 1..={}, {} rooms, {} members per room",
        config.policy.max_room_id,
        config.policy.max_rooms,
        config.policy.max_members
    );

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create HistoryStore and IdentityProvider
    let history = Arc::new(InMemoryHistoryStore::new(
        config.history_limit.max(DEFAULT_CAPACITY),
    ));
    let identity_provider: Arc<dyn IdentityProvider> = match &config.tokens_file {
        Some(path) => match StaticTokenIdentityProvider::from_file(path) {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                tracing::error!("Failed to load token table: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("No token table given, accepting guest credentials");
            Arc::new(GuestIdentityProvider)
        }
    };

    // 4. Create UseCases
    let app_state = AppState::new(
        config.policy,
        repository,
        message_pusher,
        history,
        identity_provider,
        Arc::new(SystemClock),
        config.history_limit,
    );

    // 5. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
