use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use authbridge::{new_auth_store, telemetry, AppConfig, AuthBridge, Identity, LocalIdentityProvider};

/// Environment variable pointing at a JSON config file
const CONFIG_PATH_VAR: &str = "AUTHBRIDGE_CONFIG";

/// A line typed on stdin
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Login { uid: String, email: Option<String> },
    Logout,
    Status,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "login" => {
            let uid = parts.next()?.to_string();
            let email = parts.next().map(str::to_string);
            Some(Command::Login { uid, email })
        }
        "logout" => Some(Command::Logout),
        "status" => Some(Command::Status),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn load_configuration() -> Result<AppConfig> {
    match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => AppConfig::from_file(&path).with_context(|| format!("loading {path}")),
        Err(_) => AppConfig::from_env().context("loading configuration from environment"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let env_file_path = dotenvy::dotenv().ok();

    telemetry::init_tracing()?;
    info!("authbridge starting");

    match env_file_path {
        Some(path) => info!("Loaded environment variables from {}", path.display()),
        None => debug!("No .env file found. Using existing environment variables."),
    };

    let config = load_configuration()?;

    let provider = Arc::new(LocalIdentityProvider::initialize(config.provider.clone()));
    let store = Arc::new(new_auth_store(&config.store_name));

    // Log every state the store takes on
    let mut observer = store.subscribe();
    tokio::spawn(async move {
        while let Some(state) = observer.changed().await {
            info!(
                is_logged_in = state.is_logged_in(),
                uid = state.uid().unwrap_or("-"),
                origin = ?state.origin(),
                "Auth state changed"
            );
        }
    });

    let bridge = AuthBridge::new(Arc::clone(&provider), Arc::clone(&store));
    bridge.start().await?;

    println!("commands: login <id> [email] | logout | status | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Some(Command::Login { uid, email }) => {
                let mut identity = Identity::new(uid);
                identity.email = email;
                provider.sign_in(identity).await;
            }
            Some(Command::Logout) => {
                provider.sign_out().await;
            }
            Some(Command::Status) => {
                println!("{}", serde_json::to_string_pretty(&store.get())?);
            }
            Some(Command::Quit) => break,
            None if line.trim().is_empty() => {}
            None => warn!(input = %line.trim(), "Unrecognized command"),
        }
    }

    bridge.stop().await;
    info!(writes = store.write_count(), "authbridge shutting down");
    Ok(())
}
