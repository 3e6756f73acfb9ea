use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use tupange_client::net::api::HttpPortalApi;
use tupange_client::net::types::Role;
use tupange_client::state::app::Portal;
use tupange_client::state::profile::ProfileRecord;
use tupange_client::state::session::AuthFailure;
use tupange_client::store::TokenStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Auth(#[from] AuthFailure),
    #[error("invalid role `{0}`; expected patient, doctor, or admin")]
    InvalidRole(String),
    #[error("no active session; run `tupange login` first")]
    NotAuthenticated,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tupange", about = "Tupange Portal session and dashboard CLI")]
struct Cli {
    #[arg(long, env = "TUPANGE_BASE_URL", default_value = "http://127.0.0.1:8000/api/v1")]
    base_url: String,

    #[arg(long, env = "TUPANGE_TOKEN_PATH", default_value = ".tupange/access_token")]
    token_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and persist the session token.
    Login { email: String, password: String },
    /// Register a new account, then log in with it.
    Register {
        email: String,
        password: String,
        #[arg(long, default_value = "patient")]
        role: String,
    },
    /// Clear the persisted session. Always succeeds.
    Logout,
    /// Show the restored session's identity.
    Me,
    /// Show the restored session's dashboard state.
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let api = Arc::new(HttpPortalApi::new(&cli.base_url));
    let tokens = TokenStore::new(cli.token_path);
    let (portal, _navigations) = Portal::new(api, tokens);

    match cli.command {
        Command::Login { email, password } => {
            portal.login(&email, &password).await?;
            print_identity(&portal, "logged in")
        }
        Command::Register { email, password, role } => {
            let role = parse_role(&role)?;
            portal.register(&email, &password, role).await?;
            print_identity(&portal, "registered")
        }
        Command::Logout => {
            portal.logout();
            print_json(&serde_json::json!({ "status": "logged out" }))
        }
        Command::Me => {
            portal.restore().await;
            print_identity(&portal, "active")
        }
        Command::Dashboard => {
            portal.restore().await;
            print_dashboard(&portal)
        }
    }
}

fn parse_role(raw: &str) -> Result<Role, CliError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "patient" => Ok(Role::Patient),
        "doctor" => Ok(Role::Doctor),
        "admin" => Ok(Role::Admin),
        _ => Err(CliError::InvalidRole(raw.to_owned())),
    }
}

fn print_identity(portal: &Portal, status: &str) -> Result<(), CliError> {
    let session = portal.session.snapshot();
    let user = session.user.as_ref().ok_or(CliError::NotAuthenticated)?;
    print_json(&serde_json::json!({
        "status": status,
        "id": user.id,
        "email": user.email,
        "role": serde_json::to_value(user.role)?,
        "is_active": user.is_active,
    }))
}

fn print_dashboard(portal: &Portal) -> Result<(), CliError> {
    let session = portal.session.snapshot();
    let user = session.user.as_ref().ok_or(CliError::NotAuthenticated)?;
    let view = portal.dashboard.snapshot();

    let profile = match &view.profile {
        Some(ProfileRecord::Patient(p)) => serde_json::to_value(p)?,
        Some(ProfileRecord::Doctor(d)) => serde_json::to_value(d)?,
        None => Value::Null,
    };

    print_json(&serde_json::json!({
        "display_name": portal.dashboard.display_name(user),
        "role": serde_json::to_value(user.role)?,
        "pending_approval": view.pending_approval,
        "badge": view.badge,
        "profile": profile,
        "notifications": serde_json::to_value(portal.dashboard.notifications.snapshot())?,
    }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
