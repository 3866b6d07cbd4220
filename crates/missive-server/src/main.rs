use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use missive_core::auth::hash_password;
use missive_core::config::{ServerConfig, load_server_config};
use missive_core::db::{open_db, query};

use missive_server::{AppState, build_router};

#[derive(Parser, Debug)]
#[command(
    name = "missived",
    version,
    about = "REST API server for missive letters",
    after_help = "EXAMPLES:\n    \
        missived\n    \
        missived --config /etc/missive/missive.toml\n    \
        missived --init-admin admin:changeme\n\n\
        Set MISSIVE_LOG (e.g. MISSIVE_LOG=debug) to control log verbosity."
)]
struct Args {
    /// Path to the server config file
    #[arg(long, default_value = "missive.toml")]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the configured database path
    #[arg(long)]
    database: Option<PathBuf>,

    /// Create a staff account as USER:PASSWORD if the username is free.
    /// Falls back to the MISSIVE_INIT_ADMIN environment variable.
    #[arg(long, value_name = "USER:PASSWORD")]
    init_admin: Option<String>,
}

fn init_admin_spec(args: &Args) -> Option<String> {
    args.init_admin
        .clone()
        .or_else(|| std::env::var("MISSIVE_INIT_ADMIN").ok())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("MISSIVE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(mut config: ServerConfig, args: &Args) -> ServerConfig {
    if let Some(bind) = &args.bind {
        config.bind_addr.clone_from(bind);
    }
    if let Some(database) = &args.database {
        config.database_path.clone_from(database);
    }
    config
}

fn init_admin(conn: &rusqlite::Connection, spec: &str) -> Result<()> {
    let Some((username, password)) = spec.split_once(':') else {
        bail!("--init-admin expects USER:PASSWORD");
    };
    if password.is_empty() {
        bail!("--init-admin password must not be empty");
    }

    if query::find_credentials(conn, username)?.is_some() {
        tracing::info!(username, "admin account already exists, skipping");
        return Ok(());
    }

    let hash = hash_password(password);
    query::insert_user(conn, username, "", &hash, true, true)?;
    tracing::info!(username, "admin account created");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for ctrl-c");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_server_config(&args.config)?;
    let config = apply_overrides(config, &args);

    let conn = open_db(&config.database_path)?;
    if let Some(spec) = init_admin_spec(&args) {
        init_admin(&conn, &spec)?;
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(conn, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Args, apply_overrides, init_admin};
    use clap::Parser;
    use missive_core::config::ServerConfig;
    use missive_core::db::{open_in_memory, query};

    #[test]
    fn cli_overrides_win_over_config() {
        let args = Args::parse_from(["missived", "--bind", "0.0.0.0:9000"]);
        let config = apply_overrides(ServerConfig::default(), &args);
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(
            config.database_path,
            std::path::PathBuf::from("missive.sqlite3")
        );
    }

    #[test]
    fn init_admin_creates_staff_once() {
        let conn = open_in_memory().expect("open db");

        init_admin(&conn, "admin:secret").expect("first init");
        assert!(query::staff_user_exists(&conn).expect("staff check"));

        // Re-running does not fail or duplicate.
        init_admin(&conn, "admin:other").expect("second init");
        let (_, hash) = query::find_credentials(&conn, "admin")
            .expect("query")
            .expect("admin exists");
        assert!(missive_core::auth::verify_password("secret", &hash));
    }

    #[test]
    fn init_admin_rejects_malformed_specs() {
        let conn = open_in_memory().expect("open db");
        assert!(init_admin(&conn, "no-colon").is_err());
        assert!(init_admin(&conn, "user:").is_err());
    }
}
