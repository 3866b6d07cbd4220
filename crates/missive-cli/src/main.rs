#![forbid(unsafe_code)]

mod client;
mod cmd;
mod output;
mod session;
mod viewer;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use missive_core::config::load_user_config;
use output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    name = "missive",
    version,
    about = "missive: letter authoring and envelope-reveal viewing",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Server base URL (overrides the user config).
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Open a shared letter",
        long_about = "Fetch a shared letter by slug and open the envelope viewer.",
        after_help = "EXAMPLES:\n    # Open the interactive viewer\n    missive open for-you\n\n    # Print the whole letter for pipes\n    missive open for-you --plain\n\n    # Machine-readable\n    missive open for-you --json"
    )]
    Open(cmd::open::OpenArgs),

    #[command(
        next_help_heading = "Session",
        about = "Log in as a staff user",
        after_help = "EXAMPLES:\n    missive login --username admin\n    missive login --username admin --password secret"
    )]
    Login(cmd::auth::LoginArgs),

    #[command(next_help_heading = "Session", about = "Discard the stored session")]
    Logout,

    #[command(next_help_heading = "Session", about = "Show the logged-in user")]
    Whoami,

    #[command(
        next_help_heading = "Manage",
        subcommand,
        about = "Manage letters (staff only)",
        after_help = "EXAMPLES:\n    missive letters list\n    missive letters new --title \"For You\" --recipient Robin --type-id <UUID> --text \"hello\"\n    missive letters edit <UUID> --publish\n    missive letters delete <UUID>"
    )]
    Letters(cmd::letters::LettersCmd),

    #[command(
        next_help_heading = "Manage",
        subcommand,
        about = "Manage letter types (staff only)",
        after_help = "EXAMPLES:\n    missive types list\n    missive types new --name Birthday"
    )]
    Types(cmd::types::TypesCmd),
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("MISSIVE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_server_url(flag: Option<&str>) -> Result<String> {
    if let Some(url) = flag {
        return Ok(url.to_string());
    }
    Ok(load_user_config()?.server_url)
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();
    let server_url = resolve_server_url(cli.server.as_deref())?;

    match &cli.command {
        Commands::Open(args) => cmd::open::run_open(args, &server_url, output),
        Commands::Login(args) => cmd::auth::run_login(args, &server_url, output),
        Commands::Logout => cmd::auth::run_logout(&server_url, output),
        Commands::Whoami => cmd::auth::run_whoami(&server_url, output),
        Commands::Letters(sub) => cmd::letters::run_letters(sub, &server_url, output),
        Commands::Types(sub) => cmd::types::run_types(sub, &server_url, output),
    }
}
