use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use chanboard::auth::{create_admin_account, AccountError, RegistrationRequest};
use chanboard::{AccountRepository, ChanError, Config, Database, Result, WebServer};

/// chanboard - image board web API
#[derive(Parser)]
#[command(name = "chanboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default)
    Serve,

    /// Create an admin account
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_with_env(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", cli.config);
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = chanboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        chanboard::logging::init_console_only(&config.logging.level);
    }

    match run(cli.command.unwrap_or(Commands::Serve), config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Serve => {
            config.validate()?;
            info!("chanboard starting");
            info!(
                "Server configured on {}:{}",
                config.web.host, config.web.port
            );

            let db = Database::open(&config.database.path).await?;
            WebServer::new(&config, db)?.run().await
        }
        Commands::CreateAdmin {
            email,
            username,
            password,
        } => {
            let db = Database::open(&config.database.path).await?;
            let repo = AccountRepository::new(db.pool());
            let request = RegistrationRequest::new(email, username, password);

            let account = create_admin_account(&repo, request)
                .await
                .map_err(|e| match e {
                    AccountError::Store(e) => e,
                    e => ChanError::Validation(e.to_string()),
                })?;
            info!(account_id = account.id, username = %account.username, "Admin account created");
            Ok(())
        }
    }
}
