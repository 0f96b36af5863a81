//! Binary entrypoint for the Ebus CLI.
//!
//! Commands:
//! - `start` - run the interactive management console
//! - `init` - create a starter `config.toml` and the data directory
//! - `status` - print version, backend mode, and per-collection health
//! - `seed-admin --email <email>` - interactively create an admin account
//!
//! See the library crate docs for module-level details: `ebus::`.
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use ebus::backend::MemoryBackend;
use ebus::config::Config;
use ebus::console::app::ConsoleApp;
use ebus::console::auth::{AuthGateway, Registration};
use ebus::console::roles::Role;

#[derive(Parser)]
#[command(name = "ebus")]
#[command(about = "Management console for a bus-transport booking service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive console
    Start,
    /// Initialize a new console configuration
    Init,
    /// Show console status and collection health
    Status,
    /// Create an administrator account without the registration code prompt
    SeedAdmin {
        /// Admin account email
        #[arg(long)]
        email: String,
        /// First name on the account record
        #[arg(long, default_value = "System")]
        first_name: String,
        /// Last name on the account record
        #[arg(long, default_value = "Admin")]
        last_name: String,
        /// Contact phone on the account record
        #[arg(long, default_value = "0000000000")]
        phone: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes it)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    match &cli.command {
        Commands::Init => {
            // Init doesn't have config yet
        }
        _ => init_logging(&pre_config, cli.verbose),
    }

    match cli.command {
        Commands::Start => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            info!("Starting Ebus v{}", env!("CARGO_PKG_VERSION"));
            let backend = open_backend(&config).await?;
            let mut app = ConsoleApp::new(config, backend.clone(), backend);
            app.run().await?;
        }
        Commands::Init => {
            init_logging(&None, cli.verbose);
            info!("Initializing new console configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            let cfg = Config::default();
            tokio::fs::create_dir_all(&cfg.backend.data_dir).await?;
            info!("Data directory ready at {}", cfg.backend.data_dir);
        }
        Commands::Status => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            let backend = open_backend(&config).await?;
            let app = ConsoleApp::new(config, backend.clone(), backend);
            app.show_status().await?;
        }
        Commands::SeedAdmin {
            email,
            first_name,
            last_name,
            phone,
        } => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            if config.backend.ephemeral {
                println!("Error: backend.ephemeral is set; a seeded account would not persist.");
                return Ok(());
            }
            println!("Creating admin account for '{}'.", email);
            // Prompt twice without echo
            let pass1 = rpassword::prompt_password("New password: ")?;
            let pass2 = rpassword::prompt_password("Confirm password: ")?;
            if pass1 != pass2 {
                println!("Error: passwords do not match.");
                return Ok(());
            }
            let backend = open_backend(&config).await?;
            let gateway = AuthGateway::new(
                backend.clone(),
                backend,
                config.security.admin_registration_code.clone(),
            );
            let registration = Registration {
                first_name,
                last_name,
                email: email.clone(),
                password: pass1,
                confirm_password: pass2,
                phone,
                role: Role::Admin,
                admin_code: config.security.admin_registration_code.clone(),
            };
            match gateway.register(&registration).await {
                Ok(()) => println!("Admin account created for {email}."),
                Err(e) => println!("Error: {e}"),
            }
        }
    }

    Ok(())
}

async fn open_backend(config: &Config) -> Result<Arc<MemoryBackend>> {
    let backend = if config.backend.ephemeral {
        MemoryBackend::new()
    } else {
        MemoryBackend::open(&config.backend.snapshot_path()).await?
    };
    Ok(Arc::new(backend))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    let log_file = config.as_ref().and_then(|cfg| cfg.logging.file.clone());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));

            // Check if stdout is a terminal (TTY) - if so, write to both
            // file and console; under a service unit or pipe, file only
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                // Always write to log file
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        } else {
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                )
            });
        }
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
