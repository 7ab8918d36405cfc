use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use warden::app_state::AppState;
use warden::commands;
use warden::fixture::Fixture;
use warden::init_tracing::init_tracing;
use warden::settings::config::Settings;
use warden_types::{AssetId, UserId};

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Access control lists for vocabulary assets")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Create default access control lists for all assets lacking one
    InitAcls {
        /// YAML file describing users, groups, roles and assets
        #[arg(long, env = "WARDEN_FIXTURE")]
        fixture: PathBuf,
        /// Act as this user instead of running without a current user
        #[arg(long = "as")]
        acting_as: Option<String>,
    },
    /// Print the access decisions for a user on an asset
    Check {
        #[arg(long, env = "WARDEN_FIXTURE")]
        fixture: PathBuf,
        #[arg(long)]
        user: String,
        #[arg(long)]
        asset: String,
    },
    /// Print the access control list of an asset as JSON
    Show {
        #[arg(long, env = "WARDEN_FIXTURE")]
        fixture: PathBuf,
        #[arg(long)]
        asset: String,
    },
    /// Print the OpenAPI schemas of the access control list DTOs
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env.local first: dotenvy never overrides variables that are already set
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::new().context("Failed to load configuration")?;

    init_tracing(settings.log_level.as_deref())?;

    let output = match cli.command {
        Commands::Config => commands::show_config(&settings),
        Commands::Schema => commands::schema()?,
        Commands::InitAcls { fixture, acting_as } => {
            let fixture = Fixture::load(&fixture).await?;
            let acting_as = acting_as.map(UserId::from);
            let state = AppState::from_fixture(settings, &fixture, acting_as.as_ref()).await?;
            commands::init_acls(&state, &fixture).await?
        }
        Commands::Check {
            fixture,
            user,
            asset,
        } => {
            let fixture = Fixture::load(&fixture).await?;
            let state = AppState::from_fixture(settings, &fixture, None).await?;
            commands::check(&state, &fixture, &UserId::from(user), &AssetId::from(asset)).await?
        }
        Commands::Show { fixture, asset } => {
            let fixture = Fixture::load(&fixture).await?;
            let state = AppState::from_fixture(settings, &fixture, None).await?;
            commands::show(&state, &fixture, &AssetId::from(asset)).await?
        }
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
