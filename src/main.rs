use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// colloquium - academic events and networking
#[derive(Parser)]
#[command(name = "colloquium")]
#[command(about = "Academic events, registrations and moderation", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server with notification workers and reminder scheduler
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run notification workers and the reminder scheduler without HTTP
    Worker,
    /// Run one reminder sweep and exit
    Sweep,
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Change a user's role
    User {
        #[arg(long)]
        email: String,

        #[arg(long, value_enum)]
        role: cli::user::Role,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = colloquium::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    colloquium::observability::init_observability("colloquium", &config.observability)?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Worker => cli::worker::work(config).await,
        Commands::Sweep => cli::worker::sweep(config).await,
        Commands::Migrate => cli::migrate::migrate(config).await,
        Commands::Reset => cli::migrate::reset(config).await,
        Commands::User { email, role } => cli::user::set_role(config, email, role).await,
    }
}
