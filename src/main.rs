use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use synodsm::client::DEFAULT_TIMEOUT_MS;
use synodsm::commands;
use synodsm::config::{ConfigFileData, config_file_path, load_config_from};
use synodsm::credentials::KeyringStore;
use synodsm::display::print_torrent_tasks;
use synodsm::entities::TaskAction;

#[derive(Parser)]
#[command(name = "synodsm", version)]
#[command(about = "Manage BitTorrent tasks of a Synology Download Station", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.synodsm)
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(global = true, long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Save server, user and password
    Init {
        server: String,
        user: String,
        password: String,
    },

    #[command(flatten)]
    Server(ServerCommand),
}

/// Commands that log in to the server
#[derive(Subcommand)]
enum ServerCommand {
    /// List BitTorrent tasks
    List,

    /// Add a task from a torrent URL or magnet link
    #[command(visible_alias = "add")]
    AddUri { uri: String },

    /// Remove a task
    Remove { task_id: String },

    /// Pause a task
    Pause { task_id: String },

    /// Resume a task
    Resume { task_id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => config_file_path()?,
    };
    let secrets = KeyringStore;

    match cli.command {
        Commands::Init {
            server,
            user,
            password,
        } => {
            commands::init(&config_path, &secrets, &server, &user, &password)?;
            println!("Configuration saved");
        }
        Commands::Server(command) => {
            let config = load_config_from(&config_path)?;
            run(command, &config, &secrets, cli.timeout_ms).await?;
        }
    }

    Ok(())
}

async fn run(
    command: ServerCommand,
    config: &ConfigFileData,
    secrets: &KeyringStore,
    timeout_ms: u64,
) -> Result<()> {
    match command {
        ServerCommand::List => {
            let tasks = commands::list(config, secrets, timeout_ms).await?;
            print_torrent_tasks(&tasks);
        }
        ServerCommand::AddUri { uri } => {
            commands::add_uri(config, secrets, timeout_ms, &uri).await?;
            println!("Task successfully added to Download Station");
        }
        ServerCommand::Remove { task_id } => {
            commands::manage_task(config, secrets, timeout_ms, &task_id, TaskAction::Delete).await?;
            println!("Task {task_id} successfully removed");
        }
        ServerCommand::Pause { task_id } => {
            commands::manage_task(config, secrets, timeout_ms, &task_id, TaskAction::Pause).await?;
            println!("Task {task_id} successfully paused");
        }
        ServerCommand::Resume { task_id } => {
            commands::manage_task(config, secrets, timeout_ms, &task_id, TaskAction::Resume).await?;
            println!("Task {task_id} successfully resumed");
        }
    }

    Ok(())
}
