use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use search_transport::config::load_config;
use search_transport::index::SearchQuery;
use search_transport::observability::logging::init_logging;
use search_transport::{RequestOptions, SearchClient};

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Command line client for the search API transport", long_about = None)]
struct Cli {
    /// Client configuration file (TOML).
    #[arg(short, long, default_value = "search.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured hosts and their health
    Hosts,
    /// Search an index
    Search {
        index: String,
        query: String,
        #[arg(long)]
        hits_per_page: Option<u32>,
    },
    /// Print the settings of an index
    GetSettings { index: String },
    /// Wait until a task is published
    WaitTask { index: String, task_id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_logging(&config.log_level)?;

    let client = SearchClient::new(config)?;
    let options = RequestOptions::new();

    match cli.command {
        Commands::Hosts => {
            print_json(&client.hosts())?;
        }
        Commands::Search {
            index,
            query,
            hits_per_page,
        } => {
            let mut query = SearchQuery::new(query);
            if let Some(n) = hits_per_page {
                query = query.with_hits_per_page(n);
            }
            let result = client
                .init_index(index)
                .search::<Value>(&query, &options)
                .await?;
            print_json(&result)?;
        }
        Commands::GetSettings { index } => {
            let settings = client.init_index(index).get_settings(&options).await?;
            print_json(&settings)?;
        }
        Commands::WaitTask { index, task_id } => {
            let outcome = client.init_index(index).wait_task(task_id, &options).await;
            if outcome.is_done() {
                println!("task {task_id} published after {} check(s)", outcome.checks);
            } else {
                eprintln!("stopped waiting for task {task_id} after {} check(s)", outcome.checks);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
