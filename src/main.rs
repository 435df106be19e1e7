use std::sync::Arc;

use clap::{Parser, Subcommand};
use fastgpt_plugin::api::{AppState, create_router};
use fastgpt_plugin::client::{SearchClient, SearchParams, UserSettings};
use fastgpt_plugin::config::Config;

#[derive(Parser)]
#[command(version, about = "FastGPT search plugin and the proxy it talks to")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the plugin proxy server
    Serve,
    /// Search through a running plugin proxy
    Search {
        keyword: String,
        #[arg(long, env = "PLUGIN_SERVER_URL")]
        server: Option<String>,
        #[arg(long, env = "KAGI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (also picks up log crate records)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    match Cli::parse().command {
        Command::Serve => serve().await,
        Command::Search {
            keyword,
            server,
            api_key,
        } => {
            let settings = UserSettings {
                plugin_server_url: server,
                api_key,
            };
            let content = SearchClient::new()
                .search(&SearchParams { keyword }, &settings)
                .await?;
            println!("{content}");
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let state = Arc::new(AppState::from_config(&config));
    let router = create_router(state, &config.plugins);

    let listener = tokio::net::TcpListener::bind(&config.address).await?;
    tracing::info!(
        address = %config.address,
        prefix = %config.plugins.prefix,
        "plugin proxy listening"
    );
    axum::serve(listener, router).await?;
    Ok(())
}
