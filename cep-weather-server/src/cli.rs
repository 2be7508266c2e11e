use anyhow::Context;
use cep_weather_core::{Config, TemperatureService};
use clap::{Parser, Subcommand};
use inquire::Password;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::{api, logging};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cep-weather-server", version, about = "Current temperature by Brazilian CEP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Store the WeatherAPI.com key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => serve().await,
            Command::Configure => configure(),
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::load_with_env().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    let service = TemperatureService::from_config(&config)?;
    let app = api::router(service);

    let addr = build_socket_addr(&config)?;
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Server running on {}", addr);
    axum::serve(listener, app).await.context("HTTP server terminated")?;

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_weather_api_key(api_key.to_string());
    config.save()?;

    println!("Saved WeatherAPI key to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_socket_addr(config: &Config) -> anyhow::Result<SocketAddr> {
    let ip: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host '{}'", config.server.host))?;

    Ok(SocketAddr::from((ip, config.server.port)))
}
