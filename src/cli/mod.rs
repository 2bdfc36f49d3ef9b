//! CLI commands for coopguard using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::capability::FoodSafetyHandler;
use crate::client::{format_verdict, run_loop, stdin_lines, Requester, SafetyCheck};
use crate::config::{load_settings_or_default, ClientSettings, ServerSettings, Settings};
use crate::core::identity::service_identity;
use crate::core::Dispatcher;
use crate::logging::LogProfile;
use crate::web::router::{DISCOVERY_PATH, HEALTH_PATH};
use crate::web::{run_server, WebServerConfig};

/// coopguard - ask an agent whether a food is safe for chickens.
#[derive(Parser)]
#[command(name = "coopguard")]
#[command(version = "0.1.0")]
#[command(about = "coopguard - Point-to-point agent exchange for chicken food safety", long_about = None)]
pub struct Commands {
    /// Settings file (default: ~/.coopguard/settings.json)
    #[arg(long, global = true, env = "COOPGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server URL for client commands
    #[arg(long, global = true, env = "COOPGUARD_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the exchange server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// JSON file with "safe" and "unsafe" food lists
        #[arg(long)]
        foods: Option<PathBuf>,
    },

    /// Check a food item (interactive when --food is omitted)
    Check {
        /// Food item to check
        #[arg(short, long)]
        food: Option<String>,
    },

    /// Discover available services
    Discover,

    /// Check server health
    Health,
}

impl Commands {
    /// Logging profile for the chosen command.
    pub fn log_profile(&self) -> LogProfile {
        match self.command {
            Command::Serve { .. } => LogProfile::Server,
            _ => LogProfile::Client,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let settings = load_settings_or_default(self.config.as_deref());

        match &self.command {
            Command::Serve { host, port, foods } => {
                let server = ServerSettings {
                    host: host.clone().unwrap_or(settings.server.host),
                    port: port.unwrap_or(settings.server.port),
                    foods_file: foods.clone().or(settings.server.foods_file),
                };
                cmd_serve(server).await
            }
            Command::Check { food } => {
                let requester = Requester::new(&self.client_settings(settings))?;
                match food {
                    Some(food) => cmd_check(&requester, food).await,
                    None => cmd_interactive(&requester).await,
                }
            }
            Command::Discover => {
                let requester = Requester::new(&self.client_settings(settings))?;
                cmd_discover(&requester).await
            }
            Command::Health => {
                let requester = Requester::new(&self.client_settings(settings))?;
                cmd_health(&requester).await
            }
        }
    }

    fn client_settings(&self, settings: Settings) -> ClientSettings {
        match &self.server {
            Some(server_url) => ClientSettings {
                server_url: server_url.clone(),
                ..settings.client
            },
            None => settings.client,
        }
    }
}

// Command implementations

async fn cmd_serve(server: ServerSettings) -> Result<()> {
    let tables = server.food_tables()?;
    let handler = Arc::new(FoodSafetyHandler::new(tables));
    let dispatcher = Arc::new(Dispatcher::new(handler, service_identity()));

    println!("Starting Chicken Food Safety A2A Server...");
    println!("Endpoints:");
    for capability in dispatcher.discovery().services {
        println!(
            "  {:<4} {} - {}",
            capability.method, capability.endpoint, capability.description
        );
    }
    println!("  GET  {} - Health check", HEALTH_PATH);
    println!("  GET  {} - Service discovery", DISCOVERY_PATH);
    println!();
    println!("Press Ctrl+C to stop");

    let config = WebServerConfig {
        host: server.host,
        port: server.port,
    };
    run_server(config, dispatcher).await?;
    Ok(())
}

async fn cmd_check(requester: &Requester, food: &str) -> Result<()> {
    let verdict = requester.check_food_safety(food).await?;
    println!("{}", format_verdict(&verdict));
    Ok(())
}

async fn cmd_interactive(requester: &Requester) -> Result<()> {
    println!("🐔 Chicken Food Safety Checker (A2A Client)");
    println!("Connected to: {}", requester.base_url());
    println!("Type food items to check their safety for chickens.");
    println!("Type 'quit' or 'exit' to stop.\n");

    let mut stdout = std::io::stdout();
    run_loop(requester, stdin_lines(), &mut stdout, interrupted()).await
}

async fn cmd_discover(requester: &Requester) -> Result<()> {
    let services = requester.discover().await?;
    println!("Available Services:");
    println!("{}", serde_json::to_string_pretty(&services)?);
    Ok(())
}

async fn cmd_health(requester: &Requester) -> Result<()> {
    let health = requester.health().await?;
    println!("Server Health:");
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_overrides() {
        let args = Commands::try_parse_from([
            "coopguard", "serve", "--port", "9000", "--foods", "/tmp/foods.json",
        ])
        .unwrap();

        assert_eq!(args.log_profile(), LogProfile::Server);
        match args.command {
            Command::Serve { host, port, foods } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
                assert_eq!(foods, Some(PathBuf::from("/tmp/foods.json")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn server_flag_overrides_settings() {
        let args = Commands::try_parse_from([
            "coopguard", "--server", "http://coop.test:9000", "check", "--food", "kale",
        ])
        .unwrap();

        assert_eq!(args.log_profile(), LogProfile::Client);
        let client = args.client_settings(Settings::default());
        assert_eq!(client.server_url, "http://coop.test:9000");
        assert_eq!(client.timeout_secs, 30);
    }

    #[test]
    fn check_without_food_is_interactive() {
        let args = Commands::try_parse_from(["coopguard", "check"]).unwrap();
        assert!(matches!(args.command, Command::Check { food: None }));
    }
}
