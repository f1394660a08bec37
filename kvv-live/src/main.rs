//! Command-line front-end for the live departure client.
//!
//! Thin wrapper: parses arguments, calls the library and prints one line
//! per result. Errors go to stderr and exit non-zero; there are no
//! retries.

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kvv_live::kvv::{DEFAULT_MAX_INFOS, KvvClient, KvvConfig, KvvError};

#[derive(Debug, Parser)]
#[command(name = "kvv-live", about = "Query the KVV live departure monitor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for stops by name, id or coordinates
    Search {
        /// Stop name (the service does the fuzzy matching)
        #[arg(long)]
        name: Option<String>,

        /// Stop id
        #[arg(long, conflicts_with = "name")]
        id: Option<String>,

        /// Latitude and longitude
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], conflicts_with_all = ["name", "id"])]
        coordinates: Option<Vec<f64>>,
    },

    /// List upcoming departures for a stop
    Departures {
        /// Id of the stop
        #[arg(long)]
        stopid: String,

        /// Limit the response to a single route
        #[arg(long)]
        route: Option<String>,

        /// Print all times as relative countdowns
        #[arg(long)]
        relative: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // The built-in key is the one the public web app uses; KVV_API_KEY
    // overrides it.
    let config = match std::env::var("KVV_API_KEY") {
        Ok(key) => KvvConfig::new(key),
        Err(_) => KvvConfig::default(),
    };

    let result = match KvvClient::new(config) {
        Ok(client) => run(&client, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(client: &KvvClient, command: Command) -> Result<(), KvvError> {
    match command {
        Command::Search {
            name,
            id,
            coordinates,
        } => {
            let stops = if let Some(name) = name {
                client.search_by_name(&name).await?
            } else if let Some(id) = id {
                client.search_by_stop_id(&id).await?
            } else if let Some(coordinates) = coordinates {
                client.search_by_latlon(coordinates[0], coordinates[1]).await?
            } else {
                Vec::new()
            };

            for stop in &stops {
                println!("{stop}");
            }
        }

        Command::Departures {
            stopid,
            route,
            relative,
        } => {
            let departures = match route {
                Some(route) => {
                    client
                        .get_departures_by_route(&stopid, &route, DEFAULT_MAX_INFOS)
                        .await?
                }
                None => client.get_departures(&stopid, DEFAULT_MAX_INFOS).await?,
            };

            let now = Local::now().naive_local();
            for departure in &departures {
                println!("{}", departure.pretty_format(now, relative));
            }
        }
    }

    Ok(())
}
