//! CLI interface for trip-flights

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use trip_flights::logging::{init_logging, LoggingConfig};
use trip_flights::{
    format_duration, resolve_airport_code, FlightClient, FlightSearch, FlightSearchRequest,
    FlightSearchResult, ProxyConfig,
};

#[derive(Parser)]
#[command(name = "trip-flights")]
#[command(about = "Search SerpAPI Google Flights from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for flights
    Search {
        /// Origin airport code or city
        #[arg(short, long)]
        from: String,
        /// Destination airport code or city
        #[arg(short, long)]
        to: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        date: NaiveDate,
        /// Return date for round trips (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        return_date: Option<NaiveDate>,
        /// SerpAPI key (defaults to SERPAPI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<String>,
        /// Number of options to list in the summary
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Print the airport code used for each city
    Resolve {
        /// City names (e.g. "New York", Bali)
        #[arg(required = true)]
        cities: Vec<String>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got {}: {}", value, e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Diagnostics go to stderr; stdout carries the results.
    if let Err(e) = init_logging(&LoggingConfig::from_env()) {
        eprintln!("Logging disabled: {}", e);
    }

    match cli.command {
        Commands::Search {
            from,
            to,
            date,
            return_date,
            api_key,
            output,
            limit,
        } => {
            if let Some(return_date) = return_date {
                if return_date < date {
                    bail!("return date {} is before departure date {}", return_date, date);
                }
            }

            let config = ProxyConfig::from_env();
            let api_key = api_key
                .filter(|k| !k.trim().is_empty())
                .or(config.fallback_api_key.clone())
                .context("API key is required (--api-key or SERPAPI_API_KEY)")?;

            let origin = resolve_airport_code(&from);
            let destination = resolve_airport_code(&to);
            println!("Searching for flights {} -> {}...", origin, destination);

            let mut request =
                FlightSearchRequest::new(origin, destination, date.to_string(), api_key);
            if let Some(return_date) = return_date {
                request = request.with_return_date(return_date.to_string());
            }

            let client = FlightClient::with_endpoint(&config.endpoint)?;
            match client.search(&request).await {
                Ok(result) => {
                    let json = serde_json::to_string_pretty(&result)?;

                    if let Some(output_file) = output {
                        fs::write(&output_file, &json)?;
                        println!("Results saved to {}", output_file);
                    } else {
                        println!("{}", json);
                    }

                    print_summary(&result, limit);
                }
                Err(e) => {
                    eprintln!("Error searching for flights: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Resolve { cities } => {
            for city in cities {
                println!("{} -> {}", city, resolve_airport_code(&city));
            }
        }
    }

    Ok(())
}

fn print_summary(result: &FlightSearchResult, limit: usize) {
    println!("\nSummary:");
    println!("Found {} flight options", result.best_options.len());

    for (index, option) in result.best_options.iter().take(limit).enumerate() {
        let airline = option
            .legs
            .first()
            .map(|leg| leg.airline_name.as_str())
            .unwrap_or("Unknown");
        let stops = option.layovers.len();

        println!(
            "{:>2}. {} - ${} - {} - {} stop{} - CO2 {}",
            index + 1,
            airline,
            option.price,
            format_duration(option.total_duration_minutes),
            stops,
            if stops == 1 { "" } else { "s" },
            option.carbon_emissions.difference_label(),
        );
        if let Some(url) = option.booking_url() {
            println!("    {}", url);
        }
    }

    if result.best_options.len() > limit {
        println!(
            "Showing top {} flights out of {} available options",
            limit,
            result.best_options.len()
        );
    }
}
