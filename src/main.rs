use anyhow::Result;
use clap::{Parser, Subcommand};
use forecast_engine::commands::{analyze, forecast};
use forecast_engine::config::ForecastConfig;
use log::info;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "forecast-engine")]
#[command(about = "Consensus price forecasts from daily candle history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the next days from a JSON array of candles
    Forecast {
        /// Candle file ({date, close, stockId?, volume?} objects, oldest first)
        candles: PathBuf,
        /// Number of future days to project
        #[arg(long)]
        days_ahead: Option<usize>,
        /// Number of Monte Carlo paths
        #[arg(long)]
        simulations: Option<usize>,
        /// Seed for reproducible Monte Carlo output
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the trend-regression forecaster
        #[arg(long)]
        no_linear_regression: bool,
        /// Skip the moving-average momentum forecaster
        #[arg(long)]
        no_moving_average: bool,
        /// Skip the Monte Carlo forecaster
        #[arg(long)]
        no_monte_carlo: bool,
        /// Write the response here instead of stdout
        #[arg(short, long = "output", value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the latest indicator readings and market regime
    Analyze {
        /// Candle file ({date, close, stockId?, volume?} objects, oldest first)
        candles: PathBuf,
        /// Write the snapshot here instead of stdout
        #[arg(short, long = "output", value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting forecast engine. Statistical projections only, not trading advice.");

    match cli.command {
        Commands::Forecast {
            candles,
            days_ahead,
            simulations,
            seed,
            no_linear_regression,
            no_moving_average,
            no_monte_carlo,
            output,
        } => {
            let settings: HashMap<String, String> = env::vars().collect();
            let mut config = ForecastConfig::from_settings_map(&settings)?;
            if let Some(days_ahead) = days_ahead {
                config.days_ahead = days_ahead;
            }
            if let Some(simulations) = simulations {
                config.monte_carlo_simulations = simulations;
            }
            if seed.is_some() {
                config.monte_carlo_seed = seed;
            }
            config.include_linear_regression &= !no_linear_regression;
            config.include_moving_average &= !no_moving_average;
            config.include_monte_carlo &= !no_monte_carlo;

            let succeeded = forecast::run(&candles, config, output.as_deref())?;
            if !succeeded {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Analyze { candles, output } => {
            analyze::run(&candles, output.as_deref())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
