//! CLI options.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::prelude::*;

mod parsers;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Opts {
    /// Sentry DSN
    #[arg(short, long, env = "HOUSE_PRICE_PREDICTOR_SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Performance traces sample rate for Sentry
    #[arg(long, default_value = "0", value_parser = parsers::sample_rate)]
    pub traces_sample_rate: f32,

    #[command(subcommand)]
    pub subcommand: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Web(WebOpts),
    Predict(PredictOpts),

    /// Prints the logged predictions
    History(HistoryOpts),

    /// Prints the statistics over the logged predictions
    Stats(HistoryOpts),

    /// Deletes the logged predictions
    ClearHistory(HistoryOpts),
}

#[derive(Args, Clone)]
pub struct HistoryOpts {
    /// Prediction history JSON document
    #[arg(long = "history", default_value = "prediction_history.json", env = "HISTORY_PATH")]
    pub history_path: PathBuf,
}

/// Model and history locations.
#[derive(Args, Clone)]
pub struct ServiceOpts {
    /// Trained model: JSON, or a pickle for `.pkl` and `.pickle`
    #[arg(long = "model", default_value = "house_model.json", env = "MODEL_PATH")]
    pub model_path: PathBuf,

    #[command(flatten)]
    pub history: HistoryOpts,

    /// Bounds a single model inference, for example: `500ms`
    #[arg(long, value_parser = humantime::parse_duration)]
    pub inference_timeout: Option<StdDuration>,
}

/// Runs the web application
#[derive(Args)]
pub struct WebOpts {
    #[command(flatten)]
    pub service: ServiceOpts,

    /// Web application bind host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Web application bind port
    #[arg(short, long, default_value = "10000", env = "PORT")]
    pub port: u16,

    /// Service name reported by the health check
    #[arg(long, default_value = "House Price Predictor")]
    pub service_name: String,
}

/// Predicts the house price and logs the prediction
#[derive(Args)]
pub struct PredictOpts {
    #[command(flatten)]
    pub service: ServiceOpts,

    /// Median income, house age, average rooms, average bedrooms, population,
    /// average occupation, latitude and longitude. Defaults to an example block
    #[arg(value_parser = parsers::finite_f64, allow_negative_numbers = true)]
    pub features: Vec<f64>,
}
