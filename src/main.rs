#![warn(clippy::all)]

use clap::Parser;

use crate::history::HistoryStore;
use crate::model::LinearRegression;
use crate::opts::{Command, Opts, ServiceOpts};
use crate::prelude::*;
use crate::service::PredictionService;

mod cli;
mod helpers;
mod history;
mod model;
mod opts;
mod prelude;
mod service;
mod statistics;
mod tracing;
mod web;

#[tokio::main]
async fn main() -> Result {
    let opts = Opts::parse();
    let _sentry_guard = crate::tracing::init(opts.sentry_dsn, opts.traces_sample_rate)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting…");

    let result = run_subcommand(opts.subcommand).await;
    if let Err(error) = &result {
        error!("fatal error: {:#}", error);
    }
    result
}

async fn run_subcommand(command: Command) -> Result {
    match command {
        Command::Web(opts) => web::run(&opts, create_service(&opts.service)?).await,
        Command::Predict(opts) => {
            cli::predict(&create_service(&opts.service)?, opts.features).await
        }
        Command::History(opts) => cli::print_history(&HistoryStore::new(opts.history_path)),
        Command::Stats(opts) => cli::print_statistics(&HistoryStore::new(opts.history_path)),
        Command::ClearHistory(opts) => cli::clear_history(&HistoryStore::new(opts.history_path)),
    }
}

/// Loads the model once, the service then shares it between all the requests.
fn create_service(opts: &ServiceOpts) -> Result<PredictionService> {
    let model = LinearRegression::load(&opts.model_path)?;
    let history = HistoryStore::new(&opts.history.history_path);
    info!(path = %history.path().display(), "using the history");
    Ok(PredictionService::new(Arc::new(model), Arc::new(history))
        .with_inference_timeout(opts.inference_timeout))
}
