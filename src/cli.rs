//! Command-line front end over the same service the web application uses.

use std::io::{self, Write};

use crate::helpers::format_elapsed;
use crate::history::{HistoryStore, PredictionRecord};
use crate::prelude::*;
use crate::service::PredictionService;
use crate::statistics::Statistics;

/// Predicts for the given features, or for the example block when none are given.
pub async fn predict(service: &PredictionService, features: Vec<f64>) -> Result {
    let start_instant = Instant::now();
    let data = (!features.is_empty()).then_some(features);
    let record = service.predict(data).await?;
    info!(elapsed = %format_elapsed(start_instant), "predicted");
    write_prediction(&mut io::stdout().lock(), &record)?;
    Ok(())
}

pub fn print_history(store: &HistoryStore) -> Result {
    let records = store.load_all();
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &records)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn print_statistics(store: &HistoryStore) -> Result {
    let mut stdout = io::stdout().lock();
    match Statistics::compute(&store.load_all()) {
        Some(statistics) => write_statistics(&mut stdout, &statistics)?,
        None => writeln!(stdout, "No predictions yet")?,
    }
    Ok(())
}

pub fn clear_history(store: &HistoryStore) -> Result {
    store.clear()?;
    println!("History cleared");
    Ok(())
}

fn write_prediction(writer: &mut impl Write, record: &PredictionRecord) -> Result {
    writeln!(
        writer,
        "{:.4} × {} (≈ ${:.0})",
        record.prediction,
        PredictionRecord::UNIT,
        record.prediction * 100_000.0,
    )?;
    Ok(())
}

fn write_statistics(writer: &mut impl Write, statistics: &Statistics) -> Result {
    writeln!(writer, "Total:   {}", statistics.total)?;
    writeln!(writer, "Average: {:.4}", statistics.avg)?;
    writeln!(writer, "Minimum: {:.4}", statistics.min)?;
    writeln!(writer, "Maximum: {:.4}", statistics.max)?;
    Ok(())
}
