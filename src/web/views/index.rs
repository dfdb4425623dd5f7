//! Human-facing page: the prediction form, the statistics and the recent history.

use chrono_humanize::Tense;
use maud::{html, Markup, DOCTYPE};
use poem::web::{Data, Form, Html, Redirect};
use poem::{handler, IntoResponse, Response};

use crate::history::PredictionRecord;
use crate::model::Features;
use crate::prelude::*;
use crate::service::{PredictError, PredictionService};
use crate::statistics::Statistics;
use crate::web::partials::*;

const N_RECENT_RECORDS: usize = 20;

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get(Data(service): Data<&PredictionService>) -> Result<Response> {
    render(service, Features::default(), None).await
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn post(
    Form(features): Form<Features>,
    Data(service): Data<&PredictionService>,
) -> Result<Response> {
    let outcome = service.predict(Some(features.to_array().to_vec())).await;
    if let Err(error) = &outcome {
        warn!("{:#}", error);
    }
    render(service, features, Some(outcome)).await
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn post_clear(Data(service): Data<&PredictionService>) -> Result<impl IntoResponse> {
    service.clear_history().await?;
    Ok(Redirect::see_other("/"))
}

async fn render(
    service: &PredictionService,
    features: Features,
    outcome: Option<StdResult<PredictionRecord, PredictError>>,
) -> Result<Response> {
    let history = service.history().await?;
    let statistics = Statistics::compute(&history);

    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                (headers())
                title { "House Price Predictor" }
            }
            body {
                section.section {
                    div.container {
                        h1.title { "House Price Predictor" }
                        p.subtitle { "Median house value of a California block" }

                        div.columns {
                            div.column."is-4" {
                                (prediction_form(&features))
                                @if let Some(outcome) = &outcome {
                                    (outcome_notification(outcome))
                                }
                            }
                            div.column {
                                (statistics_box(statistics.as_ref()))
                                (history_box(&history))
                            }
                        }
                    }
                }
                (footer())
            }
        }
    };
    Ok(Html(markup.into_string()).into_response())
}

fn prediction_form(features: &Features) -> Markup {
    html! {
        form.box method="POST" action="/" {
            @for (name, value) in Features::NAMES.into_iter().zip(features.to_array()) {
                div.field {
                    label.label for=(name) { (feature_label(name)) }
                    div.control {
                        input.input id=(name) name=(name) type="number" step="any" value=(value) required;
                    }
                }
            }
            div.field {
                div.control {
                    button.button.is-link type="submit" {
                        (icon_text("fas fa-magic", "Predict"))
                    }
                }
            }
        }
    }
}

fn outcome_notification(outcome: &StdResult<PredictionRecord, PredictError>) -> Markup {
    html! {
        @match outcome {
            Ok(record) => {
                div.notification.is-success {
                    p.title."is-4" { "$" (Float::from(record.prediction * 100_000.0)) }
                    p { (Float::from(record.prediction).precision(4)) " × " (PredictionRecord::UNIT) }
                }
            }
            Err(error) => {
                div.notification.is-danger { (error.to_string()) }
            }
        }
    }
}

fn statistics_box(statistics: Option<&Statistics>) -> Markup {
    html! {
        div.box {
            @if let Some(statistics) = statistics {
                nav.level {
                    div.level-item.has-text-centered {
                        div {
                            p.heading { "Predictions" }
                            p.title { (statistics.total) }
                        }
                    }
                    div.level-item.has-text-centered {
                        div {
                            p.heading { "Average" }
                            p.title { (Float::from(statistics.avg).precision(3)) }
                        }
                    }
                    div.level-item.has-text-centered {
                        div {
                            p.heading { "Minimum" }
                            p.title { (Float::from(statistics.min).precision(3)) }
                        }
                    }
                    div.level-item.has-text-centered {
                        div {
                            p.heading { "Maximum" }
                            p.title { (Float::from(statistics.max).precision(3)) }
                        }
                    }
                }
            } @else {
                p.has-text-grey { "No predictions yet" }
            }
        }
    }
}

fn history_box(history: &[PredictionRecord]) -> Markup {
    html! {
        div.box {
            div.table-container {
                table.table.is-hoverable.is-striped.is-fullwidth {
                    thead {
                        tr {
                            th { "When" }
                            @for name in Features::NAMES {
                                th { (feature_label(name)) }
                            }
                            th { "Prediction" }
                        }
                    }
                    tbody {
                        @for record in history.iter().rev().take(N_RECENT_RECORDS) {
                            tr {
                                td { (datetime(record.timestamp, Tense::Past)) }
                                @for value in record.features.to_array() {
                                    td { (value) }
                                }
                                td { strong { (Float::from(record.prediction).precision(3)) } }
                            }
                        }
                    }
                }
            }
            @if !history.is_empty() {
                form method="POST" action="/clear" {
                    button.button.is-danger.is-light type="submit" {
                        (icon_text("fas fa-trash", "Clear history"))
                    }
                }
            }
        }
    }
}
