use std::fmt::{Display, Write};

use chrono_humanize::{Accuracy, HumanTime, Tense};
use clap::crate_version;
use maud::{html, Escaper, Markup, Render};

use crate::prelude::*;

pub fn headers() -> Markup {
    html! {
        meta name="viewport" content="width=device-width, initial-scale=1";
        meta charset="UTF-8";
        link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@0.9.4/css/bulma.min.css" crossorigin="anonymous" referrerpolicy="no-referrer";
        link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/5.15.3/css/all.min.css" crossorigin="anonymous" referrerpolicy="no-referrer";
    }
}

pub fn datetime(value: DateTime, tense: Tense) -> Markup {
    html! {
        time
            datetime=(value.to_rfc3339())
            title=(value.to_string()) { (HumanTime::from(value).to_text_en(Accuracy::Rough, tense)) }
    }
}

/// Renders `median_income` as `Median income`.
pub fn feature_label(name: &str) -> String {
    let name = name.replace('_', " ");
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

pub fn icon_text(class: &str, text: &str) -> Markup {
    html! {
        span.icon-text.is-flex-wrap-nowrap {
            span.icon { i class=(class) {} }
            span { (text) }
        }
    }
}

pub fn footer() -> Markup {
    html! {
        footer.footer {
            div.content.has-text-centered {
                p {
                    "House Price Predictor " (crate_version!())
                    " · "
                    a href="/health" { "Health" }
                    " · "
                    a href="/history" { "History JSON" }
                    " · "
                    a href="/stats" { "Statistics JSON" }
                }
            }
        }
    }
}

/// Float with a fixed number of decimals, and the full value in the title.
pub struct Float<T> {
    value: T,
    precision: usize,
}

impl<T> From<T> for Float<T> {
    fn from(value: T) -> Self {
        Self {
            value,
            precision: 0,
        }
    }
}

impl<T> Float<T> {
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl<T: Display> Render for Float<T> {
    fn render_to(&self, buffer: &mut String) {
        // Writing into a `String` is infallible.
        let _ = write!(buffer, r#"<span title=""#);
        let _ = write!(Escaper::new(buffer), "{}", self.value);
        let _ = write!(buffer, r#"">"#);
        let _ = write!(Escaper::new(buffer), "{0:.1$}", self.value, self.precision);
        let _ = write!(buffer, "</span>");
    }
}
