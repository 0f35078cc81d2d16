use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::errors::QuotesError;
use crate::quote::{GeoPoint, Id, Quote};

const MASTER: &str = "master";
const INDEX: &str = "index";
const QUOTE: &str = "quote";
const ADD_FORM: &str = "addform";

const EMBEDDED: &[(&str, &str)] = &[
    (MASTER, include_str!("../templates/master.hbs")),
    (INDEX, include_str!("../templates/index.hbs")),
    (QUOTE, include_str!("../templates/quote.hbs")),
    (ADD_FORM, include_str!("../templates/addform.hbs")),
];

/// The page templates, loaded once at startup. Every page is wrapped in
/// the `master` layout.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Uses the templates compiled into the binary.
    pub fn embedded() -> Result<Self, QuotesError> {
        let mut registry = Handlebars::new();

        for (name, source) in EMBEDDED {
            registry
                .register_template_string(name, source)
                .map_err(|source| QuotesError::Template { source })?;
        }

        Ok(Templates { registry })
    }

    /// Loads `<name>.hbs` for each page from `dir`. With `reload`, the
    /// files are read again on every render.
    pub fn from_directory(dir: impl AsRef<Path>, reload: bool) -> Result<Self, QuotesError> {
        let dir = dir.as_ref();
        let mut registry = Handlebars::new();
        registry.set_dev_mode(reload);

        for (name, _) in EMBEDDED {
            registry
                .register_template_file(name, dir.join(format!("{}.hbs", name)))
                .map_err(|source| QuotesError::Template { source })?;
        }

        Ok(Templates { registry })
    }

    pub fn render_index(&self, quote: Option<&Quote>) -> Result<String, QuotesError> {
        self.render(INDEX, &json!({ "quote": quote.map(QuoteView::from) }))
    }

    pub fn render_quote(&self, quote: Option<&Quote>) -> Result<String, QuotesError> {
        self.render(QUOTE, &json!({ "quote": quote.map(QuoteView::from) }))
    }

    pub fn render_add_form(&self) -> Result<String, QuotesError> {
        self.render(ADD_FORM, &json!({}))
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, QuotesError> {
        self.registry
            .render(name, data)
            .map_err(|source| QuotesError::Render { source })
    }
}

/// What the templates see of a quote.
#[derive(Debug, Serialize)]
struct QuoteView<'a> {
    id: Id,
    quote: &'a str,
    name: &'a str,
    city: &'a str,
    state: &'a str,
    timestamp: String,
    location: Option<GeoPoint>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl<'a> From<&'a Quote> for QuoteView<'a> {
    fn from(quote: &'a Quote) -> Self {
        QuoteView {
            id: quote.id(),
            quote: quote.quote(),
            name: quote.name(),
            city: quote.city(),
            state: quote.state(),
            timestamp: quote.timestamp().format("%F %T UTC"),
            location: quote.location(),
            latitude: quote.latitude(),
            longitude: quote.longitude(),
        }
    }
}
