use thiserror::Error;

use crate::quote::Id;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum QuotesError {
    /// Represents an SQL error.
    #[error("database error")]
    Sqlx { source: sqlx::Error },

    /// Represents a quote ID that is not an integer. The raw value is
    /// kept for logging only.
    #[error("quote ID must be an integer")]
    InvalidId(String),

    /// Represents a required form field that was not submitted.
    #[error("missing form field: {0}")]
    MissingField(&'static str),

    /// Represents a selection key outside `[0, 1)`.
    #[error("random key out of range")]
    InvalidRandKey(f64),

    /// Represents a stored quote with only one of its coordinates.
    #[error("quote has an incomplete location")]
    IncompleteLocation(Id),

    /// Represents a failure to fill in a template.
    #[error("unable to render page")]
    Render { source: handlebars::RenderError },

    /// Represents a template that could not be loaded or parsed.
    #[error("unable to load template")]
    Template { source: handlebars::TemplateError },

    /// Represents a failure to build the URL of a quote.
    #[error("unable to generate URL")]
    FailedToGenerateUrl { source: url::ParseError },
}

/// Enumerates errors in the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("must define {0} environment variable")]
    Missing(&'static str),

    #[error("unable to parse {name} environment variable: {value:?}")]
    Invalid { name: &'static str, value: String },
}
