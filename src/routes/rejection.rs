use std::fmt;

use warp::reject;

use crate::errors::QuotesError;

/// A handler failure, tagged with the page it happened on.
#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: QuotesError,
    pub(crate) server_timing: Option<String>,
}

impl Rejection {
    pub fn new(context: Context, error: QuotesError) -> Self {
        Rejection {
            context,
            error,
            server_timing: None,
        }
    }

    /// Attaches the `server-timing` value measured by the handler.
    pub fn with_server_timing(self, server_timing: String) -> Self {
        Rejection {
            server_timing: Some(server_timing),
            ..self
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Clone, Debug)]
pub enum Context {
    Home,
    Quote { id: String },
    AddForm,
    Add,
}

impl Context {
    pub fn home() -> Context {
        Context::Home
    }

    pub fn quote(id: String) -> Context {
        Context::Quote { id }
    }

    pub fn add_form() -> Context {
        Context::AddForm
    }

    pub fn add() -> Context {
        Context::Add
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Home => write!(f, "GET /"),
            Context::Quote { id } => write!(f, "GET /q/{}", id),
            Context::AddForm => write!(f, "GET /addform"),
            Context::Add => write!(f, "POST /add"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Context;

    #[test]
    fn contexts_name_the_request() {
        assert_eq!(Context::home().to_string(), "GET /");
        assert_eq!(Context::quote("abc".to_owned()).to_string(), "GET /q/abc");
        assert_eq!(Context::add_form().to_string(), "GET /addform");
        assert_eq!(Context::add().to_string(), "POST /add");
    }
}
