use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;
use warp::{
    http::StatusCode,
    reject,
    reply::{html, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::QuotesError;
use crate::quote::{Id, NewQuote, RandKey, Submission};
use crate::routes::rejection::{Context, Rejection};
use crate::routes::SERVER_TIMING_HEADER;
use crate::selector;

type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($body:tt)+) => {{
        let start = Instant::now();

        let result = async { Ok::<_, Rejection>({ $($body)+ }) }.await;
        let timing = format_server_timing(start.elapsed());

        match result {
            Ok(reply) => {
                Ok(Box::new(with_header(reply, SERVER_TIMING_HEADER, timing)) as Box<dyn Reply>)
            }
            Err(rejection) => Err(reject::custom(rejection.with_server_timing(timing))),
        }
    }};
}

pub async fn home(environment: Environment) -> RouteResult {
    timed! {
        let error_handler = |e: QuotesError| Rejection::new(Context::home(), e);

        let key = RandKey::new((environment.draw)()).map_err(error_handler)?;
        debug!(environment.logger, "Picking a quote..."; "rand" => key.value());

        let quote = selector::pick(environment.db.as_ref(), key)
            .await
            .map_err(error_handler)?;

        let page = environment
            .templates
            .render_index(quote.as_ref())
            .map_err(error_handler)?;

        html(page)
    }
}

pub async fn quote(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler =
            |e: QuotesError| Rejection::new(Context::quote(id.clone()), e);

        let quote_id: Id = id
            .parse()
            .map_err(|_| QuotesError::InvalidId(id.clone()))
            .map_err(error_handler)?;
        debug!(environment.logger, "Retrieving quote..."; "id" => quote_id);

        let quote = environment
            .db
            .retrieve(quote_id)
            .await
            .map_err(error_handler)?;

        if quote.is_none() {
            debug!(environment.logger, "No such quote"; "id" => quote_id);
        }

        let page = environment
            .templates
            .render_quote(quote.as_ref())
            .map_err(error_handler)?;

        html(page)
    }
}

pub async fn add_form(environment: Environment) -> RouteResult {
    timed! {
        let page = environment
            .templates
            .render_add_form()
            .map_err(|e| Rejection::new(Context::add_form(), e))?;

        html(page)
    }
}

pub async fn add(environment: Environment, form: HashMap<String, String>) -> RouteResult {
    timed! {
        let error_handler = |e: QuotesError| Rejection::new(Context::add(), e);

        debug!(environment.logger, "Parsing submission...");
        let submission = Submission::from_form(form).map_err(error_handler)?;

        // any coordinates are ignored; new quotes always start at the origin
        let key = RandKey::new((environment.draw)()).map_err(error_handler)?;
        let quote = environment
            .db
            .insert(NewQuote::new(submission, key))
            .await
            .map_err(error_handler)?;
        debug!(environment.logger, "Saved quote"; "id" => quote.id(), "rand" => key.value());

        let location = environment
            .urls
            .quote(quote.id())
            .map_err(|source| QuotesError::FailedToGenerateUrl { source })
            .map_err(error_handler)?;

        with_header(
            with_status(warp::reply(), StatusCode::FOUND),
            "location",
            location.as_str(),
        )
    }
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
