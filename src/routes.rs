use std::sync::Arc;

use log::{error, warn, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{html, with_header, with_status, Reply};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::QuotesError;

mod handlers;
mod rejection;

pub use internal::*;

const SERVER_TIMING_HEADER: &str = "server-timing";

/// The largest form submission to accept.
const MAX_CONTENT_LENGTH: u64 = 64 * 1024;

/// All pages of the site, with failures turned into error pages.
pub fn make_site(
    environment: Environment,
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    let logger = environment.logger.clone();

    make_home_route(environment.clone())
        .or(make_quote_route(environment.clone()))
        .or(make_add_form_route(environment.clone()))
        .or(make_add_route(environment))
        .recover(move |r| format_rejection(logger.clone(), r))
}

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<Box<dyn Reply>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        let status = status_code_for(e);

        if status.is_client_error() {
            warn!(logger, "Bad request"; "context" => %r.context, "error" => ?r.error, "status" => %status, "message" => %r.error);
        } else {
            error!(logger, "Request failed"; "context" => %r.context, "error" => ?r.error, "status" => %status, "message" => %r.error);
        }

        let page = format!(
            "<!DOCTYPE html>\n<title>{status}</title>\n<h1>{status}</h1>\n<p>{message}</p>\n",
            status = status,
            message = e,
        );

        let reply = with_status(html(page), status);

        return Ok(match &r.server_timing {
            Some(timing) => Box::new(with_header(reply, SERVER_TIMING_HEADER, timing.clone()))
                as Box<dyn Reply>,
            None => Box::new(reply) as Box<dyn Reply>,
        });
    }

    Err(rej)
}

fn status_code_for(e: &QuotesError) -> StatusCode {
    use QuotesError::*;

    match e {
        InvalidId(..) | MissingField(..) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use std::collections::HashMap;

    use warp::body::{content_length_limit, form};
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{get as g, path as p, path::param as par, post};

    use super::{handlers, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any().map(move || environment.clone());

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_home_route => home, rt; end(), g());
    route!(make_quote_route => quote, rt; p("q"), par::<String>(), end(), g());
    route!(make_add_form_route => add_form, rt; p("addform"), end(), g());
    route!(make_add_route => add, rt; p("add"), end(), post(), content_length_limit(MAX_CONTENT_LENGTH), form::<HashMap<String, String>>());
}
