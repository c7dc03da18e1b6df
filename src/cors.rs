//! Cross-origin policy for the API
//!
//! Requests from allow-listed origins get the CORS response headers; requests
//! from any other origin are still served, just without them. Preflights
//! mirror the requested headers back since every header is allowed.

use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
};
use warp::http::{Method, StatusCode};
use warp::reply::{Reply, Response};
use warp::Filter;

use crate::error::json_error;

const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const PREFLIGHT_MAX_AGE_SECS: &str = "600";

pub const DISALLOWED_ORIGIN_MESSAGE: &str = "Disallowed CORS origin";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Arc<[String]>,
}

impl CorsPolicy {
    pub fn new(origins: &[String]) -> Self {
        Self {
            origins: origins.iter().map(|o| o.trim_end_matches('/').to_string()).collect(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    /// Answer a preflight request
    ///
    /// Allowed origins get 200 with the requested headers mirrored; any other
    /// origin gets 400.
    pub fn preflight_response(&self, headers: &HeaderMap) -> Response {
        let origin = match origin_of(headers) {
            Some(origin) if self.allows(origin) => origin,
            _ => return json_error(StatusCode::BAD_REQUEST, DISALLOWED_ORIGIN_MESSAGE),
        };

        let mut response = warp::reply::with_status("OK", StatusCode::OK).into_response();
        let out = response.headers_mut();
        insert_origin_headers(out, origin);
        out.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        out.insert(
            ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
        );
        if let Some(requested) = headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
            out.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        response
    }

    /// Add CORS headers to a regular response when the origin is allowed
    pub fn decorate(&self, headers: &HeaderMap, reply: impl Reply) -> Response {
        let mut response = reply.into_response();
        if let Some(origin) = origin_of(headers).filter(|origin| self.allows(origin)) {
            insert_origin_headers(response.headers_mut(), origin);
        }
        response
    }
}

fn origin_of(headers: &HeaderMap) -> Option<&str> {
    headers.get(ORIGIN).and_then(|value| value.to_str().ok())
}

fn insert_origin_headers(headers: &mut HeaderMap, origin: &str) {
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }
}

/// An OPTIONS request carrying both `Origin` and `Access-Control-Request-Method`
pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
    *method == Method::OPTIONS
        && headers.contains_key(ORIGIN)
        && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

pub fn with_cors(
    policy: CorsPolicy,
) -> impl Filter<Extract = (CorsPolicy,), Error = Infallible> + Clone {
    warp::any().map(move || policy.clone())
}

/// Filter answering preflights; rejects as not-found for anything else so
/// the regular routes get their turn
pub fn preflight(
    policy: CorsPolicy,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    warp::method()
        .and(warp::header::headers_cloned())
        .and(with_cors(policy))
        .and_then(handle_preflight)
}

async fn handle_preflight(
    method: Method,
    headers: HeaderMap,
    policy: CorsPolicy,
) -> Result<Response, warp::Rejection> {
    if !is_preflight(&method, &headers) {
        return Err(warp::reject::not_found());
    }
    Ok(policy.preflight_response(&headers))
}
