// Route definitions and handlers

use crate::cors::{self, CorsPolicy};
use crate::error::handle_rejection;
use crate::handlers;
use crate::service::FlowchartService;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::Filter;

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn configure_routes(
    service: Arc<FlowchartService>,
    cors_origins: &[String],
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // GET /
    let root = warp::path::end()
        .and(warp::get())
        .and_then(handlers::root_handler);

    // POST /generate-flowchart
    let generate_flowchart = warp::path("generate-flowchart")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_service(service))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and_then(handlers::generate_flowchart_handler);

    // Combine routes; preflights are answered before routing and every
    // response, rejections included, passes through the CORS policy
    let policy = CorsPolicy::new(cors_origins);
    let routes = cors::preflight(policy.clone())
        .or(root)
        .or(generate_flowchart)
        .recover(handle_rejection);

    warp::header::headers_cloned()
        .and(cors::with_cors(policy))
        .and(routes)
        .map(|headers: HeaderMap, policy: CorsPolicy, reply| {
            policy.decorate(&headers, reply)
        })
        .with(warp::log::custom(|info| {
            tracing::info!(
                method = %info.method(),
                path = info.path(),
                status = info.status().as_u16(),
                elapsed_ms = info.elapsed().as_millis() as u64,
                "request completed"
            );
        }))
}

fn with_service(
    service: Arc<FlowchartService>,
) -> impl Filter<Extract = (Arc<FlowchartService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}
