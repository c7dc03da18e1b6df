// POST /generate-flowchart handler

use crate::models::{FlowchartRequest, FlowchartResponse};
use crate::service::FlowchartService;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::info;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

pub async fn generate_flowchart_handler(
    service: Arc<FlowchartService>,
    request: FlowchartRequest,
) -> Result<Response, Infallible> {
    let prompt = request.prompt.as_deref();
    info!(
        prompt_chars = prompt.map_or(0, str::len),
        "POST /generate-flowchart"
    );

    match service.generate(prompt).await {
        Ok(result) => Ok(warp::reply::with_status(
            warp::reply::json(&FlowchartResponse { result }),
            StatusCode::OK,
        )
        .into_response()),
        Err(err) => {
            err.log();
            Ok(err.into_response())
        }
    }
}
