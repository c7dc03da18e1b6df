// GET / handler

use crate::models::WelcomeResponse;
use std::convert::Infallible;
use warp::http::StatusCode;

pub const WELCOME_MESSAGE: &str = "Welcome to the flowchart generator API";

pub async fn root_handler() -> Result<impl warp::Reply, Infallible> {
    let response = WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::OK,
    ))
}
