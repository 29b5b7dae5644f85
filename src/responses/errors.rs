use crate::errors::ServerError;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};
use log::{error, warn};

pub type ResultResp = Result<Response, ServerError>;

fn status_of(err: &ServerError) -> u16 {
    match err {
        ServerError::NotFound => 404,
        ServerError::BadRequest(_) => 400,
        ServerError::DbError(_) | ServerError::XlsxError(_) | ServerError::InternalError => 500,
    }
}

/// Renders a handler error as an HTML page with the matching status.
pub fn html_error_response(err: ServerError) -> Response {
    let status = status_of(&err);
    if status >= 500 {
        error!("request failed: {err}");
    } else {
        warn!("request rejected: {err}");
    }

    let html = error_page(status, &err.to_string()).into_string();
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(html))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
