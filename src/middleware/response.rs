use axum::{
    extract::Request,
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::Response,
};

use crate::error::{ErrorReport, Severity};

/// Outermost error renderer.
///
/// Handlers and extractors render `ApiError` without knowing the request
/// path; this fills it in and logs at the error's severity. Framework
/// rejections that never went through `ApiError` (405, 413, ...) are
/// rewritten into the same body shape.
pub async fn render_error_response(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let report = match response.extensions().get::<ErrorReport>() {
        Some(report) => report.clone(),
        None if is_error(&response) => framework_report(&response),
        None => return response,
    };

    report.log(&path);
    let mut rendered = report.into_response_with_path(&path);

    // Keep headers such as `Allow` on 405; the body headers belong to the new body
    for (name, value) in response.headers() {
        if *name != CONTENT_TYPE && *name != CONTENT_LENGTH {
            rendered.headers_mut().append(name.clone(), value.clone());
        }
    }
    rendered
}

fn is_error(response: &Response) -> bool {
    response.status().is_client_error() || response.status().is_server_error()
}

fn framework_report(response: &Response) -> ErrorReport {
    let status = response.status();
    let severity = if status.is_server_error() {
        Severity::Error
    } else {
        Severity::Info
    };

    ErrorReport {
        status,
        kind: "HttpError",
        severity,
        message: status.canonical_reason().unwrap_or("Request failed").to_string(),
        detail: format!("framework rejected request with {}", status),
        input_errors: Vec::new(),
    }
}
