use actix_web::HttpRequest;

use crate::error::AppError;

/// Value of a required custom header, rejected with 400 `MISSING_HEADER`
/// when absent, empty or not UTF-8.
pub fn required_header(req: &HttpRequest, name: &str) -> Result<String, AppError> {
    req.headers()
        .get(name)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::missing_header(name))
}
