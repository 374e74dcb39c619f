use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` extractor whose rejections become `AppError::Validation`, so a
/// malformed body gets the same `{"error": ...}` shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
