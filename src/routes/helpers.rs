use actix_web::{HttpRequest, HttpResponse, error::InternalError};

use crate::domain::{ErrorCode, OperationResult};

/// Extractor error handler: a body that fails to deserialize or a missing
/// `sessionToken` still gets a well-formed failed result.
pub fn reject_malformed_request<E>(err: E, req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    tracing::warn!(error = %err, path = %req.path(), "Malformed comment request");

    let response = HttpResponse::Ok().json(OperationResult::failed(ErrorCode::UnexpectedError));
    InternalError::from_response(err, response).into()
}
