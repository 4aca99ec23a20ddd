use aws_sdk_s3::error::DisplayErrorContext;
use scsync_catalog::CatalogError;

/// Wraps an SDK failure with the full source chain as message.
pub(crate) fn remote_error<E>(operation: &'static str, err: E) -> CatalogError
where
    E: std::error::Error,
{
    let message = DisplayErrorContext(&err).to_string();
    tracing::debug!(operation, error = %message, "AWS call failed");
    CatalogError::remote(operation, message)
}

/// A response that lacks a field the call promises to return.
pub(crate) fn missing_field(operation: &'static str, field: &str) -> CatalogError {
    CatalogError::invalid_response(operation, format!("response has no {field}"))
}
