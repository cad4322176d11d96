//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::AttemptError;
use super::policy::ErrorKind;

/// Where a response status sends the fetch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200: persist the body.
    Success,
    /// 404: terminal, nothing is written.
    NotFound,
    /// Anything else; the kind decides whether it is retried.
    Failure(ErrorKind),
}

/// Classify a final response status code.
pub fn classify_status(code: u32) -> StatusClass {
    match code {
        200 => StatusClass::Success,
        404 => StatusClass::NotFound,
        _ => StatusClass::Failure(classify_http_status(code)),
    }
}

/// Classify a non-200, non-404 HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        403 => ErrorKind::Forbidden,
        500 | 502 | 504 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
        || e.is_ssl_connect_error()
        || e.is_http2_error()
        || e.is_http2_stream_error()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify an attempt error (curl or HTTP) into an ErrorKind.
pub fn classify(e: &AttemptError) -> ErrorKind {
    match e {
        AttemptError::Curl(ce) => classify_curl_error(ce),
        AttemptError::Http(code) => classify_http_status(*code),
    }
}
