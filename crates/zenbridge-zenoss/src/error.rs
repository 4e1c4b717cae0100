/// Errors from the notification boundary.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// An HTTP request to the event endpoint failed.
    #[error("Notify: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The event API returned a non-success response.
    #[error("Notify: API error from {service}: status={status}, body={body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
