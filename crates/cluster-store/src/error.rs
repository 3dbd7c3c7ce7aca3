//! Cluster store errors

use thiserror::Error;

/// Errors returned by cluster resource store operations.
///
/// The taxonomy is deliberately small so that synchronization logic can
/// match on it exhaustively instead of inspecting HTTP status codes.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource already exists (create race)
    #[error("already exists: {0}")]
    Conflict(String),

    /// Any other cluster API failure (auth, validation, quota, transport)
    #[error("cluster API error: {0}")]
    Api(String),
}

impl From<kube::Error> for StoreError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound(resp.message),
            kube::Error::Api(resp) if resp.code == 409 => StoreError::Conflict(resp.message),
            other => StoreError::Api(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, message: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: message.to_string(),
            reason: String::new(),
            code,
        })
    }

    #[test]
    fn maps_404_to_not_found() {
        let err = StoreError::from(api_error(404, "deployments \"x\" not found"));
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn maps_409_to_conflict() {
        let err = StoreError::from(api_error(409, "deployments \"x\" already exists"));
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn maps_other_codes_to_api() {
        let err = StoreError::from(api_error(403, "forbidden"));
        assert!(matches!(err, StoreError::Api(_)));
    }
}
