use serde::Deserialize;

use crate::error::ApiError;

/// How a request without a `user_id` is handled.
///
/// Records are partitioned only by this string, so the sentinel is shared by
/// every anonymous client. Deployments that serve more than one person should
/// run with `REQUIRE_USER_ID=true`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum UserIdPolicy {
    /// Substitute the given sentinel.
    Default(String),
    /// Reject the request with 400.
    Required,
}

impl UserIdPolicy {
    pub fn resolve(&self, supplied: Option<String>) -> Result<String, ApiError> {
        match (supplied, self) {
            (Some(id), _) => Ok(id),
            (None, Self::Default(sentinel)) => Ok(sentinel.clone()),
            (None, Self::Required) => Err(ApiError::BadRequest("user_id is required".into())),
        }
    }
}
