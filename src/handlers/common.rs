use crate::errors::ServiceError;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of `/login` and `/register` replies
///
/// Expected failures (duplicate account, bad credentials) are reported here with
/// `success: false` rather than through an error status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            role: None,
            message: None,
        }
    }

    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Self::ok()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            role: None,
            message: Some(message.into()),
        }
    }
}

/// Turn a service result into an `ActionResponse`, passing unexpected faults through
pub fn action_result<T>(
    result: Result<T, ServiceError>,
    on_success: impl FnOnce(T) -> ActionResponse,
) -> Result<Json<ActionResponse>, ServiceError> {
    match result {
        Ok(value) => Ok(Json(on_success(value))),
        Err(err) if err.is_user_facing() => Ok(Json(ActionResponse::failure(err.response_message()))),
        Err(err) => Err(err),
    }
}
