//! Account endpoints: `POST /register` and `POST /login`

use super::common::{action_result, ActionResponse};
use crate::errors::ServiceError;
use crate::services::accounts::{LoginCredentials, RegisterCustomerInput};
use crate::AppState;
use axum::{extract::State, Json};
use tracing::debug;

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterCustomerInput>,
) -> Result<Json<ActionResponse>, ServiceError> {
    action_result(state.accounts.register(input).await, |_| {
        ActionResponse::ok()
    })
}

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<ActionResponse>, ServiceError> {
    action_result(state.accounts.login(credentials).await, |customer| {
        debug!(customer_id = customer.id, "login accepted");
        ActionResponse::with_role(customer.role)
    })
}
