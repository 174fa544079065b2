//! Customer route handlers
//!
//! One storage round-trip per request.

use crate::error::{not_found_error, ApiResult, AppError};
use crate::extract::{CustomerId, ValidJson};
use crate::models::{Customer, CustomerPayload};
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info};

fn customer_not_found(id: i32) -> AppError {
    not_found_error(format!("Customer {} not found", id))
}

/// List all customers
pub async fn list_customers(State(state): State<SharedState>) -> ApiResult<Json<Vec<Customer>>> {
    debug!("Listing customers");

    let customers = state.customers.list().await?;

    debug!("Found {} customers", customers.len());
    Ok(Json(customers))
}

/// Get a single customer
pub async fn get_customer(
    State(state): State<SharedState>,
    CustomerId(id): CustomerId,
) -> ApiResult<Json<Customer>> {
    debug!("Getting customer: {}", id);

    state
        .customers
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| customer_not_found(id))
}

/// Create a new customer
pub async fn create_customer(
    State(state): State<SharedState>,
    ValidJson(payload): ValidJson<CustomerPayload>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    debug!("Creating customer: {}", payload.customer_name);

    let customer = state.customers.create(&payload.customer_name).await?;

    info!(
        "Customer created: {} (id: {})",
        customer.customer_name, customer.customer_id
    );
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Rename an existing customer
pub async fn update_customer(
    State(state): State<SharedState>,
    CustomerId(id): CustomerId,
    ValidJson(payload): ValidJson<CustomerPayload>,
) -> ApiResult<Json<Customer>> {
    debug!("Updating customer: {}", id);

    let customer = state
        .customers
        .update(id, &payload.customer_name)
        .await?
        .ok_or_else(|| customer_not_found(id))?;

    info!("Customer updated: {} (id: {})", customer.customer_name, id);
    Ok(Json(customer))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<SharedState>,
    CustomerId(id): CustomerId,
) -> ApiResult<StatusCode> {
    debug!("Deleting customer: {}", id);

    if !state.customers.delete(id).await? {
        return Err(customer_not_found(id));
    }

    info!("Customer deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
