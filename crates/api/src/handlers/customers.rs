//! Handlers for the `/customers` resource.
//!
//! Customers are scoped to the caller's organization. Every mutation writes
//! an activity entry.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use donut_core::audit::action_types;
use donut_core::customers::{
    normalize_handle, split_preferences, validate_required, ImportDeduper, ImportRowDecision,
    MAX_IMPORT_ROWS,
};
use donut_core::error::CoreError;
use donut_core::types::DbId;
use donut_db::models::activity::CreateActivity;
use donut_db::models::customer::{
    CreateCustomer, Customer, ImportCustomerRow, ImportRowError, ImportSummary, UpdateCustomer,
};
use donut_db::repositories::{ActivityRepo, CustomerRepo};
use serde::Deserialize;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::rbac::{OrgMember, RequireEditor};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const EMAIL_CONSTRAINT: &str = "uq_customers_org_email";

/// Request body for `POST /customers/import`.
#[derive(Debug, Deserialize)]
pub struct ImportCustomersRequest {
    pub rows: Vec<ImportCustomerRow>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Customer",
        id,
    })
}

/// Trim names and email and normalise handles before storage.
fn normalize_create(mut input: CreateCustomer) -> CreateCustomer {
    input.first_name = input.first_name.trim().to_string();
    input.last_name = input.last_name.trim().to_string();
    input.email = input.email.trim().to_string();
    input.instagram_handle = normalize_handle(input.instagram_handle.as_deref());
    input.twitter_handle = normalize_handle(input.twitter_handle.as_deref());
    input.tiktok_handle = normalize_handle(input.tiktok_handle.as_deref());
    input
}

fn row_to_create(row: ImportCustomerRow) -> CreateCustomer {
    normalize_create(CreateCustomer {
        first_name: row.first_name.unwrap_or_default(),
        last_name: row.last_name.unwrap_or_default(),
        email: row.email.unwrap_or_default(),
        phone: row.phone,
        instagram_handle: row.instagram_handle,
        twitter_handle: row.twitter_handle,
        tiktok_handle: row.tiktok_handle,
        preferences: row
            .preferences
            .as_deref()
            .map(split_preferences)
            .unwrap_or_default(),
        brand_name: None,
        notes: None,
    })
}

/// GET /api/v1/customers
pub async fn list(
    member: OrgMember,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Customer>>>> {
    let customers = CustomerRepo::list(
        &state.pool,
        member.organization_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: customers }))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    member: OrgMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Customer>>> {
    let customer = CustomerRepo::find_by_id(&state.pool, member.organization_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: customer }))
}

/// POST /api/v1/customers
pub async fn create(
    RequireEditor(member): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> AppResult<(StatusCode, Json<DataResponse<Customer>>)> {
    let input = normalize_create(input);
    validate_required(&input.first_name, &input.email)?;

    let customer = CustomerRepo::create(
        &state.pool,
        member.organization_id,
        Some(member.user_id()),
        &input,
    )
    .await?;

    ActivityRepo::create(
        &state.pool,
        &CreateActivity::new(
            member.organization_id,
            Some(member.user_id()),
            action_types::CUSTOMER_CREATE,
            format!(
                "Added customer {} {}",
                customer.first_name, customer.last_name
            ),
        )
        .with_entity(customer.id),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// PUT /api/v1/customers/{id}
pub async fn update(
    RequireEditor(member): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCustomer>,
) -> AppResult<Json<DataResponse<Customer>>> {
    let existing = CustomerRepo::find_by_id(&state.pool, member.organization_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(email) = input.email.as_mut() {
        *email = email.trim().to_string();
    }
    validate_required(
        input.first_name.as_deref().unwrap_or(&existing.first_name),
        input.email.as_deref().unwrap_or(&existing.email),
    )?;

    // Blank handles are sent as "" to clear them; `None` leaves them alone.
    for handle in [
        &mut input.instagram_handle,
        &mut input.twitter_handle,
        &mut input.tiktok_handle,
    ] {
        if let Some(raw) = handle.take() {
            *handle = Some(normalize_handle(Some(&raw)).unwrap_or_default());
        }
    }

    let customer = CustomerRepo::update(&state.pool, member.organization_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    ActivityRepo::create(
        &state.pool,
        &CreateActivity::new(
            member.organization_id,
            Some(member.user_id()),
            action_types::CUSTOMER_UPDATE,
            format!(
                "Updated customer {} {}",
                customer.first_name, customer.last_name
            ),
        )
        .with_entity(customer.id),
    )
    .await?;

    Ok(Json(DataResponse { data: customer }))
}

/// DELETE /api/v1/customers/{id}
pub async fn delete(
    RequireEditor(member): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let customer = CustomerRepo::find_by_id(&state.pool, member.organization_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !CustomerRepo::delete(&state.pool, member.organization_id, id).await? {
        return Err(not_found(id));
    }

    ActivityRepo::create(
        &state.pool,
        &CreateActivity::new(
            member.organization_id,
            Some(member.user_id()),
            action_types::CUSTOMER_DELETE,
            format!(
                "Deleted customer {} {}",
                customer.first_name, customer.last_name
            ),
        )
        .with_entity(id),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/customers/import
///
/// Add customers in bulk. Rows whose email already exists in the
/// organization, or earlier in the same upload, are skipped. Invalid rows
/// are reported by 1-based row number and do not stop the import.
pub async fn import(
    RequireEditor(member): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<ImportCustomersRequest>,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    if input.rows.len() > MAX_IMPORT_ROWS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "At most {MAX_IMPORT_ROWS} rows can be imported at once"
        ))));
    }

    let existing = CustomerRepo::list_emails(&state.pool, member.organization_id).await?;
    let mut deduper = ImportDeduper::with_existing(existing);
    let mut summary = ImportSummary::default();

    for (index, row) in input.rows.into_iter().enumerate() {
        let row_number = index + 1;
        let create = row_to_create(row);
        match deduper.check(&create.first_name, &create.email) {
            ImportRowDecision::Skip => summary.skipped += 1,
            ImportRowDecision::Reject(message) => summary.errors.push(ImportRowError {
                row: row_number,
                message,
            }),
            ImportRowDecision::Add => {
                match CustomerRepo::create(
                    &state.pool,
                    member.organization_id,
                    Some(member.user_id()),
                    &create,
                )
                .await
                {
                    Ok(_) => summary.added += 1,
                    // A concurrent request inserted the same email first.
                    Err(e) if is_unique_violation(&e, EMAIL_CONSTRAINT) => summary.skipped += 1,
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    ActivityRepo::create(
        &state.pool,
        &CreateActivity::new(
            member.organization_id,
            Some(member.user_id()),
            action_types::CUSTOMER_IMPORT,
            format!(
                "Imported customers: {} added, {} skipped, {} errors",
                summary.added,
                summary.skipped,
                summary.errors.len()
            ),
        )
        .with_metadata(serde_json::json!({
            "added": summary.added,
            "skipped": summary.skipped,
            "errors": summary.errors.len(),
        })),
    )
    .await?;

    tracing::info!(
        organization_id = member.organization_id,
        added = summary.added,
        skipped = summary.skipped,
        errors = summary.errors.len(),
        "Customer import finished",
    );
    Ok(Json(DataResponse { data: summary }))
}
