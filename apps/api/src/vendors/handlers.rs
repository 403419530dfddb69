use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::vendor::VendorRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// GET /api/v1/vendors
pub async fn handle_list_vendors(
    State(state): State<AppState>,
) -> Result<Json<Vec<VendorRow>>, AppError> {
    let vendors = sqlx::query_as::<_, VendorRow>("SELECT * FROM vendors ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(vendors))
}

/// POST /api/v1/vendors
pub async fn handle_create_vendor(
    State(state): State<AppState>,
    Json(request): Json<CreateVendorRequest>,
) -> Result<Json<VendorRow>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let email = request.email.trim();
    if !looks_like_email(email) {
        return Err(AppError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }

    let vendor = sqlx::query_as::<_, VendorRow>(
        r#"
        INSERT INTO vendors (id, name, email, phone, company)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.name.trim())
    .bind(email)
    .bind(request.phone.as_deref())
    .bind(request.company.as_deref())
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        // Unique-email violation is a caller mistake, not a server fault
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Validation(format!("A vendor with email '{email}' already exists"))
        }
        _ => AppError::Database(e),
    })?;

    Ok(Json(vendor))
}

/// Minimal shape check — real validation happens when the relay accepts or
/// rejects the address at send time.
fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
