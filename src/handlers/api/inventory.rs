use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{NewCategory, NewItem, NewSupplier, NewTransaction};
use crate::database::registry::TenantModels;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthStaff};

/// GET /api/inventory/categories
pub async fn list_categories(
    Extension(models): Extension<Arc<TenantModels>>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = models.inventory_categories.find_all().await?;
    Ok(ApiResponse::success(categories))
}

/// POST /api/inventory/categories
pub async fn create_category(
    Extension(models): Extension<Arc<TenantModels>>,
    Json(body): Json<NewCategory>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation_error("name is required", None));
    }
    let category = models.inventory_categories.create(&body).await?;
    Ok(ApiResponse::created(category))
}

/// GET /api/inventory/suppliers
pub async fn list_suppliers(
    Extension(models): Extension<Arc<TenantModels>>,
) -> Result<impl IntoResponse, ApiError> {
    let suppliers = models.suppliers.find_all().await?;
    Ok(ApiResponse::success(suppliers))
}

/// POST /api/inventory/suppliers
pub async fn create_supplier(
    Extension(models): Extension<Arc<TenantModels>>,
    Json(body): Json<NewSupplier>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation_error("name is required", None));
    }
    let supplier = models.suppliers.create(&body).await?;
    Ok(ApiResponse::created(supplier))
}

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    pub category_id: Option<Uuid>,
}

/// GET /api/inventory/items
pub async fn list_items(
    Extension(models): Extension<Arc<TenantModels>>,
    Query(query): Query<ItemsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = match query.category_id {
        Some(category_id) => models.items.in_category(category_id).await?,
        None => models.items.find_all().await?,
    };
    Ok(ApiResponse::success(items))
}

/// POST /api/inventory/items
pub async fn create_item(
    Extension(models): Extension<Arc<TenantModels>>,
    Json(body): Json<NewItem>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation_error("name is required", None));
    }
    if models
        .inventory_categories
        .find_by_id(body.category_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Inventory category not found"));
    }
    let item = models.items.create(&body).await?;
    Ok(ApiResponse::created(item))
}

/// GET /api/inventory/items/:id/transactions
pub async fn list_item_transactions(
    Extension(models): Extension<Arc<TenantModels>>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if models.items.find_by_id(item_id).await?.is_none() {
        return Err(ApiError::not_found("Item not found"));
    }
    let transactions = models.inventory_transactions.for_item(item_id).await?;
    Ok(ApiResponse::success(transactions))
}

/// POST /api/inventory/transactions - record a stock movement
pub async fn create_transaction(
    Extension(models): Extension<Arc<TenantModels>>,
    Extension(auth): Extension<AuthStaff>,
    Json(body): Json<NewTransaction>,
) -> Result<impl IntoResponse, ApiError> {
    if body.kind != "purchase" && body.kind != "issue" {
        return Err(ApiError::validation_error(
            "kind must be 'purchase' or 'issue'",
            None,
        ));
    }
    if body.quantity <= 0 {
        return Err(ApiError::validation_error(
            "quantity must be positive",
            None,
        ));
    }

    let transaction = models
        .inventory_transactions
        .record(&body, Some(auth.staff_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    Ok(ApiResponse::created(transaction))
}
