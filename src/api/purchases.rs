use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::{Money, PurchaseEntry, DEFAULT_CRATES_PER_BOX, DEFAULT_EGGS_PER_CRATE};
use crate::error::AppError;
use super::auth::CurrentUser;
use super::{parse_required_date, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    #[serde(default)]
    pub boxes_got: i64,
    pub box_price: Option<Money>,
    pub crates_per_box: Option<i64>,
    pub crate_price: Option<Money>,
    #[serde(default)]
    pub crates_got: i64,
    pub eggs_per_crate: Option<i64>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PurchasesResponse {
    pub purchases: Vec<PurchaseEntry>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub purchase: PurchaseEntry,
}

/// GET /api/purchases
pub async fn list_purchases(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<PurchasesResponse>, AppError> {
    let purchases = state.repo.list_purchases(&user.id).await?;
    Ok(Json(PurchasesResponse { purchases }))
}

/// POST /api/purchases
///
/// # Errors
///
/// Returns 400 when the date is missing, no tier has a positive quantity,
/// a sold tier lacks its price, or any quantity or price is negative.
pub async fn create_purchase(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>), AppError> {
    let date = parse_required_date(body.date.as_deref())?;

    if body.boxes_got < 0 || body.crates_got < 0 {
        return Err(AppError::Validation("Quantities cannot be negative".into()));
    }
    if body.box_price.is_some_and(|p| p.is_negative())
        || body.crate_price.is_some_and(|p| p.is_negative())
    {
        return Err(AppError::Validation("Prices cannot be negative".into()));
    }
    if body.boxes_got == 0 && body.crates_got == 0 {
        return Err(AppError::Validation("Enter boxes or crates purchased".into()));
    }

    let box_price = body.box_price.unwrap_or_else(Money::zero);
    let crate_price = body.crate_price.unwrap_or_else(Money::zero);

    if body.boxes_got > 0 && !box_price.is_positive() {
        return Err(AppError::Validation(
            "Box price is required when buying boxes".into(),
        ));
    }
    if body.crates_got > 0 && !crate_price.is_positive() {
        return Err(AppError::Validation(
            "Crate price is required when buying crates".into(),
        ));
    }

    let eggs_per_crate = body.eggs_per_crate.unwrap_or(DEFAULT_EGGS_PER_CRATE);
    let crates_per_box = body.crates_per_box.unwrap_or(DEFAULT_CRATES_PER_BOX);
    if eggs_per_crate < 1 {
        return Err(AppError::Validation(
            "Eggs per crate must be at least 1".into(),
        ));
    }
    if crates_per_box < 1 {
        return Err(AppError::Validation(
            "Crates per box must be at least 1".into(),
        ));
    }

    let purchase = PurchaseEntry::new(
        user.id,
        body.boxes_got,
        box_price,
        crates_per_box,
        crate_price,
        body.crates_got,
        eggs_per_crate,
        date,
    );

    state.repo.insert_purchase(&purchase).await?;

    Ok((StatusCode::CREATED, Json(PurchaseResponse { purchase })))
}

/// DELETE /api/purchases/:id
pub async fn delete_purchase(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_purchase(&user.id, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Purchase not found".into()))
    }
}
