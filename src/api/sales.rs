use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::SaleOutcome;
use crate::domain::{
    Money, PaymentMethod, SaleEntry, DEFAULT_CRATES_PER_BOX, DEFAULT_EGGS_PER_CRATE,
};
use crate::error::AppError;
use super::auth::CurrentUser;
use super::{parse_required_date, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    #[serde(default)]
    pub boxes_sold: i64,
    pub box_sale_price: Option<Money>,
    pub crates_per_box: Option<i64>,
    #[serde(default)]
    pub crates_sold: i64,
    pub crate_sale_price: Option<Money>,
    #[serde(default)]
    pub individual_eggs: i64,
    pub egg_sale_price: Option<Money>,
    pub eggs_per_crate: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesResponse {
    pub sales: Vec<SaleEntry>,
    pub current_stock_eggs: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub sale: SaleEntry,
    pub current_stock_eggs: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    pub current_stock_eggs: i64,
}

/// GET /api/sales
pub async fn list_sales(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SalesResponse>, AppError> {
    let sales = state.repo.list_sales(&user.id).await?;
    let current_stock_eggs = state.repo.current_stock_for(&user.id).await?;
    Ok(Json(SalesResponse {
        sales,
        current_stock_eggs,
    }))
}

/// POST /api/sales
///
/// Validates the payload, then runs the stock-checked insert. The check and
/// the insert happen under the repository's stock lock, so two concurrent
/// sales cannot both pass against the same stock.
///
/// # Errors
///
/// Returns 400 for validation failures and for insufficient stock.
pub async fn create_sale(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), AppError> {
    let date = parse_required_date(body.date.as_deref())?;

    if body.boxes_sold < 0 || body.crates_sold < 0 || body.individual_eggs < 0 {
        return Err(AppError::Validation("Quantities cannot be negative".into()));
    }
    if body.box_sale_price.is_some_and(|p| p.is_negative())
        || body.crate_sale_price.is_some_and(|p| p.is_negative())
        || body.egg_sale_price.is_some_and(|p| p.is_negative())
    {
        return Err(AppError::Validation("Prices cannot be negative".into()));
    }
    if body.boxes_sold == 0 && body.crates_sold == 0 && body.individual_eggs == 0 {
        return Err(AppError::Validation(
            "Enter boxes, crates or individual eggs to sell".into(),
        ));
    }

    let box_sale_price = body.box_sale_price.unwrap_or_else(Money::zero);
    let crate_sale_price = body.crate_sale_price.unwrap_or_else(Money::zero);
    let egg_sale_price = body.egg_sale_price.unwrap_or_else(Money::zero);

    if body.boxes_sold > 0 && !box_sale_price.is_positive() {
        return Err(AppError::Validation(
            "Box sale price is required when selling boxes".into(),
        ));
    }
    if body.crates_sold > 0 && !crate_sale_price.is_positive() {
        return Err(AppError::Validation(
            "Crate sale price is required when selling crates".into(),
        ));
    }
    if body.individual_eggs > 0 && !egg_sale_price.is_positive() {
        return Err(AppError::Validation(
            "Egg sale price is required when selling individual eggs".into(),
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

    let sale = SaleEntry::new(
        user.id,
        body.boxes_sold,
        box_sale_price,
        crates_per_box,
        body.crates_sold,
        crate_sale_price,
        body.individual_eggs,
        egg_sale_price,
        eggs_per_crate,
        body.payment_method.unwrap_or_default(),
        date,
    );

    match state.repo.insert_sale_checked(&sale).await? {
        SaleOutcome::Accepted { stock_after } => Ok((
            StatusCode::CREATED,
            Json(SaleResponse {
                sale,
                current_stock_eggs: stock_after,
            }),
        )),
        SaleOutcome::Rejected {
            available,
            requested,
        } => Err(AppError::InsufficientStock {
            available,
            requested,
        }),
    }
}

/// DELETE /api/sales/:id
pub async fn delete_sale(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_sale(&user.id, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Sale not found".into()))
    }
}

/// GET /api/stock
pub async fn get_stock(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<StockResponse>, AppError> {
    let current_stock_eggs = state.repo.current_stock_for(&user.id).await?;
    Ok(Json(StockResponse { current_stock_eggs }))
}
