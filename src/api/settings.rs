use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::UserRecord;
use crate::domain::{DEFAULT_CRATES_PER_BOX, DEFAULT_EGGS_PER_CRATE};
use crate::error::AppError;
use super::auth::CurrentUser;
use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub eggs_per_crate: Option<i64>,
    pub crates_per_box: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub eggs_per_crate: i64,
    pub crates_per_box: i64,
}

/// GET /api/settings
pub async fn get_settings(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SettingsResponse>, AppError> {
    let record = state.repo.find_user_by_id(&user.id).await?;
    Ok(Json(settings_of(record.as_ref())))
}

/// PUT /api/settings
///
/// Partial update; an omitted field keeps its stored value.
///
/// # Errors
///
/// Returns 400 when a provided value is below 1 or when neither field is
/// present.
pub async fn update_settings(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    if let Some(eggs_per_crate) = body.eggs_per_crate {
        if eggs_per_crate < 1 {
            return Err(AppError::Validation(
                "Eggs per crate must be at least 1".into(),
            ));
        }
    }
    if let Some(crates_per_box) = body.crates_per_box {
        if crates_per_box < 1 {
            return Err(AppError::Validation(
                "Crates per box must be at least 1".into(),
            ));
        }
    }
    if body.eggs_per_crate.is_none() && body.crates_per_box.is_none() {
        return Err(AppError::Validation("No valid settings provided".into()));
    }

    let record = state
        .repo
        .update_settings(&user.id, body.eggs_per_crate, body.crates_per_box)
        .await?;

    Ok(Json(settings_of(record.as_ref())))
}

fn settings_of(record: Option<&UserRecord>) -> SettingsResponse {
    match record {
        Some(user) => SettingsResponse {
            eggs_per_crate: user.eggs_per_crate,
            crates_per_box: user.crates_per_box,
        },
        None => SettingsResponse {
            eggs_per_crate: DEFAULT_EGGS_PER_CRATE,
            crates_per_box: DEFAULT_CRATES_PER_BOX,
        },
    }
}
