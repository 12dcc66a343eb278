use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::domain::{Money, ReportPeriod};
use crate::engine::{build_report, PeriodReport};
use crate::error::AppError;
use super::auth::CurrentUser;
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
    pub month: Option<String>,
}

/// GET /api/reports?type=daily&date=YYYY-MM-DD or ?type=monthly&month=YYYY-MM
pub async fn get_report(
    Query(params): Query<ReportQuery>,
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<PeriodReport>, AppError> {
    let report = assemble_report(&state, &user.id, &params).await?;
    Ok(Json(report))
}

/// GET /api/reports/export
///
/// Same query parameters as the report itself; responds with a CSV
/// attachment carrying the summary metrics and the period's purchase and
/// sale rows on the common eggs/amount basis.
pub async fn export_report(
    Query(params): Query<ReportQuery>,
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let report = assemble_report(&state, &user.id, &params).await?;
    let body = render_csv(&report)?;
    let filename = format!("egg-report-{}.csv", report.period);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

async fn assemble_report(
    state: &AppState,
    owner_id: &str,
    params: &ReportQuery,
) -> Result<PeriodReport, AppError> {
    let period = ReportPeriod::from_params(
        params.kind.as_deref(),
        params.date.as_deref(),
        params.month.as_deref(),
    )?;

    let purchases = state.repo.list_purchases(owner_id).await?;
    let sales = state.repo.list_sales(owner_id).await?;

    Ok(build_report(&period, &purchases, &sales))
}

fn render_csv(report: &PeriodReport) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    let summary = [
        ("Boxes Purchased", report.total_boxes_purchased.to_string()),
        ("Crates Purchased", report.total_crates_purchased.to_string()),
        (
            "Total Eggs Purchased",
            report.total_eggs_purchased.to_string(),
        ),
        ("Purchase Cost", rupees(report.total_purchase_cost)),
        ("Avg. Cost per Egg", rupees(report.avg_purchase_price_per_egg)),
        ("Boxes Sold", report.total_boxes_sold.to_string()),
        ("Crates Sold", report.total_crates_sold.to_string()),
        ("Total Eggs Sold", report.total_eggs_sold.to_string()),
        ("Sales Revenue", rupees(report.total_sales_revenue)),
        (
            "Avg. Sale Price per Egg",
            rupees(report.avg_sale_price_per_egg),
        ),
        ("Profit (Boxes)", rupees(report.profit_breakdown.box_profit)),
        (
            "Profit (Crates)",
            rupees(report.profit_breakdown.crate_profit),
        ),
        (
            "Profit (Individual Eggs)",
            rupees(report.profit_breakdown.loose_profit),
        ),
        ("Total Profit", rupees(report.profit)),
        ("Net Cash Flow", rupees(report.net_cash_flow)),
        (
            "Current Stock (Eggs)",
            report.current_stock_eggs.to_string(),
        ),
    ];

    write_row(&mut writer, &["Metric", "Value"])?;
    for (metric, value) in &summary {
        write_row(&mut writer, &[metric, value])?;
    }

    write_row(&mut writer, &["Purchases"])?;
    write_row(
        &mut writer,
        &["Date", "Boxes", "Crates", "Total Eggs", "Per Egg", "Total"],
    )?;
    for purchase in &report.purchases {
        let eggs = purchase.total_eggs();
        let cost = purchase.total_cost();
        write_row(
            &mut writer,
            &[
                &purchase.date.to_string(),
                &purchase.boxes_got.to_string(),
                &purchase.crates_got.to_string(),
                &eggs.to_string(),
                &rupees(cost.per_unit(eggs)),
                &rupees(cost),
            ],
        )?;
    }

    write_row(&mut writer, &["Sales"])?;
    write_row(
        &mut writer,
        &[
            "Date",
            "Boxes",
            "Crates",
            "Loose",
            "Total Eggs",
            "Revenue",
            "Payment",
        ],
    )?;
    for sale in &report.sales {
        write_row(
            &mut writer,
            &[
                &sale.date.to_string(),
                &sale.boxes_sold.to_string(),
                &sale.crates_sold.unwrap_or(0).to_string(),
                &sale.individual_eggs.to_string(),
                &sale.total_eggs().to_string(),
                &rupees(sale.total_revenue()),
                sale.payment_method.as_str(),
            ],
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
}

fn write_row(
    writer: &mut csv::Writer<Vec<u8>>,
    fields: &[&str],
) -> Result<(), AppError> {
    writer
        .write_record(fields)
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
}

/// Render an amount the way the exports display money, always two decimals.
fn rupees(amount: Money) -> String {
    let mut value = amount.inner().round_dp(2);
    value.rescale(2);
    format!("Rs. {}", value)
}
