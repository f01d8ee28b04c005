use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::{SipInputs, YearlyGrowthPoint, compute, yearly_growth};
use crate::error::SipError;
use crate::store::{CalculationRecord, HistoryStore, NewCalculation};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CalculatePayload {
    monthly_investment: Option<f64>,
    annual_return: Option<f64>,
    years: Option<i64>,
    /// Project in today's money by lowering the return.
    inflation_adjust: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ScheduleResponse {
    years: Vec<YearlyGrowthPoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(store: HistoryStore) -> Router {
    Router::new()
        .route("/api/calculate", post(calculate_handler))
        .route("/api/history", get(history_handler))
        .route("/api/schedule", post(schedule_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serves the API on `addr` until the process is stopped. The store must
/// already be migrated.
pub async fn run_http_server(addr: SocketAddr, store: HistoryStore) -> std::io::Result<()> {
    let app = router(store);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("SIP calculator API listening on http://{addr}");
    tracing::info!("Local access: http://127.0.0.1:{}/api/history", addr.port());

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_handler(
    State(store): State<HistoryStore>,
    payload: Result<Json<CalculatePayload>, JsonRejection>,
) -> Result<Response, SipError> {
    let inputs = inputs_from_request(payload)?;
    let projection = compute(&inputs)?;

    let id = store
        .append(&NewCalculation::from_projection(&inputs, &projection))
        .await?;
    tracing::info!(
        id,
        monthly_investment = inputs.monthly_investment,
        annual_return = inputs.annual_return,
        years = inputs.years,
        total_value = projection.total_value,
        "calculation recorded"
    );

    Ok(json_response(StatusCode::OK, projection))
}

async fn history_handler(State(store): State<HistoryStore>) -> Result<Response, SipError> {
    let records: Vec<CalculationRecord> = store.list_all().await?;
    Ok(json_response(StatusCode::OK, records))
}

async fn schedule_handler(
    payload: Result<Json<CalculatePayload>, JsonRejection>,
) -> Result<Response, SipError> {
    let inputs = inputs_from_request(payload)?;
    let years = yearly_growth(&inputs)?;
    Ok(json_response(StatusCode::OK, ScheduleResponse { years }))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

pub(crate) fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn inputs_from_request(
    payload: Result<Json<CalculatePayload>, JsonRejection>,
) -> Result<SipInputs, SipError> {
    let Json(payload) = payload
        .map_err(|e| SipError::InvalidInput(format!("Invalid JSON payload: {}", e.body_text())))?;
    inputs_from_payload(payload)
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<SipInputs, SipError> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| SipError::InvalidInput(format!("Invalid JSON payload: {e}")))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: CalculatePayload) -> Result<SipInputs, SipError> {
    let (Some(monthly_investment), Some(annual_return), Some(years)) =
        (payload.monthly_investment, payload.annual_return, payload.years)
    else {
        return Err(SipError::InvalidInput(
            "monthly_investment, annual_return and years are required".to_string(),
        ));
    };

    let inputs = SipInputs::new(monthly_investment, annual_return, years)?;
    if payload.inflation_adjust.unwrap_or(false) {
        return Ok(inputs.inflation_adjusted());
    }
    Ok(inputs)
}
