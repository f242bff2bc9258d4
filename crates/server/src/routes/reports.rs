//! Abuse reports.

use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::validation::{self, MAX_BODY_LENGTH};
use database::{report, ReportStatus};
use serde::Deserialize;
use serde_json::{json, Value};

use super::comments::parse_target;
use super::params;
use super::{created, ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportForm {
    pub target_type: String,
    pub target_id: i64,
    pub reason: String,
}

/// `POST /api/reports`
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(form): ApiJson<ReportForm>,
) -> Result<(StatusCode, Json<Success<Value>>)> {
    let user = identity.require_user()?;
    let target = parse_target(&form.target_type)?;
    let reason = validation::required_text("reason", &form.reason, MAX_BODY_LENGTH)?;

    let report = report::create_report(state.db.pool(), user.id, target, form.target_id, &reason).await?;

    Ok(created(json!({
        "message": "Report submitted",
        "report": report,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub status: Option<String>,
}

/// `GET /api/admin/reports?status=`
pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> Result<Json<Success<Value>>> {
    identity.require_admin()?;

    let status = params::text(query.status.as_deref())
        .map(ReportStatus::from_str)
        .transpose()
        .map_err(ApiError::Validation)?;

    let reports = report::list_reports(state.db.pool(), status).await?;

    Ok(ok(json!({
        "count": reports.len(),
        "reports": reports,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ReportStatusForm {
    pub status: String,
}

/// `PUT /api/admin/reports/:id/status`
pub async fn set_status(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
    ApiJson(form): ApiJson<ReportStatusForm>,
) -> Result<Json<Success<Value>>> {
    let admin = identity.require_admin()?;

    let status = match form.status.parse::<ReportStatus>().map_err(ApiError::Validation)? {
        ReportStatus::Open => {
            return Err(ApiError::Validation(
                "status must be resolved or dismissed".to_string(),
            ))
        }
        closed => closed,
    };

    let report = report::set_status(state.db.pool(), id, status).await?;
    tracing::info!(id, admin_id = admin.id, status = ?status, "Report closed");

    Ok(ok(json!({ "report": report })))
}
