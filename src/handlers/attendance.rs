//! Attendance endpoints: the back office sheet and the mobile app API

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::context::{JsonBody, PathParam, RequestContext};
use super::deleted;
use crate::middleware::Permission;
use crate::models::{AttendanceSheetFilter, CreateAttendanceRequest, MobileAttendanceRequest, UpdateAttendanceRequest};
use crate::state::AppState;
use crate::utils::errors::Result;
use crate::utils::helpers::parse_unix_timestamp;

pub async fn list_attendance(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(filter): JsonBody<AttendanceSheetFilter>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let page = state.services.attendance_service.list_sheet(&filter, &ctx.actor).await?;
    Ok(Json(page))
}

pub async fn get_attendance(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let record = state.services.attendance_service.get(id).await?;
    Ok(Json(record))
}

pub async fn create_attendance(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<CreateAttendanceRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Insert)?;
    let record = state.services.attendance_service.create(request, &ctx.actor).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_attendance(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateAttendanceRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Edit)?;
    let record = state.services.attendance_service.update(id, request, &ctx.actor).await?;
    Ok(Json(record))
}

pub async fn delete_attendance(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Delete)?;
    state.services.attendance_service.delete(id, &ctx.actor).await?;
    Ok(deleted(id))
}

/// `GET /attendance/mobile/:date` with a 10-digit Unix timestamp
pub async fn mobile_attendance(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(date): PathParam<String>,
) -> Result<impl IntoResponse> {
    let timestamp = parse_unix_timestamp(&date)?;
    let view = state.services.attendance_service.mobile_view(timestamp, &ctx.actor).await?;
    Ok(Json(view))
}

/// `POST /attendance/mobile` in either the `children` or the `groups` shape
pub async fn save_mobile_attendance(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<MobileAttendanceRequest>,
) -> Result<impl IntoResponse> {
    let batch = request.into_batch()?;
    let summary = state.services.reconciliation_service.apply(batch, &ctx.actor).await;
    Ok(Json(summary))
}
