//! Parental billing endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::context::{JsonBody, PathParam, RequestContext};
use super::deleted;
use crate::middleware::Permission;
use crate::models::{BillingFilter, CreateBillingRequest, UpdateBillingRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn list_billing(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(filter): JsonBody<BillingFilter>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let page = state.services.billing_service.list(&filter, &ctx.actor).await?;
    Ok(Json(page))
}

pub async fn get_billing(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let record = state.services.billing_service.get(id, &ctx.actor).await?;
    Ok(Json(record))
}

pub async fn create_billing(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<CreateBillingRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Insert)?;
    let record = state.services.billing_service.create(request, &ctx.actor).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_billing(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateBillingRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Edit)?;
    let record = state.services.billing_service.update(id, request, &ctx.actor).await?;
    Ok(Json(record))
}

pub async fn delete_billing(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Delete)?;
    state.services.billing_service.delete(id, &ctx.actor).await?;
    Ok(deleted(id))
}
