//! Group endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::context::{JsonBody, PathParam, RequestContext};
use super::deleted;
use crate::middleware::Permission;
use crate::models::{CreateGroupRequest, GroupFilter, UpdateGroupRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn list_groups(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(filter): JsonBody<GroupFilter>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let page = state.services.group_service.list(&filter, &ctx.actor).await?;
    Ok(Json(page))
}

pub async fn get_group(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let group = state.services.group_service.get(id).await?;
    Ok(Json(group))
}

pub async fn create_group(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<CreateGroupRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Insert)?;
    let group = state.services.group_service.create(request, &ctx.actor).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn update_group(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateGroupRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Edit)?;
    let group = state.services.group_service.update(id, request, &ctx.actor).await?;
    Ok(Json(group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Delete)?;
    state.services.group_service.delete(id, &ctx.actor).await?;
    Ok(deleted(id))
}
