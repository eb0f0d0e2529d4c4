//! Children roster endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::context::{JsonBody, PathParam, RequestContext};
use super::deleted;
use crate::middleware::Permission;
use crate::models::{ChildFilter, CreateChildRequest, UpdateChildRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn list_children(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(filter): JsonBody<ChildFilter>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let page = state.services.child_service.list(&filter, &ctx.actor).await?;
    Ok(Json(page))
}

pub async fn get_child(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let child = state.services.child_service.get(id).await?;
    Ok(Json(child))
}

pub async fn create_child(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<CreateChildRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Insert)?;
    let child = state.services.child_service.create(request, &ctx.actor).await?;
    Ok((StatusCode::CREATED, Json(child)))
}

pub async fn update_child(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateChildRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Edit)?;
    let child = state.services.child_service.update(id, request, &ctx.actor).await?;
    Ok(Json(child))
}

pub async fn delete_child(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Delete)?;
    state.services.child_service.delete(id, &ctx.actor).await?;
    Ok(deleted(id))
}
