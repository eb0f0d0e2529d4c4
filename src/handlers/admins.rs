//! Admin and educator endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::context::{JsonBody, PathParam, RequestContext};
use super::deleted;
use crate::middleware::Permission;
use crate::models::{AdminFilter, CreateAdminRequest, UpdateAdminRequest, VerifyEducatorRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn list_admins(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(filter): JsonBody<AdminFilter>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let page = state.services.admin_service.list(&filter, &ctx.actor).await?;
    Ok(Json(page))
}

pub async fn get_admin(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let admin = state.services.admin_service.get(id).await?;
    Ok(Json(admin))
}

pub async fn create_admin(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<CreateAdminRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Insert)?;
    let admin = state.services.admin_service.create(request, &ctx.actor).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

pub async fn update_admin(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateAdminRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Edit)?;
    let admin = state.services.admin_service.update(id, request, &ctx.actor).await?;
    Ok(Json(admin))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Delete)?;
    state.services.admin_service.delete(id, &ctx.actor).await?;
    Ok(deleted(id))
}

/// Any authenticated caller may ask whether a phone belongs to an educator
pub async fn verify_educator(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<VerifyEducatorRequest>,
) -> Result<impl IntoResponse> {
    let verification = state.services.admin_service.verify_educator(&request, &ctx.actor).await?;
    Ok(Json(verification))
}
