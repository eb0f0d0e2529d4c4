//! Daily food cost endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::context::{JsonBody, PathParam, RequestContext};
use super::deleted;
use crate::middleware::Permission;
use crate::models::{CreateFoodCostRequest, FoodCostFilter, UpdateFoodCostRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn list_food_costs(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(filter): JsonBody<FoodCostFilter>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let page = state.services.food_cost_service.list(&filter, &ctx.actor).await?;
    Ok(Json(page))
}

pub async fn get_food_cost(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let cost = state.services.food_cost_service.get(id).await?;
    Ok(Json(cost))
}

pub async fn create_food_cost(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<CreateFoodCostRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Insert)?;
    let cost = state.services.food_cost_service.create(request, &ctx.actor).await?;
    Ok((StatusCode::CREATED, Json(cost)))
}

pub async fn update_food_cost(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateFoodCostRequest>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Edit)?;
    let cost = state.services.food_cost_service.update(id, request, &ctx.actor).await?;
    Ok(Json(cost))
}

pub async fn delete_food_cost(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::Delete)?;
    state.services.food_cost_service.delete(id, &ctx.actor).await?;
    Ok(deleted(id))
}
