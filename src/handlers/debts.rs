//! Debtor endpoints

use axum::{extract::State, response::IntoResponse, Json};

use super::context::{JsonBody, PathParam, RequestContext};
use crate::middleware::Permission;
use crate::models::DebtFilter;
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn list_debts(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(filter): JsonBody<DebtFilter>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let page = state.services.debt_service.list(&filter, &ctx.actor).await?;
    Ok(Json(page))
}

pub async fn get_debtor(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathParam(id): PathParam<i64>,
) -> Result<impl IntoResponse> {
    ctx.require(Permission::View)?;
    let debtor = state.services.debt_service.get_debtor(id, &ctx.actor).await?;
    Ok(Json(debtor))
}
