//! Daily food cost service

use std::sync::Arc;

use crate::config::PaginationConfig;
use crate::database::FoodCostStore;
use crate::models::{
    Actor, AuditAction, CreateFoodCostRequest, DailyFoodCost, FoodCostFilter, PageWindow, Paginated,
    UpdateFoodCostRequest,
};
use crate::services::audit::AuditService;
use crate::utils::errors::{KindergartenError, Result};
use crate::utils::logging::log_mutation;

const COST_NOT_FOUND: &str = "Запис не знайдено";
const COST_EXISTS: &str = "Вартість харчування на цю дату вже існує";

#[derive(Clone)]
pub struct FoodCostService {
    costs: Arc<dyn FoodCostStore>,
    audit: AuditService,
    pagination: PaginationConfig,
}

impl FoodCostService {
    pub fn new(costs: Arc<dyn FoodCostStore>, audit: AuditService, pagination: PaginationConfig) -> Self {
        Self {
            costs,
            audit,
            pagination,
        }
    }

    pub async fn list(&self, filter: &FoodCostFilter, actor: &Actor) -> Result<Paginated<DailyFoodCost>> {
        let window = PageWindow::resolve(&filter.list, &self.pagination);
        let (items, total) = self.costs.list(filter, window).await?;

        if filter.has_filters() {
            self.audit.row_event(actor, AuditAction::Search, DailyFoodCost::TABLE, None).await;
        }

        Ok(Paginated::new(items, total, window))
    }

    pub async fn get(&self, id: i64) -> Result<DailyFoodCost> {
        self.costs
            .find_by_id(id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(COST_NOT_FOUND.to_string()))
    }

    pub async fn create(&self, request: CreateFoodCostRequest, actor: &Actor) -> Result<DailyFoodCost> {
        check_cost(Some(request.young_group_cost))?;
        check_cost(Some(request.older_group_cost))?;

        if self.costs.find_by_date(request.date, None).await?.is_some() {
            return Err(KindergartenError::Conflict(COST_EXISTS.to_string()));
        }

        let cost = self
            .costs
            .create(&request)
            .await
            .map_err(|e| e.or_conflict(COST_EXISTS))?;

        log_mutation(DailyFoodCost::TABLE, "INSERT", cost.id, actor.id);
        self.audit
            .row_event(actor, AuditAction::Insert, DailyFoodCost::TABLE, Some(cost.id))
            .await;
        Ok(cost)
    }

    pub async fn update(&self, id: i64, request: UpdateFoodCostRequest, actor: &Actor) -> Result<DailyFoodCost> {
        check_cost(request.young_group_cost)?;
        check_cost(request.older_group_cost)?;
        let existing = self.get(id).await?;

        if let Some(date) = request.date.filter(|d| *d != existing.date) {
            if self.costs.find_by_date(date, Some(id)).await?.is_some() {
                return Err(KindergartenError::Conflict(COST_EXISTS.to_string()));
            }
        }

        let cost = self
            .costs
            .update(id, &request)
            .await
            .map_err(|e| e.or_conflict(COST_EXISTS))?;

        log_mutation(DailyFoodCost::TABLE, "UPDATE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Update, DailyFoodCost::TABLE, Some(id)).await;
        Ok(cost)
    }

    pub async fn delete(&self, id: i64, actor: &Actor) -> Result<()> {
        self.get(id).await?;

        if !self.costs.delete(id).await? {
            return Err(KindergartenError::NotFound(COST_NOT_FOUND.to_string()));
        }

        log_mutation(DailyFoodCost::TABLE, "DELETE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Delete, DailyFoodCost::TABLE, Some(id)).await;
        Ok(())
    }
}

fn check_cost(cost: Option<f64>) -> Result<()> {
    match cost {
        Some(value) if !value.is_finite() || value < 0.0 => Err(KindergartenError::Validation(
            "Вартість харчування не може бути від'ємною".to_string(),
        )),
        _ => Ok(()),
    }
}
