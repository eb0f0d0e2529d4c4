//! Children roster service

use std::sync::Arc;

use tracing::debug;

use crate::config::PaginationConfig;
use crate::database::{ChildStore, GroupStore};
use crate::models::{
    Actor, AuditAction, Child, ChildChanges, ChildFilter, CreateChildRequest, Group, NewChild, PageWindow,
    Paginated, UpdateChildRequest,
};
use crate::services::audit::AuditService;
use crate::utils::errors::{KindergartenError, Result};
use crate::utils::helpers::{is_valid_phone, optional_text, require_text};
use crate::utils::logging::log_mutation;

const CHILD_NOT_FOUND: &str = "Дитину не знайдено";
const GROUP_NOT_FOUND: &str = "Групу не знайдено";
const CHILD_EXISTS: &str = "Дитина з таким іменем та батьками вже існує в цьому садочку";
const KINDERGARTEN_MISMATCH: &str = "Назва садочка не співпадає з назвою садочка групи";

#[derive(Clone)]
pub struct ChildService {
    children: Arc<dyn ChildStore>,
    groups: Arc<dyn GroupStore>,
    audit: AuditService,
    pagination: PaginationConfig,
}

impl ChildService {
    pub fn new(
        children: Arc<dyn ChildStore>,
        groups: Arc<dyn GroupStore>,
        audit: AuditService,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            children,
            groups,
            audit,
            pagination,
        }
    }

    pub async fn list(&self, filter: &ChildFilter, actor: &Actor) -> Result<Paginated<Child>> {
        let window = PageWindow::resolve(&filter.list, &self.pagination);
        let (items, total) = self.children.list(filter, window).await?;

        if filter.has_filters() {
            self.audit.row_event(actor, AuditAction::Search, Child::TABLE, None).await;
        }

        Ok(Paginated::new(items, total, window))
    }

    pub async fn get(&self, id: i64) -> Result<Child> {
        self.children
            .find_by_id(id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(CHILD_NOT_FOUND.to_string()))
    }

    async fn group(&self, group_id: i64) -> Result<Group> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(GROUP_NOT_FOUND.to_string()))
    }

    pub async fn create(&self, request: CreateChildRequest, actor: &Actor) -> Result<Child> {
        let child_name = require_text(&request.child_name, "child_name", 100)?;
        let parent_name = require_text(&request.parent_name, "parent_name", 100)?;
        let phone_number = checked_phone(request.phone_number)?;

        let group = self.group(request.group_id).await?;
        check_kindergarten(request.kindergarten_name.as_deref(), &group.kindergarten_name)?;

        debug!(group_id = group.id, child = %child_name, "Creating child");
        if self
            .children
            .find_duplicate(&child_name, &parent_name, &group.kindergarten_name, None)
            .await?
            .is_some()
        {
            return Err(KindergartenError::Conflict(CHILD_EXISTS.to_string()));
        }

        let child = self
            .children
            .create(&NewChild {
                child_name,
                parent_name,
                phone_number,
                group_id: group.id,
            })
            .await?;

        log_mutation(Child::TABLE, "INSERT", child.id, actor.id);
        self.audit.row_event(actor, AuditAction::Insert, Child::TABLE, Some(child.id)).await;
        Ok(child)
    }

    pub async fn update(&self, id: i64, request: UpdateChildRequest, actor: &Actor) -> Result<Child> {
        let existing = self.get(id).await?;
        let changes = ChildChanges {
            child_name: optional_text(request.child_name.as_deref(), "child_name", 100)?,
            parent_name: optional_text(request.parent_name.as_deref(), "parent_name", 100)?,
            phone_number: checked_phone(request.phone_number)?,
            group_id: request.group_id,
        };

        // The kindergarten always follows the group the child ends up in
        let kindergarten_name = match changes.group_id {
            Some(group_id) => Some(self.group(group_id).await?.kindergarten_name),
            None => existing.kindergarten_name.clone(),
        };

        if let Some(kindergarten_name) = kindergarten_name.as_deref() {
            check_kindergarten(request.kindergarten_name.as_deref(), kindergarten_name)?;

            let child_name = changes.child_name.as_deref().unwrap_or(&existing.child_name);
            let parent_name = changes.parent_name.as_deref().unwrap_or(&existing.parent_name);
            if self
                .children
                .find_duplicate(child_name, parent_name, kindergarten_name, Some(id))
                .await?
                .is_some()
            {
                return Err(KindergartenError::Conflict(CHILD_EXISTS.to_string()));
            }
        }

        let child = self.children.update(id, &changes).await?;

        log_mutation(Child::TABLE, "UPDATE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Update, Child::TABLE, Some(id)).await;
        Ok(child)
    }

    pub async fn delete(&self, id: i64, actor: &Actor) -> Result<()> {
        self.get(id).await?;

        if !self.children.delete(id).await? {
            return Err(KindergartenError::NotFound(CHILD_NOT_FOUND.to_string()));
        }

        log_mutation(Child::TABLE, "DELETE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Delete, Child::TABLE, Some(id)).await;
        Ok(())
    }
}

fn check_kindergarten(supplied: Option<&str>, actual: &str) -> Result<()> {
    match supplied.map(str::trim) {
        Some(supplied) if supplied != actual => {
            Err(KindergartenError::Validation(KINDERGARTEN_MISMATCH.to_string()))
        }
        _ => Ok(()),
    }
}

/// Blank phones are dropped, anything else must look like a phone number
fn checked_phone(phone: Option<String>) -> Result<Option<String>> {
    match phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) {
        Some(phone) if !is_valid_phone(&phone) => Err(KindergartenError::Validation(
            "Некоректний формат номера телефону".to_string(),
        )),
        phone => Ok(phone),
    }
}
