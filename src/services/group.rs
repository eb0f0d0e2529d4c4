//! Kindergarten group service

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PaginationConfig;
use crate::database::GroupStore;
use crate::models::{
    Actor, AuditAction, CreateGroupRequest, Group, GroupFilter, PageWindow, Paginated, UpdateGroupRequest,
};
use crate::services::audit::AuditService;
use crate::utils::errors::{KindergartenError, Result};
use crate::utils::helpers::{optional_text, require_text};
use crate::utils::logging::log_mutation;

const GROUP_NOT_FOUND: &str = "Групу не знайдено";
const GROUP_EXISTS: &str = "Група з такою назвою вже існує в цьому садочку";

#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupStore>,
    audit: AuditService,
    pagination: PaginationConfig,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupStore>, audit: AuditService, pagination: PaginationConfig) -> Self {
        Self {
            groups,
            audit,
            pagination,
        }
    }

    pub async fn list(&self, filter: &GroupFilter, actor: &Actor) -> Result<Paginated<Group>> {
        let window = PageWindow::resolve(&filter.list, &self.pagination);
        let (items, total) = self.groups.list(filter, window).await?;

        if filter.has_filters() {
            self.audit.row_event(actor, AuditAction::Search, Group::TABLE, None).await;
        }

        Ok(Paginated::new(items, total, window))
    }

    pub async fn get(&self, id: i64) -> Result<Group> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(GROUP_NOT_FOUND.to_string()))
    }

    pub async fn create(&self, request: CreateGroupRequest, actor: &Actor) -> Result<Group> {
        let request = CreateGroupRequest {
            kindergarten_name: require_text(&request.kindergarten_name, "kindergarten_name", 100)?,
            group_name: require_text(&request.group_name, "group_name", 100)?,
            group_type: request.group_type,
        };
        debug!(kindergarten = %request.kindergarten_name, group = %request.group_name, "Creating group");

        if self
            .groups
            .find_by_name(&request.kindergarten_name, &request.group_name, None)
            .await?
            .is_some()
        {
            return Err(KindergartenError::Conflict(GROUP_EXISTS.to_string()));
        }

        let group = self
            .groups
            .create(&request)
            .await
            .map_err(|e| e.or_conflict(GROUP_EXISTS))?;

        log_mutation(Group::TABLE, "INSERT", group.id, actor.id);
        self.audit.row_event(actor, AuditAction::Insert, Group::TABLE, Some(group.id)).await;
        Ok(group)
    }

    pub async fn update(&self, id: i64, request: UpdateGroupRequest, actor: &Actor) -> Result<Group> {
        let existing = self.get(id).await?;
        let request = UpdateGroupRequest {
            kindergarten_name: optional_text(request.kindergarten_name.as_deref(), "kindergarten_name", 100)?,
            group_name: optional_text(request.group_name.as_deref(), "group_name", 100)?,
            group_type: request.group_type,
        };

        let kindergarten_name = request
            .kindergarten_name
            .as_deref()
            .unwrap_or(&existing.kindergarten_name);
        let group_name = request.group_name.as_deref().unwrap_or(&existing.group_name);

        let renamed = kindergarten_name != existing.kindergarten_name || group_name != existing.group_name;
        if renamed
            && self
                .groups
                .find_by_name(kindergarten_name, group_name, Some(id))
                .await?
                .is_some()
        {
            return Err(KindergartenError::Conflict(GROUP_EXISTS.to_string()));
        }

        let group = self
            .groups
            .update(id, &request)
            .await
            .map_err(|e| e.or_conflict(GROUP_EXISTS))?;

        log_mutation(Group::TABLE, "UPDATE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Update, Group::TABLE, Some(id)).await;
        Ok(group)
    }

    pub async fn delete(&self, id: i64, actor: &Actor) -> Result<()> {
        self.get(id).await?;

        if !self.groups.delete(id).await? {
            return Err(KindergartenError::NotFound(GROUP_NOT_FOUND.to_string()));
        }

        info!(group_id = id, "Group deleted");
        log_mutation(Group::TABLE, "DELETE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Delete, Group::TABLE, Some(id)).await;
        Ok(())
    }
}
