//! Administrator and educator accounts, plus educator verification for the mobile app

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{PaginationConfig, PhoneConfig};
use crate::database::AdminStore;
use crate::models::{
    Actor, Admin, AdminFilter, AuditAction, AuditEvent, CreateAdminRequest, EducatorVerification, PageWindow,
    Paginated, UpdateAdminRequest, VerifyEducatorRequest,
};
use crate::services::audit::AuditService;
use crate::utils::errors::{KindergartenError, Result};
use crate::utils::helpers::{is_valid_phone, normalize_phone, optional_text, require_text};
use crate::utils::logging::log_mutation;

const ADMIN_NOT_FOUND: &str = "Адміністратора не знайдено";
const ADMIN_EXISTS: &str = "Адміністратор з таким номером телефону вже існує";
const PHONE_REQUIRED: &str = "Номер телефону обов'язковий";

#[derive(Clone)]
pub struct AdminService {
    admins: Arc<dyn AdminStore>,
    audit: AuditService,
    pagination: PaginationConfig,
    phone: PhoneConfig,
}

impl AdminService {
    pub fn new(
        admins: Arc<dyn AdminStore>,
        audit: AuditService,
        pagination: PaginationConfig,
        phone: PhoneConfig,
    ) -> Self {
        Self {
            admins,
            audit,
            pagination,
            phone,
        }
    }

    /// Validate a client-supplied number and bring it to stored form
    fn normalized_phone(&self, raw: &str) -> Result<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(KindergartenError::Validation(PHONE_REQUIRED.to_string()));
        }
        if !is_valid_phone(raw) {
            return Err(KindergartenError::Validation(
                "Некоректний формат номера телефону".to_string(),
            ));
        }
        Ok(normalize_phone(raw, &self.phone.default_country_prefix))
    }

    pub async fn list(&self, filter: &AdminFilter, actor: &Actor) -> Result<Paginated<Admin>> {
        let window = PageWindow::resolve(&filter.list, &self.pagination);
        let (items, total) = self.admins.list(filter, window).await?;

        if filter.has_filters() {
            self.audit.row_event(actor, AuditAction::Search, Admin::TABLE, None).await;
        }

        Ok(Paginated::new(items, total, window))
    }

    pub async fn get(&self, id: i64) -> Result<Admin> {
        self.admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(ADMIN_NOT_FOUND.to_string()))
    }

    pub async fn create(&self, request: CreateAdminRequest, actor: &Actor) -> Result<Admin> {
        let request = CreateAdminRequest {
            phone_number: self.normalized_phone(&request.phone_number)?,
            full_name: require_text(&request.full_name, "full_name", 150)?,
            kindergarten_name: require_text(&request.kindergarten_name, "kindergarten_name", 100)?,
            role: Some(request.role.unwrap_or_default()),
        };

        if self.admins.find_by_phone(&request.phone_number, None).await?.is_some() {
            return Err(KindergartenError::Conflict(ADMIN_EXISTS.to_string()));
        }

        let admin = self
            .admins
            .create(&request)
            .await
            .map_err(|e| e.or_conflict(ADMIN_EXISTS))?;

        log_mutation(Admin::TABLE, "INSERT", admin.id, actor.id);
        self.audit.row_event(actor, AuditAction::Insert, Admin::TABLE, Some(admin.id)).await;
        Ok(admin)
    }

    pub async fn update(&self, id: i64, request: UpdateAdminRequest, actor: &Actor) -> Result<Admin> {
        let existing = self.get(id).await?;
        let request = UpdateAdminRequest {
            phone_number: request
                .phone_number
                .as_deref()
                .map(|p| self.normalized_phone(p))
                .transpose()?,
            full_name: optional_text(request.full_name.as_deref(), "full_name", 150)?,
            kindergarten_name: optional_text(request.kindergarten_name.as_deref(), "kindergarten_name", 100)?,
            role: request.role,
        };

        if let Some(phone) = request.phone_number.as_deref().filter(|p| *p != existing.phone_number) {
            if self.admins.find_by_phone(phone, Some(id)).await?.is_some() {
                return Err(KindergartenError::Conflict(ADMIN_EXISTS.to_string()));
            }
        }

        let admin = self
            .admins
            .update(id, &request)
            .await
            .map_err(|e| e.or_conflict(ADMIN_EXISTS))?;

        log_mutation(Admin::TABLE, "UPDATE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Update, Admin::TABLE, Some(id)).await;
        Ok(admin)
    }

    pub async fn delete(&self, id: i64, actor: &Actor) -> Result<()> {
        self.get(id).await?;

        if !self.admins.delete(id).await? {
            return Err(KindergartenError::NotFound(ADMIN_NOT_FOUND.to_string()));
        }

        log_mutation(Admin::TABLE, "DELETE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Delete, Admin::TABLE, Some(id)).await;
        Ok(())
    }

    /// Is the owner of this phone number a registered educator?
    pub async fn verify_educator(&self, request: &VerifyEducatorRequest, actor: &Actor) -> Result<EducatorVerification> {
        let raw = request.phone_number.trim();
        if raw.is_empty() {
            return Err(KindergartenError::Validation(PHONE_REQUIRED.to_string()));
        }

        let phone = normalize_phone(raw, &self.phone.default_country_prefix);
        debug!(phone = %phone, "Verifying educator");

        let educator = self
            .admins
            .find_educator_by_phone(&phone)
            .await
            .map_err(|e| KindergartenError::DatabaseQuery(format!("Помилка запиту до бази даних: {}", e)))?;

        if actor.id.is_some() {
            self.audit
                .record(
                    AuditEvent::new(AuditAction::View, Admin::TABLE, educator.as_ref().map(|a| a.id))
                        .by(actor)
                        .with_description("Мобільний додаток - перевірка вихователя"),
                )
                .await;
        }

        info!(is_educator = educator.is_some(), "Educator verification finished");
        Ok(EducatorVerification {
            is_educator: educator.is_some(),
            educator_info: educator.map(Into::into),
        })
    }
}
