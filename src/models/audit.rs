//! Audit trail events

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Search,
    View,
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Search => "SEARCH",
            AuditAction::View => "VIEW",
            AuditAction::Insert => "INSERT",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }
}

/// The caller behind a request, as far as it is known
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub id: Option<i64>,
    pub source_ip: Option<String>,
}

impl Actor {
    pub fn new(id: Option<i64>, source_ip: Option<String>) -> Self {
        Self { id, source_ip }
    }
}

/// Who did what to which row; the timestamp is assigned on write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub actor_id: Option<i64>,
    pub action: AuditAction,
    pub table: String,
    pub row_id: Option<i64>,
    pub source_ip: Option<String>,
    pub description: Option<String>,
}

impl AuditEvent {
    pub fn new(action: AuditAction, table: &str, row_id: Option<i64>) -> Self {
        Self {
            actor_id: None,
            action,
            table: table.to_string(),
            row_id,
            source_ip: None,
            description: None,
        }
    }

    /// Attribute the event to `actor`
    pub fn by(mut self, actor: &Actor) -> Self {
        self.actor_id = actor.id;
        self.source_ip = actor.source_ip.clone();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}
