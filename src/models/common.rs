//! Pagination types shared by every listing endpoint

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::utils::helpers::{calculate_offset, total_pages};

/// Paging and sorting fields accepted by every `/filter` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

/// Resolved page window, already clamped to the configured bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    pub fn resolve(params: &ListParams, config: &PaginationConfig) -> Self {
        let limit = params
            .limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit);
        // Past this page the offset no longer fits in an i64
        let page = params.page.unwrap_or(1).clamp(1, i64::MAX / limit);

        Self {
            page,
            limit,
            offset: calculate_offset(page, limit),
        }
    }
}

/// Pagination envelope returned by listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total_items: i64, window: PageWindow) -> Self {
        Self {
            items,
            total_items,
            current_page: window.page,
            total_pages: total_pages(total_items, window.limit),
            limit: window.limit,
        }
    }
}

/// True when an optional text filter carries something to match
pub(crate) fn has_text(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}
