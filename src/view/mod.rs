//! Filtered, sorted, paginated views over reconstructed process records

use crate::analytics::{format_duration, ProcessRecord};
use crate::{config_error, WfLogstatsError};
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

/// Default number of records per page
pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;

/// Record field a view can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    StartDate,
    EndDate,
    Duration,
    Username,
    Signature,
}

impl FromStr for SortKey {
    type Err = WfLogstatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortKey::Id),
            "start_date" => Ok(SortKey::StartDate),
            "end_date" => Ok(SortKey::EndDate),
            "duration" => Ok(SortKey::Duration),
            "username" => Ok(SortKey::Username),
            "signature" => Ok(SortKey::Signature),
            other => Err(config_error(
                &format!("Unknown sort field: {}", other),
                Some("sort"),
            )),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortKey::Id => "id",
            SortKey::StartDate => "start_date",
            SortKey::EndDate => "end_date",
            SortKey::Duration => "duration",
            SortKey::Username => "username",
            SortKey::Signature => "signature",
        };
        write!(f, "{}", name)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = WfLogstatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(config_error(
                &format!("Unknown sort order: {}", other),
                Some("order"),
            )),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Query parameters of one view request
#[derive(Debug, Clone)]
pub struct ViewQuery {
    /// Case-insensitive substring matched against usernames; empty matches all
    pub search: String,
    pub sort: SortKey,
    pub order: SortOrder,
    /// 1-based page number
    pub page: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortKey::StartDate,
            order: SortOrder::Asc,
            page: 1,
        }
    }
}

/// One record of a view page, annotated with its display duration
#[derive(Debug, Clone, Serialize)]
pub struct PageEntry {
    #[serde(flatten)]
    pub record: ProcessRecord,
    pub formatted_duration: String,
}

/// One page of a filtered and sorted record set
#[derive(Debug, Serialize)]
pub struct ViewPage {
    pub entries: Vec<PageEntry>,
    pub has_next_page: bool,
    pub total_pages: usize,
}

/// Engine applying search, sort and pagination to a record set
pub struct ViewEngine {
    items_per_page: usize,
}

impl ViewEngine {
    pub fn new() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }

    pub fn with_page_size(items_per_page: usize) -> Self {
        Self { items_per_page }
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Apply the query and slice out the requested page.
    ///
    /// Sorting is stable; records with equal keys keep their input order,
    /// in both directions. Pages past the end yield an empty slice and
    /// `has_next_page = false`; no clamping is performed.
    pub fn apply(&self, records: &[ProcessRecord], query: &ViewQuery) -> ViewPage {
        let needle = query.search.to_lowercase();
        let mut filtered: Vec<&ProcessRecord> = records
            .iter()
            .filter(|r| r.username.to_lowercase().contains(&needle))
            .collect();

        filtered.sort_by(|a, b| {
            let ordering = compare_by(a, b, query.sort);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total_items = filtered.len();
        let total_pages = (total_items + self.items_per_page - 1) / self.items_per_page;

        let start = query.page.saturating_sub(1) * self.items_per_page;
        let end = (start + self.items_per_page).min(total_items);
        let entries = if start < total_items {
            filtered[start..end]
                .iter()
                .map(|r| PageEntry {
                    record: (*r).clone(),
                    formatted_duration: format_duration(r.duration_hours * 3_600.0),
                })
                .collect()
        } else {
            Vec::new()
        };

        ViewPage {
            entries,
            has_next_page: query.page < total_pages,
            total_pages,
        }
    }
}

impl Default for ViewEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_by(a: &ProcessRecord, b: &ProcessRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.process_id.cmp(&b.process_id),
        SortKey::StartDate => a.start_date.cmp(&b.start_date),
        SortKey::EndDate => a.end_date.cmp(&b.end_date),
        SortKey::Duration => a.duration_hours.total_cmp(&b.duration_hours),
        SortKey::Username => a.username.cmp(&b.username),
        SortKey::Signature => a.signature.cmp(&b.signature),
    }
}
