//! Read access to the catalog for public and admin callers.

use rusqlite::Connection;
use verdant_catalog::types::*;
use verdant_db::queries::{self, DEFAULT_PAGE_SIZE, Page, PlantOrder, PlantQuery};

use crate::error::ModerationError;

/// Listing request. `status` is honoured for admin callers only.
#[derive(Debug, Clone)]
pub struct ListRequest {
    pub status: Option<StatusFilter>,
    pub category: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub order: PlantOrder,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            status: None,
            category: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            order: PlantOrder::Newest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Audience {
    Public,
    Admin,
}

/// The public catalog: approved records only, system and contributed alike.
pub fn list_public(
    conn: &Connection,
    request: &ListRequest,
) -> Result<Page<PlantRecord>, ModerationError> {
    list(conn, Audience::Public, request)
}

pub(crate) fn list(
    conn: &Connection,
    audience: Audience,
    request: &ListRequest,
) -> Result<Page<PlantRecord>, ModerationError> {
    let status = match audience {
        Audience::Public => StatusFilter::Only(PlantStatus::Approved),
        Audience::Admin => request.status.unwrap_or_default(),
    };

    let query = PlantQuery {
        status,
        category: request.category.clone(),
        page: request.page,
        page_size: request.page_size,
        order: request.order,
    };
    Ok(queries::list_plants(conn, &query)?)
}
