//! Shared API types: response envelope, list payloads, error mapping

mod validated_json;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DomainError, ListQuery};
use crate::shared::{Pagination, DEFAULT_PAGE_SIZE};

/// Standard API response envelope.
///
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Pagination metadata returned with every list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub size: i64,
    pub take_all: bool,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl From<Pagination> for PaginationMeta {
    fn from(p: Pagination) -> Self {
        Self {
            page: p.page,
            size: p.size,
            take_all: p.take_all,
            total_count: p.total_count,
            total_pages: p.total_pages,
            has_previous: p.has_previous,
            has_next: p.has_next,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub metadata: PaginationMeta,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            metadata: pagination.into(),
        }
    }
}

/// List query parameters shared by every collection endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Free-text substring search
    pub search: Option<String>,
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    pub page: i64,
    /// Page size; non-positive values use the default (10)
    #[serde(default = "default_size")]
    pub size: i64,
    /// Sort column; unknown values sort by id
    pub order_by: Option<String>,
    #[serde(default)]
    pub order_desc: bool,
    /// Return every matching row, ignoring page and size
    #[serde(default)]
    pub take_all: bool,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl From<ListParams> for ListQuery {
    fn from(p: ListParams) -> Self {
        Self {
            search: p.search,
            order_by: p.order_by,
            order_desc: p.order_desc,
            take_all: p.take_all,
            page: p.page,
            size: p.size,
        }
    }
}

/// Error half of every handler result; renders the standard envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            DomainError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            DomainError::Storage { operation, .. } => {
                error!(error = %e, "Storage failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Storage failure during {}", operation),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

/// Parses a path id. Anything that is not an integer is a validation error,
/// never a silent zero.
pub fn parse_id(raw: &str, entity: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| {
        DomainError::Validation(format!("Invalid {} id: '{}'", entity, raw)).into()
    })
}
