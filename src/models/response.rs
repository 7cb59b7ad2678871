// src/models/response.rs
// DOCUMENTATION: Success envelope shared by every endpoint
// PURPOSE: {"success", "message", "data", "meta"} body

use serde::Serialize;

/// Pagination metadata returned by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_page: i64,
}

impl PageMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_page = if total > 0 && limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            total_page,
        }
    }
}

/// One page of results
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            meta: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn page(message: impl Into<String>, page: Paginated<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: page.data,
            meta: Some(page.meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_page_rounds_up() {
        assert_eq!(PageMeta::new(1, 10, 21).total_page, 3);
        assert_eq!(PageMeta::new(1, 10, 20).total_page, 2);
        assert_eq!(PageMeta::new(1, 10, 0).total_page, 0);
    }

    #[test]
    fn test_meta_omitted_for_plain_responses() {
        let json = serde_json::to_value(ApiResponse::new("ok", 5)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 5);
        assert!(json.get("meta").is_none());

        let page = Paginated {
            data: vec![1, 2],
            meta: PageMeta::new(2, 2, 5),
        };
        let json = serde_json::to_value(ApiResponse::page("ok", page)).unwrap();
        assert_eq!(json["meta"]["totalPage"], 3);
        assert_eq!(json["meta"]["page"], 2);
    }
}
