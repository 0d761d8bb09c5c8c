//! `X-Pagination` response header.

use axum::http::{HeaderName, HeaderValue};
use routine_core::query::PageMetadata;
use serde::Serialize;
use url::form_urlencoded;

use crate::infra::errors::AppError;

pub const X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaginationHeader {
    total_count: u64,
    page_size: u64,
    current_page: u64,
    total_pages: u64,
    previous_page_link: Option<String>,
    next_page_link: Option<String>,
}

/// Query parameters that survive into the previous/next links.
#[derive(Debug, Default)]
pub struct LinkParams<'a> {
    pairs: Vec<(&'static str, &'a str)>,
}

impl<'a> LinkParams<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `key` only when it has a value.
    pub fn with(mut self, key: &'static str, value: Option<&'a str>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, value));
        }
        self
    }

    fn link(&self, path: &str, page_number: u64, page_size: u64) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            query.append_pair(key, value);
        }
        query.append_pair("pageNumber", &page_number.to_string());
        query.append_pair("pageSize", &page_size.to_string());
        format!("{path}?{}", query.finish())
    }
}

/// Renders page metadata plus neighbour links relative to `path`.
///
/// Link values are percent-encoded, so the JSON stays visible ASCII.
pub fn pagination_header(
    path: &str,
    params: &LinkParams<'_>,
    page: &PageMetadata,
) -> Result<HeaderValue, AppError> {
    let header = PaginationHeader {
        total_count: page.total_count,
        page_size: page.page_size,
        current_page: page.current_page,
        total_pages: page.total_pages,
        previous_page_link: page
            .has_previous
            .then(|| params.link(path, page.current_page - 1, page.page_size)),
        next_page_link: page
            .has_next
            .then(|| params.link(path, page.current_page + 1, page.page_size)),
    };

    let json = serde_json::to_string(&header)
        .map_err(|err| AppError::internal(err.to_string()))?;
    HeaderValue::from_str(&json).map_err(|err| AppError::internal(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use routine_core::query::PageRequest;

    fn metadata(total: u64, page: i64, size: i64) -> PageMetadata {
        PageMetadata::new(total, PageRequest::new(page, size, 20))
    }

    #[test]
    fn middle_page_links_both_ways_and_keeps_filters() {
        let params = LinkParams::new()
            .with("q", Some("卡 & co"))
            .with("name", None)
            .with("orderBy", Some("name desc"));
        let value =
            pagination_header("/api/company", &params, &metadata(12, 2, 5)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(value.to_str().unwrap()).unwrap();

        assert_eq!(json["totalCount"], 12);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(
            json["previousPageLink"],
            "/api/company?q=%E5%8D%A1+%26+co&orderBy=name+desc&pageNumber=1&pageSize=5"
        );
        assert_eq!(
            json["nextPageLink"],
            "/api/company?q=%E5%8D%A1+%26+co&orderBy=name+desc&pageNumber=3&pageSize=5"
        );
    }

    #[test]
    fn single_page_has_no_links() {
        let value = pagination_header("/api/company", &LinkParams::new(), &metadata(3, 1, 5))
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(value.to_str().unwrap()).unwrap();
        assert!(json["previousPageLink"].is_null());
        assert!(json["nextPageLink"].is_null());
    }
}
