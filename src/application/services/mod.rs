//! Application services

mod product_service;
mod user_service;

pub use product_service::ProductService;
pub use user_service::UserService;

use crate::domain::ListQuery;
use crate::shared::DEFAULT_PAGE_SIZE;

/// Raises the page to 1 and replaces a non-positive size with the default.
pub(crate) fn normalize_query(mut query: ListQuery) -> ListQuery {
    if query.page < 1 {
        query.page = 1;
    }
    if query.size <= 0 {
        query.size = DEFAULT_PAGE_SIZE;
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_query_fixes_page_and_size_only() {
        let query = normalize_query(ListQuery {
            search: Some("x".into()),
            page: -4,
            size: 0,
            ..Default::default()
        });
        assert_eq!(query.page, 1);
        assert_eq!(query.size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.search.as_deref(), Some("x"));

        let query = normalize_query(ListQuery {
            page: 3,
            size: 25,
            ..Default::default()
        });
        assert_eq!((query.page, query.size), (3, 25));
    }
}
