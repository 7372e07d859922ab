//! List query construction shared by every repository backend.
//!
//! A [`ListQuery`] is what the caller asks for. [`ListPlan::build`] turns it
//! into storage-neutral pieces: an optional search filter, a resolved order
//! clause and the page request used to derive the limit/offset window once the
//! total row count is known.

use std::fmt::Debug;

use crate::shared::Pagination;

/// Raw list request: free-text search, sort key, direction and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_desc: bool,
    pub take_all: bool,
    pub page: i64,
    pub size: i64,
}

/// Per-entity column mapping used by the list query builder.
///
/// `sort_column` is the allow-list: only keys it recognises ever reach a
/// query, everything else falls back to `DEFAULT_SORT`.
pub trait ListSchema {
    type Column: Copy + Eq + Debug + Send + Sync + 'static;

    const DEFAULT_SORT: Self::Column;
    const SEARCH_COLUMNS: &'static [Self::Column];

    fn sort_column(key: &str) -> Option<Self::Column>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderClause<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C> OrderClause<C> {
    pub fn is_desc(&self) -> bool {
        self.direction == SortDirection::Desc
    }
}

/// Escape character paired with [`SearchFilter::pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// Substring match of one term against any of the given columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter<C: 'static> {
    term: String,
    columns: &'static [C],
}

impl<C> SearchFilter<C> {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn columns(&self) -> &'static [C] {
        self.columns
    }

    /// Wildcard pattern for `LIKE`-style storage.
    ///
    /// `%`, `_` and the escape character in the term are escaped with
    /// [`LIKE_ESCAPE`], so they only ever match themselves.
    pub fn pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.term.len() + 2);
        pattern.push('%');
        for ch in self.term.chars() {
            if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
                pattern.push(LIKE_ESCAPE);
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }

    /// Case-insensitive substring check for storage without `LIKE`.
    pub fn matches(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.term.to_lowercase())
    }
}

/// Limit/offset applied to the bounded query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPlan<C: 'static> {
    pub filter: Option<SearchFilter<C>>,
    pub order: OrderClause<C>,
    pub take_all: bool,
    page: i64,
    size: i64,
}

impl<C: Copy> ListPlan<C> {
    pub fn build<S>(query: &ListQuery) -> Self
    where
        S: ListSchema<Column = C>,
    {
        let filter = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| SearchFilter {
                term: term.to_string(),
                columns: S::SEARCH_COLUMNS,
            });

        let column = query
            .order_by
            .as_deref()
            .and_then(S::sort_column)
            .unwrap_or(S::DEFAULT_SORT);

        let direction = if query.order_desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };

        Self {
            filter,
            order: OrderClause { column, direction },
            take_all: query.take_all,
            page: query.page,
            size: query.size,
        }
    }

    /// Pagination metadata for `total` matching rows and the window to fetch.
    ///
    /// The window uses the clamped page, and is `None` for take-all requests.
    pub fn window(&self, total: i64) -> (Pagination, Option<PageWindow>) {
        let pagination = Pagination::compute(self.page, self.size, total).with_take_all(self.take_all);
        if self.take_all {
            return (pagination, None);
        }

        let window = PageWindow {
            limit: pagination.size as u64,
            offset: pagination.offset() as u64,
        };
        (pagination, Some(window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Col {
        Id,
        Name,
        Email,
    }

    struct People;

    impl ListSchema for People {
        type Column = Col;
        const DEFAULT_SORT: Col = Col::Id;
        const SEARCH_COLUMNS: &'static [Col] = &[Col::Name, Col::Email];

        fn sort_column(key: &str) -> Option<Col> {
            match key {
                "name" => Some(Col::Name),
                "email" => Some(Col::Email),
                _ => None,
            }
        }
    }

    fn query() -> ListQuery {
        ListQuery {
            page: 1,
            size: 10,
            ..Default::default()
        }
    }

    #[test]
    fn unknown_order_key_falls_back_to_default_column() {
        for key in ["password", "id; DROP TABLE users", "", "NAME"] {
            let plan = ListPlan::build::<People>(&ListQuery {
                order_by: Some(key.to_string()),
                ..query()
            });
            assert_eq!(plan.order.column, Col::Id, "key {:?}", key);
        }
    }

    #[test]
    fn allowed_order_key_and_direction_are_resolved() {
        let plan = ListPlan::build::<People>(&ListQuery {
            order_by: Some("email".into()),
            order_desc: true,
            ..query()
        });
        assert_eq!(plan.order.column, Col::Email);
        assert!(plan.order.is_desc());

        let plan = ListPlan::build::<People>(&query());
        assert_eq!(plan.order.direction, SortDirection::Asc);
    }

    #[test]
    fn blank_search_adds_no_filter() {
        for search in [None, Some(""), Some("   ")] {
            let plan = ListPlan::build::<People>(&ListQuery {
                search: search.map(String::from),
                ..query()
            });
            assert!(plan.filter.is_none());
        }
    }

    #[test]
    fn search_targets_schema_columns_with_wildcards() {
        let plan = ListPlan::build::<People>(&ListQuery {
            search: Some(" ali ".into()),
            ..query()
        });
        let filter = plan.filter.unwrap();
        assert_eq!(filter.columns(), &[Col::Name, Col::Email]);
        assert_eq!(filter.pattern(), "%ali%");
        assert!(filter.matches("Alice"));
        assert!(!filter.matches("Bob"));
    }

    #[test]
    fn like_metacharacters_in_search_are_literal() {
        let plan = ListPlan::build::<People>(&ListQuery {
            search: Some(r"50%_off\".into()),
            ..query()
        });
        let filter = plan.filter.unwrap();
        assert_eq!(filter.pattern(), r"%50\%\_off\\%");
        assert!(filter.matches(r"Sale 50%_OFF\ today"));
        assert!(!filter.matches("50 percent off"));
    }

    #[test]
    fn window_uses_clamped_page() {
        let plan = ListPlan::build::<People>(&ListQuery {
            page: 4,
            size: 10,
            ..query()
        });
        let (pagination, window) = plan.window(25);
        assert_eq!(pagination.page, 3);
        assert_eq!(window, Some(PageWindow { limit: 10, offset: 20 }));
    }

    #[test]
    fn window_defaults_non_positive_size() {
        let plan = ListPlan::build::<People>(&ListQuery {
            page: 2,
            size: 0,
            ..query()
        });
        let (_, window) = plan.window(100);
        assert_eq!(window, Some(PageWindow { limit: 10, offset: 10 }));
    }

    #[test]
    fn take_all_disables_window() {
        for (page, size) in [(1, 10), (9, 1), (-1, 0)] {
            let plan = ListPlan::build::<People>(&ListQuery {
                take_all: true,
                page,
                size,
                ..query()
            });
            let (pagination, window) = plan.window(500);
            assert!(window.is_none());
            assert!(pagination.take_all);
        }
    }
}
