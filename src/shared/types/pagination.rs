/// Page size used when the caller asks for a non-positive one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Pagination metadata for a filtered result set.
///
/// Always built through [`Pagination::compute`], so `page` is clamped into
/// `[1, total_pages]` (or `1` when there are no pages at all) and `size`
/// is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
    pub take_all: bool,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Pagination {
    pub fn compute(page: i64, size: i64, total: i64) -> Self {
        let size = if size <= 0 { DEFAULT_PAGE_SIZE } else { size };
        let total = total.max(0);
        let total_pages = total / size + i64::from(total % size != 0);

        let mut page = page.max(1);
        if total_pages == 0 {
            page = 1;
        } else if page > total_pages {
            page = total_pages;
        }

        Self {
            page,
            size,
            take_all: false,
            total_count: total,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    pub fn with_take_all(mut self, take_all: bool) -> Self {
        self.take_all = take_all;
        self
    }

    /// Number of rows to skip to reach the current page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.size
    }
}
