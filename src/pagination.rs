use serde::Serialize;

/// Page size used by list endpoints when the client does not ask for one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Upper bound on the page size a client may request.
pub const MAX_ITEMS_PER_PAGE: usize = 200;

/// 1-based page selection applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Row offset of the first item on the page.
    pub fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// A single page of results together with paging metadata.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total: usize, per_page: usize) -> Self {
        let total_pages = total.div_ceil(per_page.max(1));
        Self {
            items,
            page,
            total_pages,
            total,
        }
    }
}

/// Normalise client-supplied paging parameters.
pub fn page_params(page: Option<usize>, per_page: Option<usize>) -> (usize, usize) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page
        .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
        .clamp(1, MAX_ITEMS_PER_PAGE);
    (page, per_page)
}
