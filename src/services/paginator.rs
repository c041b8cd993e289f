use tracing::debug;

use crate::models::{PageView, WeatherRecord};

/// Rows per table page; not configurable
pub const PAGE_SIZE: usize = 50;

/// Client-side pagination over the deduplicated table
///
/// Starts on page 1 for every new dataset. Navigating outside
/// `1..=total_pages` leaves the current page unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    total_records: usize,
}

impl Paginator {
    pub fn new(total_records: usize) -> Self {
        Self {
            current_page: 1,
            total_records,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn total_pages(&self) -> usize {
        self.total_records.div_ceil(PAGE_SIZE)
    }

    pub fn offset(&self) -> usize {
        (self.current_page - 1) * PAGE_SIZE
    }

    /// Move to `page`; returns false and stays put when it is out of range
    pub fn go_to(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            debug!(
                "Ignoring page {} (valid range 1..={})",
                page,
                self.total_pages()
            );
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn prev(&mut self) -> bool {
        match self.current_page.checked_sub(1) {
            Some(page) => self.go_to(page),
            None => false,
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_page + 1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.total_pages())
    }

    pub fn page_slice<'a>(&self, records: &'a [WeatherRecord]) -> &'a [WeatherRecord] {
        let start = self.offset().min(records.len());
        let end = (start + PAGE_SIZE).min(records.len());
        &records[start..end]
    }

    pub fn view(&self, records: &[WeatherRecord]) -> PageView {
        let total_pages = self.total_pages();
        let has_prev = self.current_page > 1;
        let has_next = self.current_page < total_pages;

        PageView {
            page_number: self.current_page,
            page_size: PAGE_SIZE,
            total_records: self.total_records,
            total_pages,
            has_first: has_prev,
            has_prev,
            has_next,
            has_last: has_next,
            records: self.page_slice(records).to_vec(),
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(0)
    }
}
