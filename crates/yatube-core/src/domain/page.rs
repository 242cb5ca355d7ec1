//! Pagination of newest-first post listings.
//!
//! The requested page number comes straight from the query string. Missing
//! or non-numeric values select the first page; numbers outside
//! `1..=num_pages` select the last page. An empty listing still has exactly
//! one (empty) page.

use serde::Serialize;

/// Which page the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Exact(u64),
    Last,
}

/// A page request: the requested number and the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: PageNumber,
    pub size: u64,
}

impl PageRequest {
    pub fn new(number: u64, size: u64) -> Self {
        let number = if number == 0 {
            PageNumber::Last
        } else {
            PageNumber::Exact(number)
        };
        Self {
            number,
            size: size.max(1),
        }
    }

    pub fn first(size: u64) -> Self {
        Self::new(1, size)
    }

    /// Interpret a raw `?page=` value.
    pub fn parse(raw: Option<&str>, size: u64) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::first(size);
        };

        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Self::first(size);
        }
        if negative {
            return Self {
                number: PageNumber::Last,
                size: size.max(1),
            };
        }

        // Overflowing numbers are still out of range.
        Self::new(digits.parse().unwrap_or(0), size)
    }

    /// Clamp the request against the number of matching rows.
    pub fn resolve(&self, total: u64) -> PageWindow {
        let num_pages = total.div_ceil(self.size).max(1);
        let number = match self.number {
            PageNumber::Exact(n) if n <= num_pages => n,
            _ => num_pages,
        };

        PageWindow {
            number,
            num_pages,
            offset: (number - 1) * self.size,
            limit: self.size,
        }
    }
}

/// The resolved slice of rows to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    /// Number of rows across all pages.
    pub total: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: u64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total,
            page_size: window.limit,
        }
    }

    /// Paginate an already ordered, fully materialized listing.
    pub fn from_vec(rows: Vec<T>, request: &PageRequest) -> Self {
        let total = rows.len() as u64;
        let window = request.resolve(total);
        let items = rows
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect();
        Self::new(items, window, total)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            page_size: self.page_size,
        }
    }
}
