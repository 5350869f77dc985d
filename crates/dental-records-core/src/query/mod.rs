//! Query engine: derives a view from a full collection.
//!
//! Pipeline: Search → Filter → Sort
//!
//! The view is recomputed from scratch for every intent. Collections are
//! small; no incremental index is kept.

mod patients;
mod visits;

pub use patients::*;
pub use visits::*;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Record;

/// Categorical filter with an "all" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<C> {
    All,
    Only(C),
}

impl<C> Default for Filter<C> {
    fn default() -> Self {
        Filter::All
    }
}

impl<C: PartialEq> Filter<C> {
    /// Whether a record with category `value` passes.
    pub fn accepts(&self, value: &C) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl<C: FromStr> FromStr for Filter<C> {
    type Err = C::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

impl<C: fmt::Display> fmt::Display for Filter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Only(c) => c.fmt(f),
        }
    }
}

/// Per-entity query behaviour.
pub trait Queryable: Record + Clone {
    /// Field the filter matches exactly.
    type Category: Copy + PartialEq + fmt::Debug;
    /// Enumerated sort orders.
    type SortKey: Copy + PartialEq + fmt::Debug;

    /// Case-insensitive substring match over the searchable fields.
    /// `needle` is already trimmed, lowercased and non-empty.
    fn matches_search(&self, needle: &str) -> bool;

    fn category(&self) -> Self::Category;

    fn compare(&self, other: &Self, key: Self::SortKey) -> Ordering;
}

/// Active search/filter/sort state of a record book.
pub struct Query<R: Queryable> {
    pub search: String,
    pub filter: Filter<R::Category>,
    /// `None` keeps insertion order.
    pub sort: Option<R::SortKey>,
}

impl<R: Queryable> Default for Query<R> {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: Filter::All,
            sort: None,
        }
    }
}

impl<R: Queryable> Clone for Query<R> {
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
            filter: self.filter,
            sort: self.sort,
        }
    }
}

impl<R: Queryable> PartialEq for Query<R> {
    fn eq(&self, other: &Self) -> bool {
        self.search == other.search && self.filter == other.filter && self.sort == other.sort
    }
}

impl<R: Queryable> fmt::Debug for Query<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("search", &self.search)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .finish()
    }
}

impl<R: Queryable> Query<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn with_filter(mut self, filter: Filter<R::Category>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, key: Option<R::SortKey>) -> Self {
        self.sort = key;
        self
    }

    /// Apply search and filter, then a stable sort.
    pub fn run(&self, records: &[R]) -> Vec<R> {
        let needle = self.search.trim().to_lowercase();

        let mut view: Vec<R> = records
            .iter()
            .filter(|r| needle.is_empty() || r.matches_search(&needle))
            .filter(|r| self.filter.accepts(&r.category()))
            .cloned()
            .collect();

        if let Some(key) = self.sort {
            view.sort_by(|a, b| a.compare(b, key));
        }

        view
    }
}

/// Case-insensitive substring test; `needle` must already be lowercase.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Primary collation key: canonical decomposition with accents dropped,
/// then lowercased, so "Élodie" files under "e".
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Name ordering: accent- and case-insensitive first, then case-folded with
/// accents, then raw text so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Most recent first.
pub(crate) fn newest_first<T: Ord>(a: &T, b: &T) -> Ordering {
    b.cmp(a)
}
