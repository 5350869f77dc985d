//! Boundary with the presentation layer.
//!
//! Front ends raise [`Intent`]s; the office answers through a [`Presenter`]
//! with the recomputed view, fresh stats and toast-style notices.

use std::fmt;

use crate::query::Filter;
use crate::records::Managed;
use crate::stats::Summarize;

/// A user action crossing into the core.
pub enum Intent<R: Managed> {
    CreateRequested(R::Draft),
    UpdateRequested { id: String, changes: R::Changes },
    /// Confirmation is the front end's job; the core deletes immediately.
    DeleteRequested(String),
    SearchChanged(String),
    FilterChanged(Filter<R::Category>),
    SortChanged(Option<R::SortKey>),
    DetailRequested(String),
}

impl<R: Managed> Intent<R> {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::CreateRequested(_) => "create",
            Intent::UpdateRequested { .. } => "update",
            Intent::DeleteRequested(_) => "delete",
            Intent::SearchChanged(_) => "search",
            Intent::FilterChanged(_) => "filter",
            Intent::SortChanged(_) => "sort",
            Intent::DetailRequested(_) => "detail",
        }
    }

    /// Whether the intent changes the collection.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Intent::CreateRequested(_) | Intent::UpdateRequested { .. } | Intent::DeleteRequested(_)
        )
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        })
    }
}

/// User-facing feedback about the last intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Rendering surface for one record collection.
pub trait Presenter<R: Summarize> {
    /// Show the current view and dashboard numbers.
    fn render(&mut self, view: &[R], stats: &R::Stats);

    /// Show one record in full.
    fn show_detail(&mut self, record: &R);

    fn notify(&mut self, notice: Notice);
}

/// Presenter that keeps whatever it was last given. Used by the FFI layer,
/// which hands snapshots back to the native front end.
#[derive(Debug, Clone)]
pub struct Snapshot<R: Summarize> {
    pub view: Vec<R>,
    pub stats: Option<R::Stats>,
    pub detail: Option<R>,
    pub notices: Vec<Notice>,
}

impl<R: Summarize> Default for Snapshot<R> {
    fn default() -> Self {
        Self {
            view: Vec::new(),
            stats: None,
            detail: None,
            notices: Vec::new(),
        }
    }
}

impl<R: Summarize + Clone> Presenter<R> for Snapshot<R> {
    fn render(&mut self, view: &[R], stats: &R::Stats) {
        self.view = view.to_vec();
        self.stats = Some(stats.clone());
    }

    fn show_detail(&mut self, record: &R) {
        self.detail = Some(record.clone());
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
