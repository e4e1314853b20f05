use serde::{Deserialize, Serialize};
use std::fmt;

/// Issues requested per page from the remote API.
pub const ISSUES_PER_PAGE: u8 = 5;

/// A repository the user follows, keyed by its canonical "owner/repo" name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRepository {
    pub name: String,
}

impl TrackedRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Issue state filter, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl IssueFilter {
    pub const ALL: [IssueFilter; 3] = [IssueFilter::All, IssueFilter::Open, IssueFilter::Closed];

    /// Value of the `state` query parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            IssueFilter::All => "all",
            IssueFilter::Open => "open",
            IssueFilter::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueFilter::All => "All",
            IssueFilter::Open => "Open",
            IssueFilter::Closed => "Closed",
        }
    }
}

impl fmt::Display for IssueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 1-based page index into a paginated issue listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageCursor(u32);

impl PageCursor {
    pub const FIRST: PageCursor = PageCursor(1);

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn is_first(&self) -> bool {
        self.0 <= 1
    }

    /// Previous page, or `None` when already on the first page.
    pub fn back(&self) -> Option<PageCursor> {
        if self.is_first() {
            None
        } else {
            Some(PageCursor(self.0 - 1))
        }
    }

    pub fn next(&self) -> PageCursor {
        PageCursor(self.0.saturating_add(1))
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        PageCursor::FIRST
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exact parameters of one issue listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueQuery {
    pub filter: IssueFilter,
    pub page: PageCursor,
    pub per_page: u8,
}

impl IssueQuery {
    pub fn new(filter: IssueFilter, page: PageCursor) -> Self {
        Self {
            filter,
            page,
            per_page: ISSUES_PER_PAGE,
        }
    }
}

/// Progress of one asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// Repository metadata shown at the top of the issue browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetail {
    pub full_name: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner: Owner,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    #[serde(default)]
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub user: Owner,
    #[serde(default)]
    pub labels: Vec<Label>,
}
