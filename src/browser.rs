use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::host::RepoHost;
use crate::route::decode_segment;
use crate::types::{Issue, IssueFilter, IssueQuery, LoadState, PageCursor, RepositoryDetail};

/// Ticket attached to every issue request; only the latest one is applied.
///
/// Tokens are unique for the whole process so that a response addressed to a
/// browser the user already left can never match its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

impl RequestToken {
    fn next() -> Self {
        RequestToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// An issue listing the caller should fetch and hand back with its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub token: RequestToken,
    pub identifier: String,
    pub query: IssueQuery,
}

/// State of the issue browser for one repository.
#[derive(Debug)]
pub struct IssueBrowser {
    pub identifier: String,
    pub detail: Option<RepositoryDetail>,
    pub issues: Vec<Issue>,
    /// Initial load of metadata plus first page.
    pub load: LoadState,
    /// Reloads after a page or filter change.
    pub issues_state: LoadState,
    pub page: PageCursor,
    pub filters: [IssueFilter; 3],
    pub filter_index: usize,
    pub selected: usize,
    latest: u64,
    initial: Option<RequestToken>,
}

impl IssueBrowser {
    /// Open the browser for a percent-encoded route segment.
    pub fn open(segment: &str) -> Result<Self> {
        let identifier = decode_segment(segment)?;
        Ok(Self::new(identifier))
    }

    pub fn new(identifier: String) -> Self {
        Self {
            identifier,
            detail: None,
            issues: Vec::new(),
            load: LoadState::Idle,
            issues_state: LoadState::Idle,
            page: PageCursor::FIRST,
            filters: IssueFilter::ALL,
            filter_index: 0,
            selected: 0,
            latest: 0,
            initial: None,
        }
    }

    pub fn filter(&self) -> IssueFilter {
        self.filters[self.filter_index]
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.issues.get(self.selected)
    }

    fn issue_request(&mut self) -> IssueRequest {
        let token = RequestToken::next();
        self.latest = token.0;
        IssueRequest {
            token,
            identifier: self.identifier.clone(),
            query: IssueQuery::new(self.filter(), self.page),
        }
    }

    /// Start the initial load: metadata and first page of the active filter.
    pub fn begin_initial_load(&mut self) -> IssueRequest {
        self.page = PageCursor::FIRST;
        self.load = LoadState::Loading;
        self.issues_state = LoadState::Idle;
        let request = self.issue_request();
        self.initial = Some(request.token);
        request
    }

    pub fn finish_initial_load(
        &mut self,
        token: RequestToken,
        result: Result<(RepositoryDetail, Vec<Issue>)>,
    ) {
        if self.initial != Some(token) {
            tracing::debug!(?token, "discarding superseded initial load");
            return;
        }
        self.initial = None;
        match result {
            Ok((detail, issues)) => {
                self.detail = Some(detail);
                // a page or filter change issued meanwhile owns the issue list
                if token.0 == self.latest {
                    self.set_issues(issues);
                }
                self.load = LoadState::Success;
            }
            Err(e) => {
                tracing::warn!(error = %e, identifier = %self.identifier, "initial load failed");
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Advance one page. There is no upper bound.
    pub fn next_page(&mut self) -> IssueRequest {
        self.page = self.page.next();
        self.begin_reload()
    }

    /// Go back one page, or do nothing on the first page.
    pub fn prev_page(&mut self) -> Option<IssueRequest> {
        let page = self.page.back()?;
        self.page = page;
        Some(self.begin_reload())
    }

    /// Make the filter at `index` active. The page cursor restarts at 1.
    pub fn select_filter(&mut self, index: usize) -> Option<IssueRequest> {
        if index >= self.filters.len() || index == self.filter_index {
            return None;
        }
        self.filter_index = index;
        self.page = PageCursor::FIRST;
        Some(self.begin_reload())
    }

    pub fn cycle_filter(&mut self) -> Option<IssueRequest> {
        self.select_filter((self.filter_index + 1) % self.filters.len())
    }

    /// Re-request the current page with the current filter.
    pub fn reload(&mut self) -> IssueRequest {
        self.begin_reload()
    }

    /// True until metadata has arrived; a refresh must repeat the initial load.
    pub fn needs_initial_load(&self) -> bool {
        self.detail.is_none()
    }

    fn begin_reload(&mut self) -> IssueRequest {
        self.issues_state = LoadState::Loading;
        self.issue_request()
    }

    pub fn finish_issues(&mut self, token: RequestToken, result: Result<Vec<Issue>>) {
        if token.0 != self.latest {
            tracing::debug!(?token, latest = self.latest, "discarding stale issue page");
            return;
        }
        match result {
            Ok(issues) => {
                self.set_issues(issues);
                self.issues_state = LoadState::Success;
            }
            Err(e) => {
                tracing::warn!(error = %e, identifier = %self.identifier, "issue reload failed");
                self.issues_state = LoadState::Failed(e.to_string());
            }
        }
    }

    fn set_issues(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        if !self.issues.is_empty() && self.selected < self.issues.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Fetch metadata and the first issue page concurrently.
pub async fn fetch_initial(
    host: &dyn RepoHost,
    request: &IssueRequest,
) -> Result<(RepositoryDetail, Vec<Issue>)> {
    let (detail, issues) = tokio::join!(
        host.get_repository(&request.identifier),
        host.list_issues(&request.identifier, &request.query)
    );
    Ok((detail?, issues?))
}

pub async fn fetch_issues(host: &dyn RepoHost, request: &IssueRequest) -> Result<Vec<Issue>> {
    host.list_issues(&request.identifier, &request.query).await
}
