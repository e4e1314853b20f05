use crate::error::{Result, TrackError};
use crate::host::RepoHost;
use crate::store::TrackedStore;
use crate::types::{LoadState, RepositoryDetail, TrackedRepository};

/// State of the tracked-repository list screen.
#[derive(Debug)]
pub struct TrackedList {
    pub input: String,
    pub editing: bool,
    pub submit: LoadState,
    pub selected: usize,
    store: TrackedStore,
}

impl TrackedList {
    pub fn new(store: TrackedStore) -> Self {
        Self {
            input: String::new(),
            editing: false,
            submit: LoadState::Idle,
            selected: 0,
            store,
        }
    }

    pub fn repos(&self) -> &[TrackedRepository] {
        self.store.repos()
    }

    pub fn selected_repo(&self) -> Option<&TrackedRepository> {
        self.store.get(self.selected)
    }

    /// Whether the generic "could not add" alert is showing.
    pub fn alert(&self) -> bool {
        self.submit.is_failed()
    }

    pub fn input_char(&mut self, c: char) {
        self.clear_alert();
        self.input.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.clear_alert();
        self.input.pop();
    }

    fn clear_alert(&mut self) {
        if self.submit.is_failed() {
            self.submit = LoadState::Idle;
        }
    }

    /// Start adding the repository named by the input buffer.
    ///
    /// Returns the identifier to look up remotely, or `None` when nothing
    /// should be requested: a submit is already in flight, or the input was
    /// rejected locally (the rejection is recorded in `submit`).
    pub fn submit(&mut self) -> Option<String> {
        if self.submit.is_loading() {
            return None;
        }

        let query = self.input.trim().to_string();
        if query.is_empty() {
            self.fail(TrackError::EmptyInput);
            return None;
        }
        if self.store.contains(&self.input) {
            let name = self.input.clone();
            self.fail(TrackError::Duplicate(name));
            return None;
        }

        self.submit = LoadState::Loading;
        Some(query)
    }

    /// Apply the result of the remote lookup started by [`TrackedList::submit`].
    pub fn finish_submit(&mut self, result: Result<RepositoryDetail>) {
        if !self.submit.is_loading() {
            tracing::debug!("ignoring lookup result with no submit in flight");
            return;
        }

        let detail = match result {
            Ok(detail) => detail,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        if self.store.contains(&self.input) || self.store.contains(&detail.full_name) {
            self.fail(TrackError::Duplicate(detail.full_name));
            return;
        }

        tracing::info!(name = %detail.full_name, "tracking repository");
        self.store.push(TrackedRepository::new(detail.full_name));
        self.input.clear();
        self.submit = LoadState::Success;
    }

    /// Run a whole add in place: submit, look up on `host`, apply.
    pub async fn add(&mut self, host: &dyn RepoHost) {
        if let Some(query) = self.submit() {
            let result = host.get_repository(&query).await;
            self.finish_submit(result);
        }
    }

    pub fn remove(&mut self, name: &str) {
        if self.store.remove(name) {
            tracing::info!(name, "untracked repository");
            self.selected = self.selected.min(self.store.len().saturating_sub(1));
        }
    }

    pub fn remove_selected(&mut self) {
        if let Some(name) = self.selected_repo().map(|r| r.name.clone()) {
            self.remove(&name);
        }
    }

    pub fn select_next(&mut self) {
        if !self.store.is_empty() && self.selected < self.store.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn fail(&mut self, err: TrackError) {
        tracing::warn!(error = %err, input = %self.input, "could not add repository");
        self.submit = LoadState::Failed(err.to_string());
    }
}
