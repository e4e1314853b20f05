use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Issue, IssueQuery, RepositoryDetail};

/// Remote repository hosting API.
///
/// `identifier` is always the decoded "owner/repo" form.
#[async_trait]
pub trait RepoHost: Send + Sync + std::fmt::Debug {
    fn web_url(&self, identifier: &str) -> String;

    async fn get_repository(&self, identifier: &str) -> Result<RepositoryDetail>;
    async fn list_issues(&self, identifier: &str, query: &IssueQuery) -> Result<Vec<Issue>>;
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::error::TrackError;
    use crate::types::Owner;

    /// In-memory host that records every issue query it receives.
    #[derive(Debug, Default)]
    pub struct FakeHost {
        repos: HashMap<String, RepositoryDetail>,
        issues: Vec<Issue>,
        fail_issues: bool,
        pub lookups: Mutex<Vec<String>>,
        pub queries: Mutex<Vec<IssueQuery>>,
    }

    impl FakeHost {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a repository reachable under `lookup` with canonical `full_name`.
        pub fn with_repo(mut self, lookup: &str, full_name: &str) -> Self {
            let (owner, name) = full_name.split_once('/').unwrap_or(("", full_name));
            self.repos.insert(
                lookup.to_string(),
                RepositoryDetail {
                    full_name: full_name.to_string(),
                    name: name.to_string(),
                    description: Some(format!("{} description", name)),
                    owner: Owner {
                        login: owner.to_string(),
                        avatar_url: format!("https://avatars.example/{}", owner),
                    },
                    html_url: Some(format!("https://github.com/{}", full_name)),
                },
            );
            self
        }

        pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
            self.issues = issues;
            self
        }

        pub fn failing_issues(mut self) -> Self {
            self.fail_issues = true;
            self
        }
    }

    pub fn issue(id: u64, title: &str) -> Issue {
        Issue {
            id,
            number: id,
            title: title.to_string(),
            html_url: format!("https://github.com/o/r/issues/{}", id),
            user: Owner {
                login: "octocat".to_string(),
                avatar_url: "https://avatars.example/octocat".to_string(),
            },
            labels: vec![],
        }
    }

    #[async_trait]
    impl RepoHost for FakeHost {
        fn web_url(&self, identifier: &str) -> String {
            format!("https://github.com/{}", identifier)
        }

        async fn get_repository(&self, identifier: &str) -> Result<RepositoryDetail> {
            self.lookups.lock().unwrap().push(identifier.to_string());
            self.repos
                .get(identifier)
                .cloned()
                .ok_or_else(|| TrackError::NotFound(identifier.to_string()))
        }

        async fn list_issues(&self, _identifier: &str, query: &IssueQuery) -> Result<Vec<Issue>> {
            self.queries.lock().unwrap().push(*query);
            if self.fail_issues {
                return Err(TrackError::Api("boom".to_string()));
            }
            Ok(self.issues.clone())
        }
    }
}
