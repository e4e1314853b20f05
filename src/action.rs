use crate::browser::RequestToken;
use crate::error::Result;
use crate::route::Route;
use crate::types::{Issue, RepositoryDetail};

#[derive(Debug)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    Select,
    Navigate(Route),

    // Tracked list
    StartEditing,
    StopEditing,
    InputChar(char),
    InputBackspace,
    Submit,
    RepoLookedUp(Result<RepositoryDetail>),
    RemoveSelected,

    // Issue browser
    InitialLoaded {
        token: RequestToken,
        result: Result<(RepositoryDetail, Vec<Issue>)>,
    },
    IssuesLoaded {
        token: RequestToken,
        result: Result<Vec<Issue>>,
    },
    NextPage,
    PrevPage,
    SelectFilter(usize),
    CycleFilter,
    Refresh,

    OpenInBrowser,
    YankUrl,

    None,
}

impl Action {
    /// False for results delivered by background tasks, and for `None`.
    pub fn is_user_driven(&self) -> bool {
        !matches!(
            self,
            Action::RepoLookedUp(_)
                | Action::InitialLoaded { .. }
                | Action::IssuesLoaded { .. }
                | Action::None
        )
    }
}
