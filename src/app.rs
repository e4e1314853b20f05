use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::browser::{self, IssueBrowser, IssueRequest};
use crate::event::Event;
use crate::host::RepoHost;
use crate::route::Route;
use crate::tracked::TrackedList;
use crate::types::LoadState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TrackedList,  // Saved repositories + add form
    IssueBrowser, // Metadata and paginated issues of one repository
}

pub struct App {
    pub screen: Screen,
    pub route: Route,
    pub tracked: TrackedList,
    pub browser: Option<IssueBrowser>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub should_quit: bool,
    start_route: Route,
    host: Arc<dyn RepoHost>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        host: Arc<dyn RepoHost>,
        tracked: TrackedList,
        start_route: Route,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            screen: Screen::TrackedList,
            route: Route::TrackedList,
            tracked,
            browser: None,
            error: None,
            notice: None,
            should_quit: false,
            start_route,
            host,
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Navigate(self.start_route.clone()),
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match self.screen {
            Screen::TrackedList if self.tracked.editing => match key.code {
                KeyCode::Esc => Action::StopEditing,
                KeyCode::Enter => Action::Submit,
                KeyCode::Backspace => Action::InputBackspace,
                KeyCode::Char(c) => Action::InputChar(c),
                _ => Action::None,
            },
            Screen::TrackedList => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
                KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
                KeyCode::Enter => Action::Select,
                KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Char('/') => {
                    Action::StartEditing
                }
                KeyCode::Char('d') | KeyCode::Delete => Action::RemoveSelected,
                KeyCode::Char('o') => Action::OpenInBrowser,
                KeyCode::Char('y') => Action::YankUrl,
                _ => Action::None,
            },
            Screen::IssueBrowser => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Back,
                KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
                KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
                KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => Action::NextPage,
                KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => Action::PrevPage,
                KeyCode::Char(c @ '1'..='3') => {
                    Action::SelectFilter(c as usize - '1' as usize)
                }
                KeyCode::Tab => Action::CycleFilter,
                KeyCode::Char('r') => Action::Refresh,
                KeyCode::Enter | KeyCode::Char('o') => Action::OpenInBrowser,
                KeyCode::Char('y') => Action::YankUrl,
                _ => Action::None,
            },
        }
    }

    pub fn update(&mut self, action: Action) {
        if action.is_user_driven() {
            if !matches!(action, Action::Quit | Action::Back) {
                self.error = None;
            }
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::TrackedList => {
                    tracing::debug!(from = %self.route.path(), "back on root screen quits");
                    self.should_quit = true;
                }
                Screen::IssueBrowser => self.navigate(Route::TrackedList),
            },
            Action::ScrollUp => match self.screen {
                Screen::TrackedList => self.tracked.select_prev(),
                Screen::IssueBrowser => {
                    if let Some(browser) = &mut self.browser {
                        browser.select_prev();
                    }
                }
            },
            Action::ScrollDown => match self.screen {
                Screen::TrackedList => self.tracked.select_next(),
                Screen::IssueBrowser => {
                    if let Some(browser) = &mut self.browser {
                        browser.select_next();
                    }
                }
            },
            Action::Select => {
                if self.screen == Screen::TrackedList {
                    if let Some(repo) = self.tracked.selected_repo() {
                        let route = Route::repository(&repo.name);
                        self.navigate(route);
                    }
                }
            }
            Action::Navigate(route) => self.navigate(route),

            // Tracked list
            Action::StartEditing => {
                self.tracked.editing = true;
            }
            Action::StopEditing => {
                self.tracked.editing = false;
            }
            Action::InputChar(c) => self.tracked.input_char(c),
            Action::InputBackspace => self.tracked.input_backspace(),
            Action::Submit => {
                if let Some(query) = self.tracked.submit() {
                    self.spawn_lookup(query);
                }
            }
            Action::RepoLookedUp(result) => {
                self.tracked.finish_submit(result);
                if self.tracked.submit == LoadState::Success {
                    self.tracked.editing = false;
                }
            }
            Action::RemoveSelected => self.tracked.remove_selected(),

            // Issue browser
            Action::InitialLoaded { token, result } => {
                if let Some(browser) = &mut self.browser {
                    browser.finish_initial_load(token, result);
                }
            }
            Action::IssuesLoaded { token, result } => {
                if let Some(browser) = &mut self.browser {
                    browser.finish_issues(token, result);
                }
            }
            Action::NextPage => {
                if let Some(browser) = self.ready_browser() {
                    let request = browser.next_page();
                    self.spawn_load_issues(request);
                }
            }
            Action::PrevPage => {
                if let Some(request) = self.ready_browser().and_then(|b| b.prev_page()) {
                    self.spawn_load_issues(request);
                }
            }
            Action::SelectFilter(index) => {
                if let Some(request) = self.ready_browser().and_then(|b| b.select_filter(index)) {
                    self.spawn_load_issues(request);
                }
            }
            Action::CycleFilter => {
                if let Some(request) = self.ready_browser().and_then(|b| b.cycle_filter()) {
                    self.spawn_load_issues(request);
                }
            }
            Action::Refresh => {
                let Some(browser) = &mut self.browser else {
                    return;
                };
                if browser.needs_initial_load() {
                    let request = browser.begin_initial_load();
                    self.spawn_initial_load(request);
                } else {
                    let request = browser.reload();
                    self.spawn_load_issues(request);
                }
            }

            Action::OpenInBrowser => {
                if let Some(url) = self.current_url() {
                    if let Err(e) = open::that(&url) {
                        tracing::warn!(error = %e, url = %url, "failed to open browser");
                        self.error = Some(format!("Failed to open {}: {}", url, e));
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.current_url() {
                    match arboard::Clipboard::new().and_then(|mut c| c.set_text(url.clone())) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.error = Some(format!("Clipboard error: {}", e)),
                    }
                }
            }

            Action::None => {}
        }
    }

    fn navigate(&mut self, route: Route) {
        tracing::debug!(path = %route.path(), "navigate");
        match &route {
            Route::TrackedList => {
                self.browser = None;
                self.screen = Screen::TrackedList;
            }
            Route::Repository(segment) => {
                let mut browser = match IssueBrowser::open(segment) {
                    Ok(browser) => browser,
                    Err(e) => {
                        self.error = Some(e.to_string());
                        return;
                    }
                };
                let request = browser.begin_initial_load();
                self.browser = Some(browser);
                self.screen = Screen::IssueBrowser;
                self.spawn_initial_load(request);
            }
        }
        self.route = route;
    }

    /// The browser, once its initial load has succeeded.
    fn ready_browser(&mut self) -> Option<&mut IssueBrowser> {
        self.browser
            .as_mut()
            .filter(|b| b.load == LoadState::Success)
    }

    fn current_url(&self) -> Option<String> {
        match self.screen {
            Screen::TrackedList => self
                .tracked
                .selected_repo()
                .map(|r| self.host.web_url(&r.name)),
            Screen::IssueBrowser => {
                let browser = self.browser.as_ref()?;
                if let Some(issue) = browser.selected_issue() {
                    return Some(issue.html_url.clone());
                }
                let url = browser.detail.as_ref().and_then(|d| d.html_url.clone());
                Some(url.unwrap_or_else(|| self.host.web_url(&browser.identifier)))
            }
        }
    }

    fn spawn_lookup(&self, query: String) {
        let tx = self.action_tx.clone();
        let host = Arc::clone(&self.host);
        tokio::spawn(async move {
            let result = host.get_repository(&query).await;
            tx.send(Action::RepoLookedUp(result)).ok();
        });
    }

    fn spawn_initial_load(&self, request: IssueRequest) {
        let tx = self.action_tx.clone();
        let host = Arc::clone(&self.host);
        tokio::spawn(async move {
            let result = browser::fetch_initial(host.as_ref(), &request).await;
            tx.send(Action::InitialLoaded {
                token: request.token,
                result,
            })
            .ok();
        });
    }

    fn spawn_load_issues(&self, request: IssueRequest) {
        let tx = self.action_tx.clone();
        let host = Arc::clone(&self.host);
        tokio::spawn(async move {
            let result = browser::fetch_issues(host.as_ref(), &request).await;
            tx.send(Action::IssuesLoaded {
                token: request.token,
                result,
            })
            .ok();
        });
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::host::fake::{issue, FakeHost};
    use crate::store::TrackedStore;
    use crate::types::{IssueFilter, TrackedRepository};

    fn app(host: FakeHost, names: &[&str]) -> (App, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = TrackedStore::in_memory(names.iter().map(|n| TrackedRepository::new(*n)).collect());
        let app = App::new(Arc::new(host), TrackedList::new(store), Route::TrackedList, tx);
        (app, rx)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        let action = rx.recv().await.unwrap();
        app.update(action);
    }

    #[test]
    fn typing_goes_to_input_only_while_editing() {
        let (mut app, _rx) = app(FakeHost::new(), &[]);
        assert!(matches!(app.handle_event(key(KeyCode::Char('q'))), Action::Quit));

        app.update(Action::StartEditing);
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('q'))),
            Action::InputChar('q')
        ));
        assert!(matches!(app.handle_event(key(KeyCode::Esc)), Action::StopEditing));
    }

    #[test]
    fn digit_keys_select_filters_in_browser() {
        let (mut app, _rx) = app(FakeHost::new(), &[]);
        app.screen = Screen::IssueBrowser;
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('3'))),
            Action::SelectFilter(2)
        ));
        assert!(matches!(app.handle_event(key(KeyCode::Char('q'))), Action::Back));
    }

    #[tokio::test]
    async fn submit_then_lookup_adds_repository() {
        let host = FakeHost::new().with_repo("facebook/react", "facebook/react");
        let (mut app, mut rx) = app(host, &[]);
        app.update(Action::StartEditing);
        for c in "facebook/react".chars() {
            app.update(Action::InputChar(c));
        }

        app.update(Action::Submit);
        assert!(app.tracked.submit.is_loading());
        pump(&mut app, &mut rx).await;

        assert_eq!(app.tracked.repos(), [TrackedRepository::new("facebook/react")]);
        assert!(!app.tracked.editing);
    }

    #[tokio::test]
    async fn selecting_repository_opens_browser_with_encoded_route() {
        let host = FakeHost::new()
            .with_repo("facebook/react", "facebook/react")
            .with_issues(vec![issue(1, "bug")]);
        let (mut app, mut rx) = app(host, &["facebook/react"]);

        app.update(Action::Select);
        assert_eq!(app.screen, Screen::IssueBrowser);
        assert_eq!(app.route.path(), "/repository/facebook%2Freact");
        assert!(app.browser.as_ref().unwrap().load.is_loading());

        // paging is ignored until the initial load lands
        app.update(Action::NextPage);
        assert_eq!(app.browser.as_ref().unwrap().page.get(), 1);

        pump(&mut app, &mut rx).await;
        let browser = app.browser.as_ref().unwrap();
        assert_eq!(browser.load, LoadState::Success);
        assert_eq!(browser.issues.len(), 1);
    }

    #[tokio::test]
    async fn filter_switch_reloads_issues() {
        let host = FakeHost::new()
            .with_repo("facebook/react", "facebook/react")
            .with_issues(vec![issue(1, "bug")]);
        let (mut app, mut rx) = app(host, &[]);
        app.update(Action::Navigate(Route::repository("facebook/react")));
        pump(&mut app, &mut rx).await;

        app.update(Action::SelectFilter(2));
        let browser = app.browser.as_ref().unwrap();
        assert_eq!(browser.filter(), IssueFilter::Closed);
        assert!(browser.issues_state.is_loading());

        pump(&mut app, &mut rx).await;
        assert_eq!(app.browser.as_ref().unwrap().issues_state, LoadState::Success);
    }

    #[tokio::test]
    async fn back_returns_to_list() {
        let host = FakeHost::new().with_repo("a/b", "a/b");
        let (mut app, _rx) = app(host, &["a/b"]);
        app.update(Action::Navigate(Route::repository("a/b")));
        app.update(Action::Back);
        assert_eq!(app.screen, Screen::TrackedList);
        assert!(app.browser.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn invalid_route_segment_reports_error() {
        let (mut app, _rx) = app(FakeHost::new(), &[]);
        app.update(Action::Navigate(Route::Repository("%FF".to_string())));
        assert_eq!(app.screen, Screen::TrackedList);
        assert!(app.error.is_some());
    }

    #[tokio::test]
    async fn paging_and_filters_wait_for_successful_load() {
        let (mut app, mut rx) = app(FakeHost::new(), &[]);
        app.update(Action::Navigate(Route::repository("ghost/repo")));
        pump(&mut app, &mut rx).await;
        assert!(app.browser.as_ref().unwrap().load.is_failed());

        app.update(Action::NextPage);
        app.update(Action::SelectFilter(2));
        app.update(Action::CycleFilter);

        let browser = app.browser.as_ref().unwrap();
        assert_eq!(browser.filter(), IssueFilter::All);
        assert_eq!(browser.page.get(), 1);
        assert!(!browser.issues_state.is_loading());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn background_results_keep_status_messages() {
        let host = FakeHost::new()
            .with_repo("facebook/react", "facebook/react")
            .with_issues(vec![issue(1, "bug")]);
        let (mut app, mut rx) = app(host, &[]);
        app.update(Action::Navigate(Route::repository("facebook/react")));
        pump(&mut app, &mut rx).await;

        app.update(Action::Refresh);
        app.notice = Some("Copied https://github.com/facebook/react".to_string());
        app.error = Some("Failed to open".to_string());
        pump(&mut app, &mut rx).await;
        assert!(app.notice.is_some());
        assert!(app.error.is_some());

        app.update(Action::ScrollDown);
        assert!(app.notice.is_none());
        assert!(app.error.is_none());
    }

    #[tokio::test]
    async fn repository_link_prefers_remote_html_url() {
        let host = FakeHost::new().with_repo("facebook/react", "facebook/react");
        let (mut app, mut rx) = app(host, &[]);
        app.update(Action::Navigate(Route::repository("facebook/react")));
        pump(&mut app, &mut rx).await;

        let browser = app.browser.as_mut().unwrap();
        assert!(browser.issues.is_empty());
        if let Some(detail) = browser.detail.as_mut() {
            detail.html_url = Some("https://ghe.company.com/facebook/react".to_string());
        }
        assert_eq!(
            app.current_url().as_deref(),
            Some("https://ghe.company.com/facebook/react")
        );
    }
}
