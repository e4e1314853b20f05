mod action;
mod app;
mod browser;
mod config;
mod error;
mod event;
mod github;
mod host;
mod route;
mod store;
mod tracked;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::github::GitHub;
use crate::route::Route;
use crate::store::TrackedStore;
use crate::tracked::TrackedList;
use crate::tui::EventHandler;

/// Track GitHub repositories and browse their issues.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (default: ~/.config/repotrack/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL, overriding the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Tracked repository file, overriding the config file
    #[arg(long)]
    store: Option<PathBuf>,

    /// Start on a route, e.g. /repository/rust-lang%2Frust
    #[arg(long, default_value = "/")]
    open: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut config = Config::load(cli.config.as_deref());
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = cli.store {
        config.storage.path = Some(path);
    }
    tracing::debug!(?config, "configuration loaded");

    let start_route = Route::parse(&cli.open)?;
    if let Some(identifier) = start_route.identifier()? {
        tracing::info!(%identifier, "opening repository");
    }
    let github = GitHub::new(config.api.base_url.clone())?;
    let tracked = TrackedList::new(TrackedStore::load(config.store_path()));

    let result = run(Arc::new(github), tracked, start_route).await;

    tui::restore()?;

    result
}

async fn run(
    github: Arc<GitHub>,
    tracked: TrackedList,
    start_route: Route,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(github, tracked, start_route, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
