//! Interactive session: the shared [`Session`] state driven from stdin.
//!
//! Everything runs on one thread. Fetches are polled from a
//! `FuturesUnordered`, the progress ticker feeds a channel, and the hide
//! delay is a pinned `Sleep`; a `select!` loop multiplexes them with stdin.

use std::io::Write;
use std::pin::Pin;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Sleep;

use osusume_api::{Catalog, CatalogService, FallbackSource};
use osusume_core::config::ProgressConfig;
use osusume_core::flow::{self, InputMode};
use osusume_core::search::{self, Message as SearchMsg};
use osusume_core::selection::Cardinality;
use osusume_core::session::Message;
use osusume_core::{AppConfig, Effect, Session};

use crate::error::CliError;
use crate::render;
use crate::ticker::ProgressTicker;

const HELP: &str = "\
Type to search. Commands:
  :random        popular titles from a random genre
  :pick N        select result N
  :drop ID       remove a selected anime
  :mode single   one recommendation
  :mode weekly   up to the weekly cap
  :clear         clear the query
  :show          redraw
  :quit          exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Query(String),
    Random,
    /// Zero-based result index.
    Pick(usize),
    Drop(u64),
    Mode(Cardinality),
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.trim_start().strip_prefix(':') else {
            return Self::Query(line.to_string());
        };
        let unknown = || Self::Unknown(line.trim().to_string());
        let mut words = rest.split_whitespace();
        match (words.next().unwrap_or_default(), words.next()) {
            ("q" | "quit", _) => Self::Quit,
            ("r" | "random", _) => Self::Random,
            ("p" | "pick", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Self::Pick(n - 1),
                _ => unknown(),
            },
            ("drop", Some(id)) => id.parse().map(Self::Drop).unwrap_or_else(|_| unknown()),
            ("mode", Some("single")) => Self::Mode(Cardinality::Single),
            ("mode", Some("weekly")) => Self::Mode(Cardinality::Weekly),
            ("clear", _) => Self::Query(String::new()),
            ("show", _) => Self::Show,
            ("h" | "help", _) => Self::Help,
            _ => unknown(),
        }
    }

    fn into_message(self) -> Option<Message> {
        match self {
            Self::Query(text) => Some(SearchMsg::QueryChanged(text).into()),
            Self::Random => Some(SearchMsg::RandomRequested.into()),
            Self::Pick(index) => Some(SearchMsg::Select(index).into()),
            Self::Drop(id) => Some(Message::Remove(id)),
            Self::Mode(cardinality) => Some(flow::Message::ChooseCardinality(cardinality).into()),
            Self::Show | Self::Help | Self::Quit | Self::Unknown(_) => None,
        }
    }
}

/// Runs [`Effect`]s for a [`Session`].
struct Driver<P, F> {
    session: Session,
    catalog: Rc<Catalog<P, F>>,
    progress: ProgressConfig,
    fetches: FuturesUnordered<LocalBoxFuture<'static, SearchMsg>>,
    ticker: Option<ProgressTicker>,
    tick_tx: mpsc::UnboundedSender<()>,
    tick_rx: mpsc::UnboundedReceiver<()>,
    hold: Option<Pin<Box<Sleep>>>,
    json: bool,
}

impl<P, F> Driver<P, F>
where
    P: CatalogService + 'static,
    F: FallbackSource + 'static,
{
    fn new(config: &AppConfig, catalog: Catalog<P, F>, json: bool) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(config),
            catalog: Rc::new(catalog),
            progress: config.progress,
            fetches: FuturesUnordered::new(),
            ticker: None,
            tick_tx,
            tick_rx,
            hold: None,
            json,
        }
    }

    fn apply(&mut self, msg: Message) {
        for effect in self.session.update(msg) {
            match effect {
                Effect::Fetch { token, request } => {
                    let catalog = Rc::clone(&self.catalog);
                    self.fetches.push(
                        async move { search::fetch(&catalog, token, request).await }.boxed_local(),
                    );
                }
                Effect::StartProgress => {
                    self.hold = None;
                    self.ticker = Some(ProgressTicker::start(
                        self.progress.tick_interval(),
                        self.tick_tx.clone(),
                    ));
                }
                Effect::StopProgress => {
                    self.ticker = None;
                    self.hold = Some(Box::pin(tokio::time::sleep(self.progress.hold())));
                }
            }
        }
    }

    fn render(&self) -> Result<(), CliError> {
        let mut out = std::io::stdout().lock();
        if self.json {
            serde_json::to_writer(&mut out, &self.session.snapshot())?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", "\u{2500}".repeat(40))?;
            for line in render::session_view(&self.session) {
                writeln!(out, "{line}")?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn render_progress(&self) {
        if self.json {
            return;
        }
        let progress = self.session.search().progress();
        if progress.is_visible() {
            eprint!("\r{}", render::progress_bar(progress.value()));
        } else {
            eprint!("\r{:width$}\r", "", width = 28);
        }
    }
}

async fn wait_hold(hold: &mut Option<Pin<Box<Sleep>>>) {
    match hold {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

pub async fn run<P, F>(
    config: &AppConfig,
    catalog: Catalog<P, F>,
    weekly: bool,
    json: bool,
) -> Result<(), CliError>
where
    P: CatalogService + 'static,
    F: FallbackSource + 'static,
{
    let mut driver = Driver::new(config, catalog, json);
    let cardinality = if weekly {
        Cardinality::Weekly
    } else {
        Cardinality::Single
    };
    driver.apply(flow::Message::ChooseInput(InputMode::Api).into());
    driver.apply(flow::Message::ChooseCardinality(cardinality).into());
    tracing::info!(%cardinality, "Session started");

    if !json {
        println!("{HELP}");
    }
    driver.render()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Input::parse(&line) {
                    Input::Quit => break,
                    Input::Help => println!("{HELP}"),
                    Input::Show => driver.render()?,
                    Input::Unknown(cmd) => eprintln!("Unknown command: {cmd} (try :help)"),
                    input => {
                        if let Some(msg) = input.into_message() {
                            driver.apply(msg);
                            driver.render()?;
                        }
                    }
                }
            }
            Some(msg) = driver.fetches.next(), if !driver.fetches.is_empty() => {
                driver.apply(msg.into());
                driver.render_progress();
                driver.render()?;
            }
            Some(()) = driver.tick_rx.recv() => {
                driver.apply(SearchMsg::ProgressTick.into());
                driver.render_progress();
            }
            _ = wait_hold(&mut driver.hold) => {
                driver.hold = None;
                driver.apply(SearchMsg::ProgressHidden.into());
                driver.render_progress();
            }
        }
    }

    tracing::info!(selected = driver.session.selection().count(), "Session ended");
    Ok(())
}
