use std::rc::Rc;
use std::time::Duration;

use leptos::leptos_dom::helpers::{set_interval_with_handle, set_timeout, IntervalHandle};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use osusume_api::{AnimeRecord, Catalog};
use osusume_core::flow::{self, InputMode, Screen, MANUAL_PLACEHOLDER};
use osusume_core::search::{self, Message as SearchMsg};
use osusume_core::selection::{Cardinality, DetailView, WEEKLY_PLACEHOLDER};
use osusume_core::session::Message;
use osusume_core::{AppConfig, Effect, ErrorBanner, Session};

/// Clears its interval when dropped.
struct ProgressTicker(IntervalHandle);

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.0.clear();
    }
}

/// Handles shared by every component.
#[derive(Clone, Copy)]
struct Ctx {
    session: RwSignal<Session>,
    catalog: StoredValue<Rc<Catalog>, LocalStorage>,
    ticker: StoredValue<Option<ProgressTicker>>,
    tick: Duration,
    hold: Duration,
}

/// Feed one message through the session and run what it asks for.
fn dispatch(ctx: Ctx, msg: Message) {
    let Some(effects) = ctx.session.try_update(|s| s.update(msg)) else {
        return;
    };
    for effect in effects {
        match effect {
            Effect::Fetch { token, request } => {
                let Some(catalog) = ctx.catalog.try_get_value() else {
                    return;
                };
                spawn_local(async move {
                    let msg = search::fetch(&catalog, token, request).await;
                    dispatch(ctx, msg.into());
                });
            }
            Effect::StartProgress => {
                let ticker = set_interval_with_handle(
                    move || dispatch(ctx, SearchMsg::ProgressTick.into()),
                    ctx.tick,
                )
                .ok()
                .map(ProgressTicker);
                ctx.ticker.set_value(ticker);
            }
            Effect::StopProgress => {
                ctx.ticker.set_value(None);
                set_timeout(move || dispatch(ctx, SearchMsg::ProgressHidden.into()), ctx.hold);
            }
        }
    }
}

#[component]
fn App() -> impl IntoView {
    let config = AppConfig::default();
    let catalog = config.catalog.build_catalog().unwrap_or_else(|e| {
        leptos::logging::error!("Falling back to default catalog: {e}");
        Catalog::new()
    });
    let ctx = Ctx {
        session: RwSignal::new(Session::new(&config)),
        catalog: StoredValue::new_local(Rc::new(catalog)),
        ticker: StoredValue::new(None),
        tick: config.progress.tick_interval(),
        hold: config.progress.hold(),
    };
    on_cleanup(move || {
        let _ = ctx.ticker.try_update_value(|t| t.take());
    });

    let screen = Memo::new(move |_| ctx.session.with(|s| s.screen()));

    view! {
        <main class="app">
            <header>
                <h1>"Osusume"</h1>
                <p>"Find an anime worth recommending."</p>
            </header>

            <FlowPicker ctx=ctx />

            {move || match screen.get() {
                Screen::ChooseInput => view! {
                    <p class="hint">"Choose how you want to pick."</p>
                }.into_any(),
                Screen::ChooseCardinality(_) => view! {
                    <p class="hint">"Choose a recommendation type."</p>
                }.into_any(),
                Screen::ManualPlaceholder(_) => view! {
                    <p class="placeholder">{MANUAL_PLACEHOLDER}</p>
                }.into_any(),
                Screen::ApiSearch(_) => view! {
                    <SearchPanel ctx=ctx />
                    <DetailPanel ctx=ctx />
                }.into_any(),
            }}
        </main>
    }
}

#[component]
fn FlowPicker(ctx: Ctx) -> impl IntoView {
    let state = Memo::new(move |_| ctx.session.with(|s| *s.flow()));

    view! {
        <nav class="flow">
            {InputMode::ALL
                .into_iter()
                .map(|mode| view! {
                    <button
                        class:active=move || state.get().input() == Some(mode)
                        on:click=move |_| dispatch(ctx, flow::Message::ChooseInput(mode).into())
                    >
                        {mode.label()}
                    </button>
                })
                .collect_view()}
        </nav>
        <Show when=move || state.get().input().is_some()>
            <nav class="flow">
                {Cardinality::ALL
                    .into_iter()
                    .map(|c| view! {
                        <button
                            class:active=move || state.get().cardinality() == Some(c)
                            on:click=move |_| dispatch(ctx, flow::Message::ChooseCardinality(c).into())
                        >
                            {c.label()}
                        </button>
                    })
                    .collect_view()}
            </nav>
        </Show>
    }
}

#[component]
fn SearchPanel(ctx: Ctx) -> impl IntoView {
    let session = ctx.session;
    let busy = move || session.with(|s| s.search().is_busy());
    let results = Memo::new(move |_| session.with(|s| s.search().results().to_vec()));
    let error = Memo::new(move |_| session.with(|s| s.search().error().cloned()));
    let notice = Memo::new(move |_| session.with(|s| s.search().selection_notice().cloned()));
    let progress = Memo::new(move |_| {
        session.with(|s| {
            let p = s.search().progress();
            p.is_visible().then(|| p.value())
        })
    });

    view! {
        <section class="search">
            <div class="search-bar">
                <input
                    type="text"
                    placeholder="Search for an anime..."
                    prop:value=move || session.with(|s| s.search().query().to_string())
                    disabled=busy
                    on:input=move |ev| {
                        dispatch(ctx, SearchMsg::QueryChanged(event_target_value(&ev)).into())
                    }
                />
                <button
                    disabled=busy
                    on:click=move |_| dispatch(ctx, SearchMsg::RandomRequested.into())
                >
                    {move || if busy() { "Searching..." } else { "Random" }}
                </button>
            </div>

            {move || progress.get().map(|value| view! {
                <div class="progress">
                    <div class="progress-fill" style:width=format!("{value}%")></div>
                </div>
            })}

            <p class="hint">
                {move || session.with(|s| {
                    let selection = s.selection();
                    let mut line = format!("Selected: {}/{}", selection.count(), selection.capacity());
                    if let Some(roll) = s.search().discovery() {
                        line.push_str(&format!(" \u{00B7} Random: {roll}"));
                    }
                    line
                })}
            </p>

            {move || error.get().map(|banner| view! { <Banner ctx=ctx banner=banner /> })}
            {move || notice.get().map(|banner| view! { <Banner ctx=ctx banner=banner /> })}

            <ul class="results">
                <For
                    each=move || results.get().into_iter().enumerate()
                    key=|(i, record)| (*i, record.id)
                    children=move |(i, record)| view! { <ResultCard ctx=ctx index=i record=record /> }
                />
            </ul>
        </section>
    }
}

#[component]
fn Banner(ctx: Ctx, banner: ErrorBanner) -> impl IntoView {
    let class = if banner.is_error() { "banner error" } else { "banner" };
    view! {
        <div class=class role="alert">
            <strong>{banner.message}</strong>
            <p>{banner.details}</p>
            <button on:click=move |_| dispatch(ctx, SearchMsg::DismissError.into())>"Dismiss"</button>
        </div>
    }
}

#[component]
fn ResultCard(ctx: Ctx, index: usize, record: AnimeRecord) -> impl IntoView {
    let accent = record.cover_color.clone().unwrap_or_else(|| "transparent".into());
    let mut meta = Vec::new();
    if let Some(eps) = record.episodes {
        meta.push(format!("{eps} eps"));
    }
    if let Some(score) = record.score_out_of_ten() {
        meta.push(format!("\u{2605} {score:.1}"));
    }
    if let Some(season) = record.season_label() {
        meta.push(season);
    }
    let title = record.display_title();
    let alt = title.clone();

    view! {
        <li
            class="card"
            style:border-color=accent
            on:click=move |_| dispatch(ctx, SearchMsg::Select(index).into())
        >
            {record.cover_image.map(|src| view! { <img src=src alt=alt loading="lazy" /> })}
            <div class="card-body">
                <h3>{title}</h3>
                <p class="hint">{meta.join("  \u{00B7}  ")}</p>
            </div>
        </li>
    }
}

#[component]
fn DetailPanel(ctx: Ctx) -> impl IntoView {
    let detail = Memo::new(move |_| ctx.session.with(|s| s.detail()));
    let selected = Memo::new(move |_| ctx.session.with(|s| s.selection().selected().to_vec()));

    move || match detail.get() {
        DetailView::Empty => view! {
            <p class="hint">"Pick an anime to see its details."</p>
        }
        .into_any(),
        DetailView::Single(d) => view! {
            <section class="detail">
                {d.cover_image.map(|src| view! { <img src=src alt="" /> })}
                <div>
                    <h2>{d.title}</h2>
                    {d.season.map(|season| view! { <p class="hint">{season}</p> })}
                    <p>{format!("Rating: {}", d.rating)}</p>
                    <p>{format!("Episodes: {}", d.episodes)}</p>
                    <p>{format!("Status: {}", d.status)}</p>
                    <p>{d.genres.join(", ")}</p>
                    <p class="hint">{d.studios.join(", ")}</p>
                    <p class="description">{d.description}</p>
                </div>
            </section>
        }
        .into_any(),
        DetailView::WeeklyPlaceholder { .. } => view! {
            <section class="detail">
                <ul>
                    {selected
                        .get()
                        .into_iter()
                        .map(|record| {
                            let id = record.id;
                            view! {
                                <li>
                                    {record.display_title()}
                                    " "
                                    <button on:click=move |_| dispatch(ctx, Message::Remove(id))>
                                        "Remove"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <p class="placeholder">{WEEKLY_PLACEHOLDER}</p>
            </section>
        }
        .into_any(),
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    mount_to_body(App);
}
