//! Plain-text rendering for the terminal.

use std::io::Write;

use osusume_api::AnimeRecord;
use osusume_core::flow::{Screen, MANUAL_PLACEHOLDER};
use osusume_core::selection::{AnimeDetail, DetailView, WEEKLY_PLACEHOLDER};
use osusume_core::{ErrorBanner, Session};

use crate::error::CliError;

const BAR_WIDTH: usize = 20;

/// `" 1. Frieren  ·  28 eps  ·  ★ 9.1  ·  TV"`
pub fn record_line(index: usize, record: &AnimeRecord) -> String {
    let mut parts = vec![record.display_title()];
    if let Some(eps) = record.episodes {
        parts.push(format!("{eps} eps"));
    }
    if let Some(score) = record.score_out_of_ten() {
        parts.push(format!("\u{2605} {score:.1}"));
    }
    if let Some(format) = &record.format {
        parts.push(format.clone());
    }
    format!("{:>2}. {}", index + 1, parts.join("  \u{00B7}  "))
}

pub fn detail_lines(detail: &AnimeDetail) -> Vec<String> {
    let mut lines = vec![detail.title.clone()];
    if let Some(season) = &detail.season {
        lines.push(season.clone());
    }
    lines.push(format!("Rating: {}", detail.rating));
    lines.push(format!("Episodes: {}", detail.episodes));
    lines.push(format!("Status: {}", detail.status));
    if !detail.genres.is_empty() {
        lines.push(format!("Genres: {}", detail.genres.join(", ")));
    }
    if !detail.studios.is_empty() {
        lines.push(format!("Studios: {}", detail.studios.join(", ")));
    }
    if let Some(cover) = &detail.cover_image {
        lines.push(format!("Cover: {cover}"));
    }
    if !detail.description.is_empty() {
        lines.push(String::new());
        lines.push(detail.description.clone());
    }
    lines
}

pub fn banner_line(banner: &ErrorBanner) -> String {
    let marker = if banner.is_error() { "!" } else { "i" };
    format!("[{marker}] {banner}")
}

/// `[##########----------]  50%`
pub fn progress_bar(value: u8) -> String {
    let filled = BAR_WIDTH * value.min(100) as usize / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        value
    )
}

pub fn print_records(records: &[AnimeRecord], json: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, records)?;
        writeln!(out)?;
        return Ok(());
    }
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "{}", record_line(i, record))?;
    }
    Ok(())
}

pub fn print_banner(banner: &ErrorBanner) {
    eprintln!("{}", banner_line(banner));
}

/// Everything the session shows after an update.
pub fn session_view(session: &Session) -> Vec<String> {
    let search = session.search();
    let selection = session.selection();
    let mut lines = Vec::new();

    match session.screen() {
        Screen::ChooseInput | Screen::ChooseCardinality(_) => {
            lines.push("Choose how to pick recommendations.".to_string());
            return lines;
        }
        Screen::ManualPlaceholder(_) => {
            lines.push(MANUAL_PLACEHOLDER.to_string());
            return lines;
        }
        Screen::ApiSearch(cardinality) => {
            lines.push(format!(
                "{cardinality} \u{00B7} Selected: {}/{}",
                selection.count(),
                selection.capacity()
            ));
        }
    }

    if let Some(roll) = search.discovery() {
        lines.push(format!("Random: {roll}"));
    }
    if let Some(banner) = search.error() {
        lines.push(banner_line(banner));
    }
    if let Some(banner) = search.selection_notice() {
        lines.push(banner_line(banner));
    }
    if search.is_loading() && !search.is_busy() {
        lines.push("Searching...".to_string());
    }
    for (i, record) in search.results().iter().enumerate() {
        lines.push(record_line(i, record));
    }

    match session.detail() {
        DetailView::Empty => {}
        DetailView::Single(detail) => {
            lines.push(String::new());
            lines.extend(detail_lines(&detail));
        }
        DetailView::WeeklyPlaceholder { .. } => {
            lines.push(String::new());
            for record in selection.selected() {
                lines.push(format!("  * {} (id {})", record.display_title(), record.id));
            }
            lines.push(WEEKLY_PLACEHOLDER.to_string());
        }
    }
    lines
}
