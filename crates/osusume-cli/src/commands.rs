use osusume_api::{AnimeRecord, CatalogError};
use osusume_core::{AppConfig, ErrorBanner};

use crate::args::{Cli, Command};
use crate::error::CliError;
use crate::render;
use crate::session;

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let catalog = config.catalog.build_catalog()?;

    match cli.command {
        Command::Search {
            term,
            limit,
            fallback,
        } => {
            let term = term.join(" ");
            let catalog = match limit {
                Some(limit) => catalog.with_page_size(limit),
                None => catalog,
            };
            let result = if fallback {
                catalog.search_with_fallback(&term).await
            } else {
                catalog.search_by_text(&term).await
            };
            show(result, cli.json, || ErrorBanner::no_results_for(term.trim()))
        }
        Command::Random => {
            let result = catalog.search_by_random_genre().await.map(|(roll, records)| {
                if !cli.json {
                    println!("Random: {roll}");
                }
                records
            });
            show(result, cli.json, ErrorBanner::no_random_results)
        }
        Command::Trending { limit } => {
            let limit = limit.unwrap_or(catalog.trending_limit());
            let result = catalog
                .with_trending_limit(limit)
                .search_with_fallback("")
                .await;
            show(result, cli.json, || ErrorBanner::no_results_for(""))
        }
        Command::Session { weekly } => session::run(&config, catalog, weekly, cli.json).await,
    }
}

/// Print records, or turn an empty or failed lookup into a banner.
fn show(
    result: Result<Vec<AnimeRecord>, CatalogError>,
    json: bool,
    empty: impl FnOnce() -> ErrorBanner,
) -> Result<(), CliError> {
    match result {
        Ok(records) if !records.is_empty() => render::print_records(&records, json),
        Ok(_) | Err(CatalogError::DataUnavailable) => {
            if json {
                render::print_records(&[], true)
            } else {
                render::print_banner(&empty());
                Ok(())
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Lookup failed");
            Err(CliError::Search(ErrorBanner::classify(&e.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use osusume_core::BannerKind;

    use super::*;

    #[test]
    fn test_show_empty_is_not_an_error() {
        assert!(show(Ok(Vec::new()), true, ErrorBanner::no_random_results).is_ok());
        assert!(show(
            Err(CatalogError::DataUnavailable),
            true,
            ErrorBanner::no_random_results
        )
        .is_ok());
    }

    #[test]
    fn test_show_failure_becomes_banner() {
        let err = show(
            Err(CatalogError::Http {
                status: 429,
                message: "Too Many Requests.".into(),
            }),
            false,
            ErrorBanner::no_random_results,
        )
        .unwrap_err();
        match err {
            CliError::Search(banner) => assert_eq!(banner.kind, BannerKind::RateLimited),
            other => panic!("Expected Search, got {other:?}"),
        }
    }
}
