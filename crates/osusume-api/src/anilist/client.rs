use reqwest::Client;

use super::query::{GENRE_QUERY, TEXT_SEARCH_QUERY, TRENDING_POPULAR_QUERY};
use super::types::{GraphQLResponse, PageResponse, TrendingPopularResponse};
use crate::discovery::DiscoveryRoll;
use crate::error::{body_excerpt, CatalogError};
use crate::normalize::merge_trending_popular;
use crate::record::AnimeRecord;
use crate::traits::CatalogService;

pub const API_URL: &str = "https://graphql.anilist.co";

/// AniList GraphQL API client. Unauthenticated; every query is public.
#[derive(Debug, Clone)]
pub struct AniListClient {
    endpoint: String,
    http: Client,
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AniListClient {
    pub fn new() -> Self {
        Self::with_endpoint(API_URL)
    }

    /// Client for a mirror or test server speaking the AniList schema.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, CatalogError> {
        tracing::debug!(operation, %variables, "AniList GraphQL request");

        let resp = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await
            .inspect_err(|e| tracing::warn!(operation, error = %e, "AniList request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AniList API error");
            return Err(CatalogError::Http {
                status: status_code,
                message: body_excerpt(&body),
            });
        }

        tracing::debug!(operation, status = %status, "AniList response received");
        let body: GraphQLResponse<T> = resp
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        body.into_data().inspect_err(|e| {
            tracing::warn!(operation, error = %e, "AniList reported errors");
        })
    }
}

impl CatalogService for AniListClient {
    async fn search_by_text(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<AnimeRecord>, CatalogError> {
        let data: PageResponse = self
            .graphql_request(
                "SearchByText",
                TEXT_SEARCH_QUERY,
                serde_json::json!({ "search": term, "perPage": limit }),
            )
            .await?;

        Ok(data.page.map(|p| p.into_records()).unwrap_or_default())
    }

    async fn search_by_genre(
        &self,
        roll: &DiscoveryRoll,
        limit: u32,
    ) -> Result<Vec<AnimeRecord>, CatalogError> {
        let data: PageResponse = self
            .graphql_request(
                "SearchByGenre",
                GENRE_QUERY,
                serde_json::json!({
                    "genre": roll.genre,
                    "page": roll.page,
                    "perPage": limit,
                }),
            )
            .await?;

        Ok(data.page.map(|p| p.into_records()).unwrap_or_default())
    }

    async fn trending_and_popular(&self, limit: u32) -> Result<Vec<AnimeRecord>, CatalogError> {
        let data: TrendingPopularResponse = self
            .graphql_request(
                "TrendingAndPopular",
                TRENDING_POPULAR_QUERY,
                serde_json::json!({ "perPage": limit }),
            )
            .await?;

        let trending = data.trending.map(|p| p.into_records()).unwrap_or_default();
        let popular = data.popular.map(|p| p.into_records()).unwrap_or_default();
        Ok(merge_trending_popular(trending, popular, limit as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let url = serve_once(429, r#"{"errors":[{"message":"Too Many Requests."}]}"#).await;
        let client = AniListClient::with_endpoint(url);

        let err = client.search_by_text("frieren", 9).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_errors_array_on_success_is_api_error() {
        let url = serve_once(
            200,
            r#"{"data":null,"errors":[{"message":"A"},{"message":"B"}]}"#,
        )
        .await;
        let client = AniListClient::with_endpoint(url);

        let err = client.search_by_text("frieren", 9).await.unwrap_err();
        assert!(matches!(&err, CatalogError::Api(m) if m == "A, B"));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let client = AniListClient::with_endpoint("http://127.0.0.1:1/");

        let err = client.search_by_text("frieren", 9).await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_success_returns_records() {
        let url = serve_once(
            200,
            r#"{"data":{"Page":{"media":[{"id":154587,"title":{"romaji":"Sousou no Frieren"}}]}}}"#,
        )
        .await;
        let client = AniListClient::with_endpoint(url);

        let records = client.search_by_text("frieren", 9).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 154587);
        assert_eq!(records[0].title, "Sousou no Frieren");
    }
}
