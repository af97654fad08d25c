use async_trait::async_trait;
use serde::Deserialize;

use super::{read_json, year_from_date, MetadataProvider, MovieCandidate, MovieMetadata};
use crate::utils::MovieReorgResult;

const PROVIDER: &str = "TMDB";

/// TMDB v3 movie search. Accepts either a v3 API key or a v4 read access token.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    base_url: String,
    credential: String,
    language: Option<String>,
    include_adult: bool,
    client: reqwest::Client,
}

impl TmdbProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        credential: String,
        language: Option<String>,
        include_adult: bool,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
            language,
            include_adult,
            client,
        }
    }

    // v4 read access tokens are JWTs
    fn is_access_token(&self) -> bool {
        self.credential.starts_with("eyJ")
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> MovieReorgResult<T> {
        let mut req = self
            .client
            .get(self.api_url(path))
            .header("Accept", "application/json");

        if self.is_access_token() {
            req = req.bearer_auth(&self.credential);
        } else {
            req = req.query(&[("api_key", self.credential.as_str())]);
        }
        if let Some(lang) = &self.language {
            req = req.query(&[("language", lang.as_str())]);
        }
        if !query.is_empty() {
            req = req.query(query);
        }

        read_json(PROVIDER, req.send().await?).await
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &str) -> MovieReorgResult<Vec<MovieCandidate>> {
        let page: SearchPage = self
            .get_json(
                "search/movie",
                &[
                    ("query", query.to_string()),
                    ("include_adult", self.include_adult.to_string()),
                ],
            )
            .await?;
        Ok(page.into_candidates())
    }

    async fn fetch_details(&self, candidate: &MovieCandidate) -> MovieReorgResult<MovieMetadata> {
        let details: MovieDetails = self
            .get_json(&format!("movie/{}", candidate.id), &[])
            .await?;
        Ok(details.into())
    }
}

// ================================================================================================
// Payloads
// ================================================================================================

#[derive(Debug, Clone, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<SearchItem>,
}

impl SearchPage {
    // every result is kept so the ranking is untouched
    fn into_candidates(self) -> Vec<MovieCandidate> {
        self.results
            .into_iter()
            .map(|item| MovieCandidate {
                id: item.id,
                title: item.title.or(item.original_title).unwrap_or_default(),
                year: year_from_date(item.release_date.as_deref()),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SearchItem {
    id: i64,
    title: Option<String>,
    original_title: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MovieDetails {
    title: Option<String>,
    release_date: Option<String>,
}

impl From<MovieDetails> for MovieMetadata {
    fn from(d: MovieDetails) -> Self {
        MovieMetadata {
            title: d.title,
            year: year_from_date(d.release_date.as_deref()),
        }
    }
}
