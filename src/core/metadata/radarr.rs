use async_trait::async_trait;
use serde::Deserialize;

use super::{read_json, MetadataProvider, MovieCandidate, MovieMetadata};
use crate::utils::MovieReorgResult;

const PROVIDER: &str = "Radarr";

/// Movie lookup through a Radarr instance (which proxies TMDB).
#[derive(Debug, Clone)]
pub struct RadarrProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RadarrProvider {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> MovieReorgResult<T> {
        let mut req = self
            .client
            .get(self.api_url(path))
            .header("Accept", "application/json")
            .header("X-Api-Key", &self.api_key);

        if !query.is_empty() {
            req = req.query(query);
        }

        read_json(PROVIDER, req.send().await?).await
    }
}

#[async_trait]
impl MetadataProvider for RadarrProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &str) -> MovieReorgResult<Vec<MovieCandidate>> {
        let found: Vec<MovieResource> = self
            .get_json("movie/lookup", &[("term", query.to_string())])
            .await?;
        Ok(found.into_iter().map(MovieResource::into_candidate).collect())
    }

    async fn fetch_details(&self, candidate: &MovieCandidate) -> MovieReorgResult<MovieMetadata> {
        let movie: MovieResource = self
            .get_json("movie/lookup/tmdb", &[("tmdbId", candidate.id.to_string())])
            .await?;
        Ok(movie.into())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieResource {
    #[serde(default)]
    tmdb_id: i64,
    title: Option<String>,
    #[serde(default)]
    year: i32,
}

impl MovieResource {
    // Radarr reports 0 for an unknown year
    fn known_year(&self) -> Option<u16> {
        u16::try_from(self.year).ok().filter(|y| *y > 0)
    }

    // movies unknown to TMDB keep their rank with id 0
    fn into_candidate(self) -> MovieCandidate {
        let year = self.known_year();
        MovieCandidate {
            id: self.tmdb_id.max(0),
            title: self.title.unwrap_or_default(),
            year,
        }
    }
}

impl From<MovieResource> for MovieMetadata {
    fn from(m: MovieResource) -> Self {
        let year = m.known_year();
        MovieMetadata {
            title: m.title,
            year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_results() {
        let body = r#"[
            {"title": "Alien", "year": 1979, "tmdbId": 348, "imdbId": "tt0078748"},
            {"title": "Alien Untitled", "year": 0, "tmdbId": 999},
            {"title": "Not On TMDB", "year": 2001}
        ]"#;
        let found: Vec<MovieResource> = serde_json::from_str(body).unwrap();
        let candidates: Vec<_> = found.into_iter().map(MovieResource::into_candidate).collect();

        assert_eq!(candidates.len(), 3);
        assert_eq!(
            candidates[0],
            MovieCandidate { id: 348, title: "Alien".into(), year: Some(1979) }
        );
        assert_eq!(candidates[1].year, None);
        assert_eq!(candidates[2].id, 0);
    }

    #[tokio::test]
    async fn error_object_instead_of_list() {
        let resp = reqwest::Response::from(
            http::Response::builder()
                .status(200)
                .body(r#"{"message": "Unauthorized"}"#)
                .unwrap(),
        );
        assert!(read_json::<Vec<MovieResource>>(PROVIDER, resp).await.is_err());
    }

    #[test]
    fn details_without_year_do_not_resolve() {
        let movie: MovieResource =
            serde_json::from_str(r#"{"title": "Alien Untitled", "year": 0, "tmdbId": 999}"#).unwrap();
        assert_eq!(MovieMetadata::from(movie).resolved(), None);
    }

    #[test]
    fn api_url_joins_paths() {
        let p = RadarrProvider::new(reqwest::Client::new(), "http://radarr:7878/".into(), "k".into());
        assert_eq!(p.api_url("/movie/lookup"), "http://radarr:7878/api/v3/movie/lookup");
    }
}
