pub mod radarr;
pub mod tmdb;

use async_trait::async_trait;

use crate::config::{Config, ProviderKind};
use crate::utils::{Error, MovieReorgResult};

/// One entry of a provider's ranked search results. `title` is empty and
/// `id` is 0 when the provider did not report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCandidate {
    pub id: i64,
    pub title: String,
    pub year: Option<u16>,
}

/// Canonical title and release year. Both must be present for a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieMetadata {
    pub title: Option<String>,
    pub year: Option<u16>,
}

impl MovieMetadata {
    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn resolved(&self) -> Option<(&str, u16)> {
        match (self.title.as_deref(), self.year) {
            (Some(title), Some(year)) if !title.trim().is_empty() => Some((title, year)),
            _ => None,
        }
    }
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ranked candidates for a free-text query, best match first.
    async fn search(&self, query: &str) -> MovieReorgResult<Vec<MovieCandidate>>;

    /// Full details for a candidate returned by `search`.
    async fn fetch_details(&self, candidate: &MovieCandidate) -> MovieReorgResult<MovieMetadata>;
}

/// Look up the best match for `query`: the first search result, refreshed
/// with its full details. An empty result list, or a first result without a
/// title or id, is a normal "no match".
pub async fn get_movie_info(
    provider: &dyn MetadataProvider,
    query: &str,
) -> MovieReorgResult<MovieMetadata> {
    let candidates = provider.search(query).await?;
    let Some(best) = candidates.first() else {
        tracing::debug!("{}: no results for '{}'", provider.name(), query);
        return Ok(MovieMetadata::no_match());
    };
    if best.id <= 0 || best.title.trim().is_empty() {
        tracing::debug!(
            "{}: best match for '{}' has no usable id/title: {:?}",
            provider.name(),
            query,
            best
        );
        return Ok(MovieMetadata::no_match());
    }

    tracing::debug!(
        "{}: best match for '{}' is #{} '{}' ({:?})",
        provider.name(),
        query,
        best.id,
        best.title,
        best.year
    );
    provider.fetch_details(best).await
}

pub fn from_config(config: &Config) -> MovieReorgResult<Box<dyn MetadataProvider>> {
    let client = build_http_client(config)?;
    match config.metadata.provider {
        ProviderKind::Tmdb => {
            let Some(api_key) = config.tmdb.api_key.clone().filter(|k| !k.is_empty()) else {
                return Err(Error::Other(
                    "metadata.provider is 'tmdb' but tmdb.api_key is not set".to_string(),
                ));
            };
            Ok(Box::new(tmdb::TmdbProvider::new(
                client,
                config.tmdb.base_url.clone(),
                api_key,
                config.tmdb.language.clone(),
                config.tmdb.include_adult,
            )))
        }
        ProviderKind::Radarr => {
            let Some(radarr_cfg) = config.radarr.as_ref() else {
                return Err(Error::Other(
                    "metadata.provider is 'radarr' but [radarr] config is missing".to_string(),
                ));
            };
            Ok(Box::new(radarr::RadarrProvider::new(
                client,
                radarr_cfg.base_url.clone(),
                radarr_cfg.api_key.clone(),
            )))
        }
    }
}

fn build_http_client(config: &Config) -> MovieReorgResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = config.metadata.timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Turn a non-success response into `Error::MetadataApiError`.
pub(crate) async fn check_status(
    provider: &'static str,
    resp: reqwest::Response,
) -> MovieReorgResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::MetadataApiError {
        provider,
        status,
        body,
    })
}

/// Decode a JSON body after `check_status`. A body of the wrong shape is an
/// error, never an empty result.
pub(crate) async fn read_json<T: for<'de> serde::Deserialize<'de>>(
    provider: &'static str,
    resp: reqwest::Response,
) -> MovieReorgResult<T> {
    let resp = check_status(provider, resp).await?;
    Ok(resp.json::<T>().await?)
}

/// Year from a "YYYY-MM-DD" (or bare "YYYY") date string.
pub(crate) fn year_from_date(date: Option<&str>) -> Option<u16> {
    date.and_then(|d| d.get(..4))
        .and_then(|y| y.parse::<u16>().ok())
        .filter(|y| *y > 0)
}
