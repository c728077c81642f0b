//! OMDb API provider
//!
//! Search: `?s={title}` returns up to ten `{Title, Year, imdbID}` rows.
//! Details: `?i={imdb id}` returns one flat record where every missing
//! value is the literal string "N/A".
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{MovieDetail, SearchResult, UNKNOWN_TITLE, UNKNOWN_YEAR},
    provider::LookupProvider,
};

const NOT_FOUND: &str = "Movie not found!";
const MISSING: &str = "N/A";

pub struct OmdbProvider {
    client: Client,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("movie-rating/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if config.api_key.is_empty() {
            tracing::warn!("No OMDb API key configured; lookups will be rejected by the provider");
        }

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        })
    }

    fn get(&self, query: &str) -> AppResult<String> {
        let url = format!(
            "{}?apikey={}&{}",
            self.api_url,
            urlencoding::encode(&self.api_key),
            query
        );

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            // OMDb reports bad keys as 401 with its usual JSON envelope
            if let Ok(OmdbEnvelope {
                error: Some(message),
                ..
            }) = serde_json::from_str::<OmdbEnvelope>(&body)
            {
                return Err(AppError::Provider(message));
            }
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: self.api_url.clone(),
            });
        }

        Ok(body)
    }
}

impl LookupProvider for OmdbProvider {
    fn search(&self, title: &str) -> AppResult<Vec<SearchResult>> {
        tracing::debug!(provider = self.name(), title, "Searching");
        let body = self.get(&format!("s={}", urlencoding::encode(title)))?;
        parse_search(&body)
    }

    fn details(&self, id: &str) -> AppResult<MovieDetail> {
        let imdb_id = imdb_id(id);
        tracing::debug!(provider = self.name(), id = %imdb_id, "Fetching details");
        let body = self.get(&format!("i={}", urlencoding::encode(&imdb_id)))?;
        parse_details(&body, &imdb_id)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[derive(Debug, Deserialize)]
struct OmdbEnvelope {
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl OmdbEnvelope {
    fn succeeded(&self) -> bool {
        self.response.as_deref() != Some("False")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchResponse {
    #[serde(default)]
    search: Vec<OmdbSearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchItem {
    title: Option<String>,
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbDetails {
    title: Option<String>,
    year: Option<String>,
    genre: Option<String>,
    plot: Option<String>,
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

pub(crate) fn parse_search(body: &str) -> AppResult<Vec<SearchResult>> {
    let envelope: OmdbEnvelope = serde_json::from_str(body)?;
    if !envelope.succeeded() {
        return match envelope.error {
            Some(message) if message == NOT_FOUND => Ok(Vec::new()),
            Some(message) => Err(AppError::Provider(message)),
            None => Err(AppError::Provider("search failed".to_string())),
        };
    }

    let response: OmdbSearchResponse = serde_json::from_str(body)?;
    Ok(response
        .search
        .into_iter()
        .filter_map(|item| {
            // Rows without an id cannot be selected
            let Some(id) = known(item.imdb_id) else {
                tracing::debug!(title = ?item.title, "Skipping search row without imdbID");
                return None;
            };
            Some(SearchResult {
                id,
                title: known(item.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                year: known(item.year).unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
            })
        })
        .collect())
}

pub(crate) fn parse_details(body: &str, requested_id: &str) -> AppResult<MovieDetail> {
    let envelope: OmdbEnvelope = serde_json::from_str(body)?;
    if !envelope.succeeded() {
        return match envelope.error {
            Some(message) if message == NOT_FOUND || message.starts_with("Incorrect IMDb ID") => {
                Err(AppError::NotFound(requested_id.to_string()))
            }
            Some(message) => Err(AppError::Provider(message)),
            None => Err(AppError::NotFound(requested_id.to_string())),
        };
    }

    let details: OmdbDetails = serde_json::from_str(body)?;

    let genres = known(details.genre)
        .map(|g| {
            g.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let cover_url = known(details.poster);
    let full_size_cover_url = cover_url.as_deref().map(full_size_cover_url);

    Ok(MovieDetail {
        id: known(details.imdb_id).unwrap_or_else(|| requested_id.to_string()),
        title: known(details.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        year: known(details.year).unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
        genres,
        rating: known(details.imdb_rating).and_then(|r| parse_rating(&r)),
        plots: known(details.plot).into_iter().collect(),
        full_size_cover_url,
        cover_url,
    })
}

/// Drop OMDb's "N/A" placeholders and blank strings
fn known(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v.as_str() != MISSING)
}

fn parse_rating(raw: &str) -> Option<f32> {
    let rating: f32 = raw.trim().parse().ok()?;
    if !(0.0..=10.0).contains(&rating) {
        return None;
    }
    Some((rating * 10.0).round() / 10.0)
}

/// Bare seven-digit ids get the `tt` prefix OMDb expects
pub(crate) fn imdb_id(id: &str) -> String {
    let id = id.trim();
    if id.starts_with("tt") {
        id.to_string()
    } else {
        format!("tt{}", id)
    }
}

/// Amazon image URLs carry a size directive after `._V1_`
/// (e.g. `@._V1_SX300.jpg`); removing it yields the full-size image.
pub(crate) fn full_size_cover_url(url: &str) -> String {
    const MARKER: &str = "._V1_";
    if let Some(start) = url.find(MARKER) {
        let tail = &url[start + MARKER.len()..];
        if let Some(dot) = tail.find('.') {
            return format!("{}{}{}", &url[..start], MARKER, &tail[dot..]);
        }
    }
    url.to_string()
}
