use crate::{
    error::{AppError, AppResult},
    models::SearchResult,
    provider::LookupProvider,
};

pub const EMPTY_TITLE: &str = "Please enter a movie title";
pub const NO_RESULTS: &str = "No movies found.";

/// Trimmed title, or `InvalidInput` when nothing is left to search for
pub fn normalize_title(input: &str) -> AppResult<String> {
    let title = input.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput(EMPTY_TITLE.to_string()));
    }
    Ok(title.to_string())
}

pub fn run(provider: &dyn LookupProvider, title: &str) -> AppResult<Vec<SearchResult>> {
    let results = provider.search(title)?;
    tracing::info!(
        provider = provider.name(),
        title,
        count = results.len(),
        "Search completed"
    );
    Ok(results)
}

pub fn searching_status(title: &str) -> String {
    format!("Searching for '{}'...", title)
}

pub fn completed_status(results: &[SearchResult]) -> String {
    if results.is_empty() {
        NO_RESULTS.to_string()
    } else {
        format!("Found {} movies", results.len())
    }
}
