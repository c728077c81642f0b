pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_YEAR: &str = "Unknown";

/// One row of a search response
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub year: String,
}

/// Full metadata for a single movie
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub genres: Vec<String>,
    /// 0-10, one decimal
    pub rating: Option<f32>,
    pub plots: Vec<String>,
    pub full_size_cover_url: Option<String>,
    pub cover_url: Option<String>,
}

impl MovieDetail {
    /// Poster to download: the full-size cover, else the regular one
    pub fn poster_url(&self) -> Option<&str> {
        self.full_size_cover_url
            .as_deref()
            .or(self.cover_url.as_deref())
    }

    /// Row shown in the result table when this movie was fetched directly
    pub fn as_search_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
        }
    }
}
