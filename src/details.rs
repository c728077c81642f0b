use crate::{
    error::AppResult,
    models::MovieDetail,
    provider::LookupProvider,
};

pub const LOADING: &str = "Loading movie details...";
pub const UNKNOWN_GENRE: &str = "Unknown Genre";
pub const NO_PLOT: &str = "No plot summary available";
pub const NOT_RATED: &str = "Not Rated";

const PLOT_ATTRIBUTION: &str = "::";

/// Traffic-light band for a rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    Positive,
    Middle,
    Negative,
    Neutral,
}

impl RatingTier {
    pub fn from_rating(rating: Option<f32>) -> Self {
        match rating {
            Some(r) if r >= 7.5 => RatingTier::Positive,
            Some(r) if r >= 6.0 => RatingTier::Middle,
            Some(_) => RatingTier::Negative,
            None => RatingTier::Neutral,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            RatingTier::Positive => "#4CAF50",
            RatingTier::Middle => "#FFC107",
            RatingTier::Negative => "#F44336",
            RatingTier::Neutral => "#555555",
        }
    }

    /// Fill colour as cairo-style RGB fractions
    pub fn rgb(self) -> (f64, f64, f64) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_or(0.0, |v| f64::from(v) / 255.0)
        };
        (channel(0), channel(2), channel(4))
    }
}

/// Display strings derived from a `MovieDetail`
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title_line: String,
    pub tier: RatingTier,
    pub rating_label: String,
    pub disc_text: String,
    pub info_line: String,
    pub plot: String,
}

impl DetailView {
    pub fn from_detail(movie: &MovieDetail) -> Self {
        let tier = RatingTier::from_rating(movie.rating);
        let (rating_label, disc_text) = match movie.rating {
            Some(r) => (format!("IMDb: {:.1}/10", r), format!("{:.1}", r)),
            None => (NOT_RATED.to_string(), "N/A".to_string()),
        };

        Self {
            title_line: format!("{} ({})", movie.title, movie.year),
            tier,
            rating_label,
            disc_text,
            info_line: format!("Genre: {}", genre_line(&movie.genres)),
            plot: plot_text(&movie.plots),
        }
    }
}

/// First three genres, comma separated
pub fn genre_line(genres: &[String]) -> String {
    if genres.is_empty() {
        return UNKNOWN_GENRE.to_string();
    }
    genres
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// First plot entry with the trailing `::author` attribution removed
pub fn plot_text(plots: &[String]) -> String {
    match plots.first() {
        Some(plot) => plot
            .split(PLOT_ATTRIBUTION)
            .next()
            .unwrap_or_default()
            .to_string(),
        None => NO_PLOT.to_string(),
    }
}

pub fn loaded_status(movie: &MovieDetail) -> String {
    format!("Loaded details for '{}'", movie.title)
}

pub fn run(provider: &dyn LookupProvider, id: &str) -> AppResult<MovieDetail> {
    let movie = provider.details(id)?;
    tracing::info!(
        provider = provider.name(),
        id,
        title = %movie.title,
        rating = ?movie.rating,
        "Details loaded"
    );
    Ok(movie)
}
