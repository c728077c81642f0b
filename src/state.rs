//! UI-thread application state
//!
//! `AppState` is owned by the presentation layer and only ever touched on
//! the UI thread. User actions produce a [`Request`] for the worker pool;
//! finished work comes back as an [`Outcome`] carrying the generation it
//! was issued under. An outcome whose generation is no longer the latest of
//! its kind is dropped, so a slow lookup can never overwrite a newer one.

use crate::{
    catalog,
    details::{self, DetailView},
    error::{AppError, AppResult},
    models::{MovieDetail, SearchResult},
    poster::PosterImage,
    search,
};

pub const READY: &str = "Ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Search,
    Details,
    Poster,
}

/// Latest generation issued per request kind
#[derive(Debug, Default)]
pub struct Generations {
    search: u64,
    details: u64,
    poster: u64,
}

impl Generations {
    fn slot(&mut self, kind: Kind) -> &mut u64 {
        match kind {
            Kind::Search => &mut self.search,
            Kind::Details => &mut self.details,
            Kind::Poster => &mut self.poster,
        }
    }

    pub fn advance(&mut self, kind: Kind) -> u64 {
        let slot = self.slot(kind);
        *slot += 1;
        *slot
    }

    pub fn current(&self, kind: Kind) -> u64 {
        match kind {
            Kind::Search => self.search,
            Kind::Details => self.details,
            Kind::Poster => self.poster,
        }
    }

    pub fn is_current(&self, kind: Kind, generation: u64) -> bool {
        self.current(kind) == generation
    }
}

/// Work for the background pool
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Search { generation: u64, title: String },
    Details { generation: u64, id: String },
    Random { generation: u64, id: String },
    Poster { generation: u64, url: Option<String> },
}

impl Request {
    pub fn kind(&self) -> Kind {
        match self {
            // A random pick replaces the result table, so it races searches
            Request::Search { .. } | Request::Random { .. } => Kind::Search,
            Request::Details { .. } => Kind::Details,
            Request::Poster { .. } => Kind::Poster,
        }
    }
}

/// Finished work, posted back to the UI thread
#[derive(Debug)]
pub enum Outcome {
    Search {
        generation: u64,
        result: AppResult<Vec<SearchResult>>,
    },
    Details {
        generation: u64,
        result: AppResult<MovieDetail>,
    },
    Random {
        generation: u64,
        result: AppResult<MovieDetail>,
    },
    Poster {
        generation: u64,
        image: Option<PosterImage>,
    },
}

impl Outcome {
    pub fn kind(&self) -> Kind {
        match self {
            Outcome::Search { .. } | Outcome::Random { .. } => Kind::Search,
            Outcome::Details { .. } => Kind::Details,
            Outcome::Poster { .. } => Kind::Poster,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            Outcome::Search { generation, .. }
            | Outcome::Details { generation, .. }
            | Outcome::Random { generation, .. }
            | Outcome::Poster { generation, .. } => *generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PosterState {
    #[default]
    Empty,
    Loading,
    Placeholder,
    Ready(PosterImage),
}

/// Part of the view that must be redrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Status,
    Results,
    Detail,
    Poster,
    /// Select a result row, which feeds back into `AppState::select`
    Select(usize),
}

#[derive(Debug, Default, PartialEq)]
pub struct Reaction {
    pub changes: Vec<Change>,
    pub request: Option<Request>,
}

impl Reaction {
    fn changed(changes: &[Change]) -> Self {
        Self {
            changes: changes.to_vec(),
            request: None,
        }
    }

    fn with_request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }
}

pub struct AppState {
    generations: Generations,
    results: Vec<SearchResult>,
    current: Option<MovieDetail>,
    view: Option<DetailView>,
    poster: PosterState,
    status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            generations: Generations::default(),
            results: Vec::new(),
            current: None,
            view: None,
            poster: PosterState::Empty,
            status: READY.to_string(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn current(&self) -> Option<&MovieDetail> {
        self.current.as_ref()
    }

    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    pub fn poster(&self) -> &PosterState {
        &self.poster
    }

    pub fn generations(&self) -> &Generations {
        &self.generations
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Search field submitted
    pub fn submit_search(&mut self, input: &str) -> Reaction {
        let title = match search::normalize_title(input) {
            Ok(title) => title,
            Err(AppError::InvalidInput(message)) => {
                self.set_status(message);
                return Reaction::changed(&[Change::Status]);
            }
            Err(e) => {
                self.set_status(format!("Error: {}", e));
                return Reaction::changed(&[Change::Status]);
            }
        };

        self.results.clear();
        self.set_status(search::searching_status(&title));
        let generation = self.generations.advance(Kind::Search);
        tracing::info!(title = %title, generation, "Search issued");

        Reaction::changed(&[Change::Results, Change::Status])
            .with_request(Request::Search { generation, title })
    }

    /// Result row selected
    pub fn select(&mut self, id: &str) -> Reaction {
        self.set_status(details::LOADING);
        let generation = self.generations.advance(Kind::Details);
        tracing::info!(id, generation, "Detail fetch issued");

        Reaction::changed(&[Change::Status]).with_request(Request::Details {
            generation,
            id: id.to_string(),
        })
    }

    /// "Random Movie" pressed; `id` comes from the curated catalog
    pub fn random(&mut self, id: &str) -> Reaction {
        self.set_status(catalog::FETCHING_RANDOM);
        let generation = self.generations.advance(Kind::Search);
        tracing::info!(id, generation, "Random movie issued");

        Reaction::changed(&[Change::Status]).with_request(Request::Random {
            generation,
            id: id.to_string(),
        })
    }

    /// Fold a finished background operation into the state
    pub fn apply(&mut self, outcome: Outcome) -> Reaction {
        let kind = outcome.kind();
        let generation = outcome.generation();
        if !self.generations.is_current(kind, generation) {
            tracing::debug!(
                ?kind,
                generation,
                latest = self.generations.current(kind),
                "Discarding stale outcome"
            );
            return Reaction::default();
        }

        match outcome {
            Outcome::Search { result, .. } => self.apply_search(result),
            Outcome::Details { result, .. } => self.apply_details(result),
            Outcome::Random { result, .. } => self.apply_random(result),
            Outcome::Poster { image, .. } => self.apply_poster(image),
        }
    }

    fn apply_search(&mut self, result: AppResult<Vec<SearchResult>>) -> Reaction {
        match result {
            Ok(results) => {
                self.set_status(search::completed_status(&results));
                self.results = results;
                Reaction::changed(&[Change::Results, Change::Status])
            }
            Err(e) => self.fail(e),
        }
    }

    fn apply_details(&mut self, result: AppResult<MovieDetail>) -> Reaction {
        let movie = match result {
            Ok(movie) => movie,
            // Previous detail panel stays as it was
            Err(e) => return self.fail(e),
        };

        self.set_status(details::loaded_status(&movie));
        self.view = Some(DetailView::from_detail(&movie));
        self.poster = PosterState::Loading;
        let generation = self.generations.advance(Kind::Poster);
        let url = movie.poster_url().map(str::to_string);
        self.current = Some(movie);

        Reaction::changed(&[Change::Detail, Change::Poster, Change::Status])
            .with_request(Request::Poster { generation, url })
    }

    fn apply_random(&mut self, result: AppResult<MovieDetail>) -> Reaction {
        let movie = match result {
            Ok(movie) => movie,
            Err(e) => return self.fail(e),
        };

        self.results = vec![movie.as_search_result()];
        self.set_status(catalog::selected_status(&movie.title));
        Reaction::changed(&[Change::Results, Change::Status, Change::Select(0)])
    }

    fn apply_poster(&mut self, image: Option<PosterImage>) -> Reaction {
        self.poster = match image {
            Some(image) => PosterState::Ready(image),
            None => PosterState::Placeholder,
        };
        Reaction::changed(&[Change::Poster])
    }

    fn fail(&mut self, error: AppError) -> Reaction {
        tracing::error!(error = %error, "Operation failed");
        self.set_status(format!("Error: {}", error));
        Reaction::changed(&[Change::Status])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, title: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: title.to_string(),
            year: "1999".to_string(),
        }
    }

    fn movie(id: &str, title: &str) -> MovieDetail {
        MovieDetail {
            id: id.to_string(),
            title: title.to_string(),
            year: "1999".to_string(),
            genres: vec!["Action".to_string()],
            rating: Some(8.7),
            plots: vec!["Neo wakes up.::someone".to_string()],
            full_size_cover_url: None,
            cover_url: Some("https://img/cover.jpg".to_string()),
        }
    }

    fn poster() -> PosterImage {
        PosterImage {
            url: "https://img/cover.jpg".to_string(),
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        }
    }

    fn search_generation(reaction: &Reaction) -> u64 {
        match reaction.request {
            Some(Request::Search { generation, .. }) => generation,
            ref other => panic!("expected a search request, got {:?}", other),
        }
    }

    fn details_generation(reaction: &Reaction) -> u64 {
        match reaction.request {
            Some(Request::Details { generation, .. }) => generation,
            ref other => panic!("expected a details request, got {:?}", other),
        }
    }

    #[test]
    fn starts_ready() {
        let state = AppState::new();
        assert_eq!(state.status(), "Ready");
        assert!(state.results().is_empty());
        assert!(state.current().is_none());
        assert_eq!(state.poster(), &PosterState::Empty);
    }

    #[test]
    fn empty_search_issues_no_request() {
        let mut state = AppState::new();
        let reaction = state.submit_search("   ");
        assert_eq!(reaction.request, None);
        assert_eq!(reaction.changes, vec![Change::Status]);
        assert_eq!(state.status(), search::EMPTY_TITLE);
        assert_eq!(state.generations().current(Kind::Search), 0);
    }

    #[test]
    fn search_clears_results_and_reports_count() {
        let mut state = AppState::new();
        let first = state.submit_search("matrix");
        state.apply(Outcome::Search {
            generation: search_generation(&first),
            result: Ok(vec![row("tt0133093", "The Matrix")]),
        });
        assert_eq!(state.results().len(), 1);
        assert_eq!(state.status(), "Found 1 movies");

        let second = state.submit_search("  heat ");
        assert!(state.results().is_empty());
        assert_eq!(state.status(), "Searching for 'heat'...");
        assert_eq!(
            second.request,
            Some(Request::Search {
                generation: 2,
                title: "heat".to_string()
            })
        );
    }

    #[test]
    fn zero_results() {
        let mut state = AppState::new();
        let reaction = state.submit_search("zzzz");
        state.apply(Outcome::Search {
            generation: search_generation(&reaction),
            result: Ok(vec![]),
        });
        assert_eq!(state.status(), "No movies found.");
        assert!(state.results().is_empty());
    }

    #[test]
    fn search_error_becomes_status() {
        let mut state = AppState::new();
        let reaction = state.submit_search("heat");
        let applied = state.apply(Outcome::Search {
            generation: search_generation(&reaction),
            result: Err(AppError::Provider("Invalid API key!".to_string())),
        });
        assert_eq!(applied.changes, vec![Change::Status]);
        assert_eq!(state.status(), "Error: Provider error: Invalid API key!");
    }

    #[test]
    fn stale_search_is_discarded() {
        let mut state = AppState::new();
        let old = state.submit_search("matrix");
        let new = state.submit_search("heat");

        state.apply(Outcome::Search {
            generation: search_generation(&new),
            result: Ok(vec![row("tt0113277", "Heat")]),
        });
        let late = state.apply(Outcome::Search {
            generation: search_generation(&old),
            result: Ok(vec![row("tt0133093", "The Matrix"), row("tt0234215", "Reloaded")]),
        });

        assert_eq!(late, Reaction::default());
        assert_eq!(state.results(), &[row("tt0113277", "Heat")]);
        assert_eq!(state.status(), "Found 1 movies");
    }

    #[test]
    fn selection_posts_loading_status_immediately() {
        let mut state = AppState::new();
        let reaction = state.select("tt0133093");
        assert_eq!(state.status(), "Loading movie details...");
        assert_eq!(
            reaction.request,
            Some(Request::Details {
                generation: 1,
                id: "tt0133093".to_string()
            })
        );
    }

    #[test]
    fn details_success_requests_poster() {
        let mut state = AppState::new();
        let reaction = state.select("tt0133093");
        let applied = state.apply(Outcome::Details {
            generation: details_generation(&reaction),
            result: Ok(movie("tt0133093", "The Matrix")),
        });

        assert_eq!(state.status(), "Loaded details for 'The Matrix'");
        assert_eq!(state.poster(), &PosterState::Loading);
        let view = state.view().unwrap();
        assert_eq!(view.plot, "Neo wakes up.");
        assert_eq!(view.rating_label, "IMDb: 8.7/10");
        assert_eq!(
            applied.request,
            Some(Request::Poster {
                generation: 1,
                url: Some("https://img/cover.jpg".to_string())
            })
        );
    }

    #[test]
    fn stale_details_cannot_overwrite_newer_selection() {
        let mut state = AppState::new();
        let first = state.select("tt0133093");
        let second = state.select("tt0113277");

        state.apply(Outcome::Details {
            generation: details_generation(&second),
            result: Ok(movie("tt0113277", "Heat")),
        });
        let late = state.apply(Outcome::Details {
            generation: details_generation(&first),
            result: Ok(movie("tt0133093", "The Matrix")),
        });

        assert_eq!(late.request, None);
        assert_eq!(state.current().unwrap().title, "Heat");
        assert_eq!(state.status(), "Loaded details for 'Heat'");
    }

    #[test]
    fn details_error_keeps_previous_panel() {
        let mut state = AppState::new();
        let first = state.select("tt0133093");
        state.apply(Outcome::Details {
            generation: details_generation(&first),
            result: Ok(movie("tt0133093", "The Matrix")),
        });

        let second = state.select("tt0000000");
        let applied = state.apply(Outcome::Details {
            generation: details_generation(&second),
            result: Err(AppError::NotFound("tt0000000".to_string())),
        });

        assert_eq!(applied.changes, vec![Change::Status]);
        assert_eq!(state.status(), "Error: Not found: tt0000000");
        assert_eq!(state.current().unwrap().title, "The Matrix");
        assert_eq!(state.view().unwrap().title_line, "The Matrix (1999)");
    }

    #[test]
    fn poster_for_superseded_movie_is_dropped() {
        let mut state = AppState::new();
        let first = state.select("tt0133093");
        let loaded = state.apply(Outcome::Details {
            generation: details_generation(&first),
            result: Ok(movie("tt0133093", "The Matrix")),
        });
        let old_poster = match loaded.request {
            Some(Request::Poster { generation, .. }) => generation,
            other => panic!("unexpected: {:?}", other),
        };

        let second = state.select("tt0113277");
        state.apply(Outcome::Details {
            generation: details_generation(&second),
            result: Ok(movie("tt0113277", "Heat")),
        });

        let late = state.apply(Outcome::Poster {
            generation: old_poster,
            image: Some(poster()),
        });
        assert_eq!(late, Reaction::default());
        assert_eq!(state.poster(), &PosterState::Loading);
    }

    #[test]
    fn poster_failure_shows_placeholder() {
        let mut state = AppState::new();
        let first = state.select("tt0133093");
        state.apply(Outcome::Details {
            generation: details_generation(&first),
            result: Ok(movie("tt0133093", "The Matrix")),
        });

        let applied = state.apply(Outcome::Poster {
            generation: state.generations().current(Kind::Poster),
            image: None,
        });
        assert_eq!(applied.changes, vec![Change::Poster]);
        assert_eq!(state.poster(), &PosterState::Placeholder);

        let generation = state.generations().current(Kind::Poster);
        state.apply(Outcome::Poster {
            generation,
            image: Some(poster()),
        });
        assert_eq!(state.poster(), &PosterState::Ready(poster()));
    }

    #[test]
    fn random_never_searches_and_cascades_into_selection() {
        let mut state = AppState::new();
        let reaction = state.random("0133093");
        assert_eq!(state.status(), "Fetching a random popular movie...");
        let generation = match reaction.request {
            Some(Request::Random { generation, ref id }) => {
                assert_eq!(id, "0133093");
                generation
            }
            ref other => panic!("unexpected: {:?}", other),
        };

        let applied = state.apply(Outcome::Random {
            generation,
            result: Ok(movie("tt0133093", "The Matrix")),
        });
        assert_eq!(applied.request, None);
        assert_eq!(applied.changes.last(), Some(&Change::Select(0)));
        assert_eq!(state.results(), &[row("tt0133093", "The Matrix")]);
        assert_eq!(state.status(), "Selected a random movie: The Matrix");

        let id = state.results()[0].id.clone();
        let cascade = state.select(&id);
        assert!(matches!(cascade.request, Some(Request::Details { .. })));
    }

    #[test]
    fn search_after_random_discards_random_result() {
        let mut state = AppState::new();
        let random = state.random("0133093");
        let generation = match random.request {
            Some(Request::Random { generation, .. }) => generation,
            other => panic!("unexpected: {:?}", other),
        };
        state.submit_search("heat");

        let late = state.apply(Outcome::Random {
            generation,
            result: Ok(movie("tt0133093", "The Matrix")),
        });
        assert_eq!(late, Reaction::default());
        assert!(state.results().is_empty());
    }

    #[test]
    fn generations_are_independent() {
        let mut generations = Generations::default();
        assert_eq!(generations.advance(Kind::Search), 1);
        assert_eq!(generations.advance(Kind::Search), 2);
        assert_eq!(generations.advance(Kind::Details), 1);
        assert!(generations.is_current(Kind::Search, 2));
        assert!(!generations.is_current(Kind::Search, 1));
        assert!(generations.is_current(Kind::Poster, 0));
    }
}
