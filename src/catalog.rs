use rand::seq::SliceRandom;
use rand::Rng;

/// Well-known movies the "Random Movie" button picks from, as
/// (IMDb id, title) pairs.
pub const POPULAR_MOVIES: &[(&str, &str)] = &[
    ("0111161", "The Shawshank Redemption"),
    ("0068646", "The Godfather"),
    ("0071562", "The Godfather Part II"),
    ("0468569", "The Dark Knight"),
    ("0050083", "12 Angry Men"),
    ("0108052", "Schindler's List"),
    ("0167260", "The Lord of the Rings: The Return of the King"),
    ("0110912", "Pulp Fiction"),
    ("0060196", "The Good, the Bad and the Ugly"),
    ("0120737", "The Lord of the Rings: The Fellowship of the Ring"),
    ("0137523", "Fight Club"),
    ("0109830", "Forrest Gump"),
    ("1375666", "Inception"),
    ("0080684", "Star Wars: Episode V - The Empire Strikes Back"),
    ("0167261", "The Lord of the Rings: The Two Towers"),
    ("0073486", "One Flew Over the Cuckoo's Nest"),
    ("0099685", "Goodfellas"),
    ("0133093", "The Matrix"),
    ("0047478", "Seven Samurai"),
    ("0317248", "City of God"),
    ("0114369", "Se7en"),
    ("0118799", "Life Is Beautiful"),
    ("0038650", "It's a Wonderful Life"),
    ("0102926", "The Silence of the Lambs"),
    ("0076759", "Star Wars"),
    ("0816692", "Interstellar"),
    ("0120689", "The Green Mile"),
    ("0103064", "Terminator 2: Judgment Day"),
    ("0120815", "Saving Private Ryan"),
    ("0245429", "Spirited Away"),
];

pub const FETCHING_RANDOM: &str = "Fetching a random popular movie...";

/// Uniformly random id from `POPULAR_MOVIES`
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    POPULAR_MOVIES
        .choose(rng)
        .map(|(id, _)| *id)
        .unwrap_or(POPULAR_MOVIES[0].0)
}

pub fn contains(id: &str) -> bool {
    let bare = id.strip_prefix("tt").unwrap_or(id);
    POPULAR_MOVIES.iter().any(|(known, _)| *known == bare)
}

pub fn selected_status(title: &str) -> String {
    format!("Selected a random movie: {}", title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_well_formed() {
        let ids: HashSet<_> = POPULAR_MOVIES.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), POPULAR_MOVIES.len());
        for id in ids {
            assert_eq!(id.len(), 7);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn pick_always_comes_from_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(contains(pick(&mut rng)));
        }
    }

    #[test]
    fn pick_reaches_more_than_one_movie() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<_> = (0..200).map(|_| pick(&mut rng)).collect();
        assert!(seen.len() > 1);
    }

    #[test]
    fn contains_accepts_prefixed_ids() {
        assert!(contains("tt0133093"));
        assert!(contains("0133093"));
        assert!(!contains("tt0000001"));
    }
}
