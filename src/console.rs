//! Console flow used when no display is available
//!
//! Errors are printed, never returned as a failure exit status; only a
//! broken stdin/stdout surfaces as `Err`.

use std::io::{self, BufRead, Write};

use crate::{provider::LookupProvider, search};

pub const INVALID_CHOICE: &str = "Invalid choice.";

pub fn run<R, W>(provider: &dyn LookupProvider, input: &mut R, out: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let answer = prompt(input, out, "What movie do you want rated? ")?;
    let title = match search::normalize_title(&answer) {
        Ok(title) => title,
        Err(_) => {
            writeln!(out, "{}", search::EMPTY_TITLE)?;
            return Ok(());
        }
    };

    let movies = match search::run(provider, &title) {
        Ok(movies) => movies,
        Err(e) => {
            tracing::error!(error = %e, "Console search failed");
            writeln!(out, "Error: {}", e)?;
            return Ok(());
        }
    };

    if movies.is_empty() {
        writeln!(out, "{}", search::NO_RESULTS)?;
        return Ok(());
    }

    writeln!(out, "Movies found:")?;
    for (i, movie) in movies.iter().enumerate() {
        writeln!(out, "{}: {} ({})", i + 1, movie.title, movie.year)?;
    }

    let answer = prompt(input, out, "Select a movie by number: ")?;
    let chosen = answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| movies.get(i));
    let Some(chosen) = chosen else {
        writeln!(out, "{}", INVALID_CHOICE)?;
        return Ok(());
    };

    match provider.details(&chosen.id) {
        Ok(movie) => match movie.rating {
            Some(rating) => writeln!(
                out,
                "The rating for '{}' is {:.1}/10.",
                movie.title, rating
            )?,
            None => writeln!(out, "No rating found for '{}'.", movie.title)?,
        },
        Err(e) => {
            tracing::error!(error = %e, id = %chosen.id, "Console detail fetch failed");
            writeln!(out, "Error: {}", e)?;
        }
    }

    Ok(())
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<String> {
    write!(out, "{}", question)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}
