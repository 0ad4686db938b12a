//! Terminal presentation
//!
//! Prompts, the candidate list and progress lines. Generic over
//! `BufRead`/`Write` so the interactive paths can be driven from tests.

use crate::error::{Error, Result};
use crate::workflow::{ArtistSelector, ProgressObserver};
use lyricount_common::{Artist, PipelineEvent, SampleOutcome};
use std::io::{self, BufRead, Write};

fn io_error(e: io::Error) -> Error {
    Error::Common(lyricount_common::Error::Io(e))
}

/// Read one line; `None` on end of input
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(io_error)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for an artist name until a non-blank one is entered
pub fn prompt_artist_name<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    loop {
        write!(output, "Please enter an artist name: ").map_err(io_error)?;
        output.flush().map_err(io_error)?;

        match read_line(input)? {
            Some(name) if !name.is_empty() => return Ok(name),
            Some(_) => continue,
            None => {
                return Err(Error::InvalidArgument(
                    "no artist name entered".to_string(),
                ))
            }
        }
    }
}

/// One line per candidate: `   N. Name (Country)`
pub fn format_candidates(candidates: &[Artist]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, artist)| {
            if artist.has_country() {
                format!("   {}. {} ({})\n", i + 1, artist.name, artist.country)
            } else {
                format!("   {}. {}\n", i + 1, artist.name)
            }
        })
        .collect()
}

/// Interactive selector reading a 1-based position
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ArtistSelector for PromptSelector<R, W> {
    /// Re-prompts until the answer parses as a number; range is not checked here
    fn select(&mut self, candidates: &[Artist]) -> Result<usize> {
        loop {
            write!(
                self.output,
                "Please select an artist (1-{}): ",
                candidates.len()
            )
            .map_err(io_error)?;
            self.output.flush().map_err(io_error)?;

            let Some(answer) = read_line(&mut self.input)? else {
                return Err(Error::InvalidArgument("no selection entered".to_string()));
            };
            match answer.parse::<usize>() {
                Ok(position) => return Ok(position),
                Err(_) => {
                    writeln!(self.output, "'{}' is not a number", answer).map_err(io_error)?;
                }
            }
        }
    }
}

/// Text for one progress event, `None` for events with no console line
pub fn render_event(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::CandidatesFound { candidates, .. } => Some(format_candidates(candidates)),
        PipelineEvent::ArtistSelected { artist, .. } => {
            Some(format!("You have selected {}\n", artist.name))
        }
        PipelineEvent::BatchFetched {
            received,
            collected,
            requested,
            available,
            ..
        } => Some(format!(
            "Fetched {} works ({}/{} collected, {} available)",
            received, collected, requested, available
        )),
        PipelineEvent::WorkProcessed {
            index,
            total,
            title,
            word_count,
            included,
            ..
        } => Some(if *included {
            format!("[{}/{}] {}: {} words", index, total, title, word_count)
        } else {
            format!("[{}/{}] {}: no lyrics", index, total, title)
        }),
        PipelineEvent::SampleCompleted { .. } => None,
    }
}

/// Prints progress events to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_event(&self, event: &PipelineEvent) {
        if let Some(line) = render_event(event) {
            println!("{}", line);
        }
    }
}

/// Final summary line
pub fn format_outcome(artist_name: &str, outcome: &SampleOutcome) -> String {
    if outcome.included_count == 0 {
        return format!(
            "No lyrics found for any of the {} sampled works by {}",
            outcome.sampled_count, artist_name
        );
    }
    format!(
        "Average word count for {}: {} ({} of {} sampled works had lyrics, {} words total)",
        artist_name,
        outcome.average_words,
        outcome.included_count,
        outcome.sampled_count,
        outcome.total_words
    )
}
