//! ChunkedLineReader — one linear stride scan with three ways of picking the chunk to return.
//!
//! The decoded stream is walked in strides of `probe_size` (half a chunk). For each stride
//! the next `probe_size` characters are peeked, their line breaks counted, and the stream
//! advanced by exactly `probe_size`. The stride that satisfies the query is re-peeked at
//! full `chunk_size` and becomes the returned chunk, so consecutive chunks overlap by half.
//! The scan always runs to the end of the stream so `total_chunks` and match totals are
//! exact.

use std::io::Read;

use log::debug;

use crate::char_stream::CharStream;
use crate::lines::split_lines;
use crate::occurrences::{count_occurrences, match_columns};
use crate::source::TextSource;
use crate::{KeywordQuery, KeywordSearch, LinePosition, LoadedChunk, OccurrenceResult, ReaderConfig, ReaderError};

/// What makes a stride the one to return.
#[derive(Debug, Clone, Copy)]
enum ScanTarget<'a> {
    Chunk(usize),
    Line(usize),
    Keyword(&'a KeywordQuery),
}

/// The first qualifying keyword match.
#[derive(Debug, Clone, Copy)]
struct FoundMatch {
    position: LinePosition,
    match_index: usize,
}

#[derive(Debug, Default)]
struct ScanOutcome {
    chunk: Option<LoadedChunk>,
    found: Option<FoundMatch>,
    total_matches: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ChunkedLineReader {
    config: ReaderConfig,
}

impl ChunkedLineReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Returns the `chunk_index`-th stride (0-based), or `None` past the last one.
    pub fn locate_chunk_by_index(
        &self,
        source: &TextSource,
        chunk_index: usize,
    ) -> Result<Option<LoadedChunk>, ReaderError> {
        debug!("locate_chunk_by_index: source={}, chunk_index={}", source.name(), chunk_index);
        Ok(self.scan(source, ScanTarget::Chunk(chunk_index))?.chunk)
    }

    /// Returns the chunk starting at the first stride that reaches absolute line
    /// `target_line` (0-based), or `None` if the document has fewer lines.
    pub fn locate_by_line_number(
        &self,
        source: &TextSource,
        target_line: usize,
    ) -> Result<Option<LoadedChunk>, ReaderError> {
        debug!("locate_by_line_number: source={}, target_line={}", source.name(), target_line);
        Ok(self.scan(source, ScanTarget::Line(target_line))?.chunk)
    }

    /// Finds the first occurrence of the query's keyword after its start cursor and counts
    /// every occurrence in the document.
    pub fn locate_keyword(&self, source: &TextSource, query: &KeywordQuery) -> Result<KeywordSearch, ReaderError> {
        debug!(
            "locate_keyword: source={}, keyword_len={}, start={:?}",
            source.name(),
            query.char_len(),
            query.start()
        );
        let outcome = self.scan(source, ScanTarget::Keyword(query))?;
        let occurrence = match outcome.found {
            Some(found) => OccurrenceResult {
                found_position: Some(found.position),
                match_index: found.match_index,
                total_matches: outcome.total_matches,
            },
            None => OccurrenceResult {
                found_position: None,
                match_index: 0,
                total_matches: outcome.total_matches,
            },
        };
        Ok(KeywordSearch {
            chunk: outcome.chunk,
            occurrence,
        })
    }

    fn scan(&self, source: &TextSource, target: ScanTarget<'_>) -> Result<ScanOutcome, ReaderError> {
        let mut stream = source.open_chars()?;
        let probe_size = self.config.probe_size();
        // Widen keyword probes so a match straddling the stride boundary is still whole.
        let read_size = match target {
            ScanTarget::Keyword(query) => probe_size + query.char_len().saturating_sub(1),
            ScanTarget::Chunk(_) | ScanTarget::Line(_) => probe_size,
        };

        let mut outcome = ScanOutcome::default();
        let mut line_count: usize = 0;
        let mut stride: usize = 0;
        // Column of the stride's first character within its line.
        let mut column_base: usize = 0;

        while stream.ready()? {
            let peeked = stream.peek(read_size)?;
            let probe_len = peeked.len().min(probe_size);
            let probe: String = peeked[..probe_len].iter().collect();
            let window: Option<String> = (peeked.len() > probe_len).then(|| peeked.iter().collect());

            let probe_lines = split_lines(&probe);
            let breaks = probe_lines.len() - 1;
            let tail_len = probe_lines.last().map_or(0, |line| line.chars().count());

            let hit = match target {
                ScanTarget::Chunk(index) => stride == index,
                ScanTarget::Line(line) => line_count + breaks >= line,
                ScanTarget::Keyword(query) => {
                    let text = window.as_deref().unwrap_or(&probe);
                    scan_keyword_window(text, query, line_count, column_base, &mut outcome);
                    outcome.found.is_some()
                }
            };

            if hit && outcome.chunk.is_none() {
                outcome.chunk = Some(read_chunk(
                    &mut stream,
                    self.config.chunk_size,
                    line_count,
                    stride,
                    column_base,
                )?);
            }

            stream.skip(probe_size)?;
            line_count += breaks;
            column_base = if breaks == 0 { column_base + probe_len } else { tail_len };
            stride += 1;
        }

        if let Some(chunk) = outcome.chunk.as_mut() {
            chunk.total_chunks = stride;
        }

        debug!(
            "scan finished: source={}, strides={}, line_breaks={}, hit={}, total_matches={}",
            source.name(),
            stride,
            line_count,
            outcome.chunk.is_some(),
            outcome.total_matches
        );

        Ok(outcome)
    }
}

/// Peeks a full chunk at the current stride and splits it into lines.
fn read_chunk<R: Read>(
    stream: &mut CharStream<R>,
    chunk_size: usize,
    base_line_number: usize,
    chunk_index: usize,
    first_line_column: usize,
) -> Result<LoadedChunk, ReaderError> {
    let text: String = stream.peek(chunk_size)?.iter().collect();
    let lines: Vec<String> = split_lines(&text).into_iter().map(String::from).collect();

    debug!(
        "read_chunk: chunk_index={}, base_line_number={}, lines={}",
        chunk_index,
        base_line_number,
        lines.len()
    );

    Ok(LoadedChunk {
        lines,
        base_line_number,
        chunk_index,
        total_chunks: 0,
        first_line_column,
    })
}

/// Counts every match in one stride window and records the first one at or after the
/// query's cursor.
fn scan_keyword_window(
    text: &str,
    query: &KeywordQuery,
    line_count: usize,
    column_base: usize,
    outcome: &mut ScanOutcome,
) {
    for (index, line) in split_lines(text).into_iter().enumerate() {
        let absolute_line = line_count + index;
        let min_column = match outcome.found {
            Some(_) => None,
            None => query.start().min_column(absolute_line),
        };
        let Some(min_column) = min_column else {
            outcome.total_matches += count_occurrences(line, query.keyword());
            continue;
        };

        let columns = match_columns(line, query.keyword());
        let matches_before = outcome.total_matches;
        outcome.total_matches += columns.len();
        // Only the stride's first line can start mid-line.
        let shift = if index == 0 { column_base } else { 0 };

        if let Some(nth) = columns.iter().position(|&column| column + shift >= min_column) {
            outcome.found = Some(FoundMatch {
                position: LinePosition::new(absolute_line, columns[nth] + shift),
                match_index: matches_before + nth + 1,
            });
        }
    }
}
