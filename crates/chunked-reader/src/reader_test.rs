//! Tests for ChunkedLineReader.

use super::{
    ChunkedLineReader, KeywordQuery, LinePosition, ReaderConfig, ReaderError, SearchStart, TextEncoding, TextSource,
};

fn reader() -> ChunkedLineReader {
    ChunkedLineReader::default()
}

/// Reader with a tiny chunk so short documents span several strides.
fn small_reader(chunk_size: usize) -> ChunkedLineReader {
    ChunkedLineReader::new(ReaderConfig {
        chunk_size,
        ..ReaderConfig::default()
    })
}

fn source(text: &str) -> TextSource {
    TextSource::memory("test.txt", text.as_bytes(), TextEncoding::Utf8)
}

fn query(reader: &ChunkedLineReader, keyword: &str, start: SearchStart) -> KeywordQuery {
    KeywordQuery::new(keyword, start, reader.config()).unwrap()
}

#[test]
fn first_chunk_of_small_document() {
    let chunk = reader()
        .locate_chunk_by_index(&source("line 1\nline 2\nline 3\n"), 0)
        .unwrap()
        .unwrap();

    assert_eq!(chunk.lines, vec!["line 1", "line 2", "line 3", ""]);
    assert_eq!(chunk.base_line_number, 0);
    assert_eq!(chunk.chunk_index, 0);
    assert_eq!(chunk.total_chunks, 1);
    assert_eq!(chunk.first_line_column, 0);
}

#[test]
fn chunk_index_past_end_is_not_found() {
    let result = reader().locate_chunk_by_index(&source("a\nb\n"), 1).unwrap();
    assert!(result.is_none());
}

#[test]
fn empty_document_has_no_chunks() {
    let empty = source("");
    assert!(reader().locate_chunk_by_index(&empty, 0).unwrap().is_none());
    assert!(reader().locate_by_line_number(&empty, 0).unwrap().is_none());
}

#[test]
fn strides_walk_half_chunks() {
    // Probe size 2 over "ab\ncd\nef": strides start at characters 0, 2, 4 and 6.
    let reader = small_reader(4);
    let doc = source("ab\ncd\nef");

    let first = reader.locate_chunk_by_index(&doc, 0).unwrap().unwrap();
    assert_eq!(first.lines, vec!["ab", "c"]);
    assert_eq!(first.base_line_number, 0);
    assert_eq!(first.total_chunks, 4);

    let second = reader.locate_chunk_by_index(&doc, 1).unwrap().unwrap();
    assert_eq!(second.lines, vec!["", "cd", ""]);
    assert_eq!(second.base_line_number, 0);
    assert_eq!(second.first_line_column, 2);

    let third = reader.locate_chunk_by_index(&doc, 2).unwrap().unwrap();
    assert_eq!(third.lines, vec!["d", "ef"]);
    assert_eq!(third.base_line_number, 1);
    assert_eq!(third.first_line_column, 1);

    let last = reader.locate_chunk_by_index(&doc, 3).unwrap().unwrap();
    assert_eq!(last.lines, vec!["ef"]);
    assert_eq!(last.base_line_number, 2);

    assert!(reader.locate_chunk_by_index(&doc, 4).unwrap().is_none());
}

#[test]
fn line_number_picks_first_stride_reaching_it() {
    let reader = small_reader(4);
    let doc = source("ab\ncd\nef");

    let chunk = reader.locate_by_line_number(&doc, 2).unwrap().unwrap();
    assert_eq!(chunk.chunk_index, 2);
    assert_eq!(chunk.base_line_number, 1);
    assert_eq!(chunk.row_of(2), Some(1));
    assert_eq!(chunk.lines[1], "ef");

    assert!(reader.locate_by_line_number(&doc, 3).unwrap().is_none());
}

#[test]
fn line_number_in_single_chunk_document() {
    let chunk = reader()
        .locate_by_line_number(&source("a\nb\nc\nd\ne"), 3)
        .unwrap()
        .unwrap();
    assert_eq!(chunk.base_line_number, 0);
    assert_eq!(chunk.lines[3], "d");
    assert_eq!(chunk.display_line_number(3), 4);
}

#[test]
fn line_number_far_past_end_is_not_found() {
    let result = reader()
        .locate_by_line_number(&source("a\nb\nc\nd\ne"), 1_000_000)
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn pagination_tiles_ten_lines() {
    let text: Vec<String> = (0..10).map(|i| format!("line{}", i)).collect();
    let doc = source(&text.join("\n"));
    let reader = small_reader(16);

    let mut previous: Option<(usize, usize)> = None;
    let mut index = 0;
    let mut last_line = 0;
    while let Some(chunk) = reader.locate_chunk_by_index(&doc, index).unwrap() {
        if let Some((base, len)) = previous {
            assert!(chunk.base_line_number >= base);
            assert!(chunk.base_line_number < base + len);
        } else {
            assert_eq!(chunk.base_line_number, 0);
        }
        previous = Some((chunk.base_line_number, chunk.lines.len()));
        last_line = chunk.absolute_line(chunk.lines.len() - 1);
        index += 1;
    }

    // 59 characters in strides of 8.
    assert_eq!(index, 8);
    assert_eq!(last_line, 9);
}

#[test]
fn keyword_scenario_resumes_after_previous_match() {
    let reader = reader();
    let doc = source("alpha\nbeta\nalpha\n");

    let first = reader
        .locate_keyword(&doc, &query(&reader, "alpha", SearchStart::Beginning))
        .unwrap();
    assert_eq!(first.occurrence.found_position, Some(LinePosition::new(0, 0)));
    assert_eq!(first.occurrence.match_index, 1);
    assert_eq!(first.occurrence.total_matches, 2);
    assert!(first.chunk.is_some());

    let second = reader
        .locate_keyword(&doc, &query(&reader, "alpha", SearchStart::After(LinePosition::new(0, 0))))
        .unwrap();
    assert_eq!(second.occurrence.found_position, Some(LinePosition::new(2, 0)));
    assert_eq!(second.occurrence.match_index, 2);
    assert_eq!(second.occurrence.total_matches, 2);

    let third = reader
        .locate_keyword(&doc, &query(&reader, "alpha", SearchStart::After(LinePosition::new(2, 0))))
        .unwrap();
    assert!(third.chunk.is_none());
    assert_eq!(third.occurrence.found_position, None);
    assert_eq!(third.occurrence.match_index, 0);
    assert_eq!(third.occurrence.total_matches, 2);
}

#[test]
fn resume_never_returns_the_cursor_itself() {
    let reader = reader();
    let doc = source("x\nx\naaxaaxx\n");

    let next = reader
        .locate_keyword(&doc, &query(&reader, "x", SearchStart::After(LinePosition::new(2, 5))))
        .unwrap();
    assert_eq!(next.occurrence.found_position, Some(LinePosition::new(2, 6)));
    assert_eq!(next.occurrence.match_index, 5);
    assert_eq!(next.occurrence.total_matches, 5);

    let done = reader
        .locate_keyword(&doc, &query(&reader, "x", SearchStart::After(LinePosition::new(2, 6))))
        .unwrap();
    assert_eq!(done.occurrence.found_position, None);
}

#[test]
fn search_from_line_ignores_earlier_matches_but_counts_them() {
    let reader = reader();
    let result = reader
        .locate_keyword(&source("ab\nab\nab"), &query(&reader, "ab", SearchStart::Line(1)))
        .unwrap();
    assert_eq!(result.occurrence.found_position, Some(LinePosition::new(1, 0)));
    assert_eq!(result.occurrence.match_index, 2);
    assert_eq!(result.occurrence.total_matches, 3);
}

#[test]
fn repeated_keyword_matches_overlap() {
    let reader = reader();
    let doc = source("aaa");

    let first = reader
        .locate_keyword(&doc, &query(&reader, "aa", SearchStart::Beginning))
        .unwrap();
    assert_eq!(first.occurrence.found_position, Some(LinePosition::new(0, 0)));
    assert_eq!(first.occurrence.total_matches, 2);

    let second = reader
        .locate_keyword(&doc, &query(&reader, "aa", SearchStart::After(LinePosition::new(0, 0))))
        .unwrap();
    assert_eq!(second.occurrence.found_position, Some(LinePosition::new(0, 1)));
    assert_eq!(second.occurrence.match_index, 2);
    assert_eq!(second.occurrence.total_matches, 2);
}

#[test]
fn overlapping_totals_do_not_depend_on_chunk_size() {
    let doc = source("aaaaa\nxaaay\naa");
    for chunk_size in [2, 3, 4, 5, 6, 8, 11, 64] {
        let reader = small_reader(chunk_size);
        let mut walked = Vec::new();
        let mut start = SearchStart::Beginning;
        loop {
            let result = reader.locate_keyword(&doc, &query(&reader, "aa", start)).unwrap();
            assert_eq!(result.occurrence.total_matches, 7, "chunk_size={}", chunk_size);
            let Some(position) = result.occurrence.found_position else {
                break;
            };
            assert_eq!(result.occurrence.match_index, walked.len() + 1, "chunk_size={}", chunk_size);
            walked.push((position.line, position.offset));
            start = SearchStart::After(position);
        }
        assert_eq!(
            walked,
            vec![(0, 0), (0, 1), (0, 2), (0, 3), (1, 1), (1, 2), (2, 0)],
            "chunk_size={}",
            chunk_size
        );
    }
}

#[test]
fn match_straddling_stride_boundary_is_counted_once() {
    // Probe size 2: "ab" starts at character 1 and ends past the first probe.
    let reader = small_reader(4);
    let result = reader
        .locate_keyword(&source("xaby"), &query(&reader, "ab", SearchStart::Beginning))
        .unwrap();
    assert_eq!(result.occurrence.found_position, Some(LinePosition::new(0, 1)));
    assert_eq!(result.occurrence.total_matches, 1);
    assert_eq!(result.chunk.unwrap().chunk_index, 0);
}

#[test]
fn match_on_long_line_reports_true_column() {
    let reader = small_reader(4);
    let result = reader
        .locate_keyword(&source("abcdefk"), &query(&reader, "k", SearchStart::Beginning))
        .unwrap();
    assert_eq!(result.occurrence.found_position, Some(LinePosition::new(0, 6)));

    let chunk = result.chunk.unwrap();
    assert_eq!(chunk.chunk_index, 3);
    assert_eq!(chunk.first_line_column, 6);
    assert_eq!(chunk.total_chunks, 4);
}

#[test]
fn keyword_validation() {
    let config = ReaderConfig {
        keyword_max_length: 3,
        ..ReaderConfig::default()
    };
    assert_eq!(
        KeywordQuery::new("", SearchStart::Beginning, &config),
        Err(ReaderError::EmptyKeyword)
    );
    assert_eq!(
        KeywordQuery::new("abcd", SearchStart::Beginning, &config),
        Err(ReaderError::KeywordTooLong { length: 4, max: 3 })
    );
    assert!(KeywordQuery::new("abc", SearchStart::Beginning, &config).is_ok());
}

#[test]
fn missing_file_is_stream_unavailable() {
    let missing = TextSource::file("/nonexistent_chunked_reader_test.txt", TextEncoding::Utf8);
    let result = reader().locate_chunk_by_index(&missing, 0);
    assert!(matches!(result, Err(ReaderError::StreamUnavailable(_))));
}

#[test]
fn reads_utf16le_source() {
    let bytes: Vec<u8> = "one\ntwo".encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect();
    let doc = TextSource::memory("wide.txt", bytes, TextEncoding::Utf16Le);

    let chunk = reader().locate_by_line_number(&doc, 1).unwrap().unwrap();
    assert_eq!(chunk.lines, vec!["one", "two"]);
}

#[test]
fn long_lines_are_not_collapsible() {
    let long = "x".repeat(20);
    let chunk = reader()
        .locate_chunk_by_index(&source(&format!("short\n{}", long)), 0)
        .unwrap()
        .unwrap();
    assert!(chunk.is_collapsible(0, 20));
    assert!(!chunk.is_collapsible(1, 20));
    assert!(!chunk.is_collapsible(5, 20));
}
