//! Keyword occurrence matching within a single line.
//!
//! After a hit the search resumes one character past the hit's start, so occurrences may
//! overlap: `"aa"` occurs twice in `"aaa"` (columns 0 and 1) and three times in `"aaaa"`.
//! Every occurrence is identified by its start column alone, which keeps counts independent
//! of where a line is cut into stride windows.

/// Character columns of every occurrence of `keyword` in `line`, left to right.
pub fn match_columns(line: &str, keyword: &str) -> Vec<usize> {
    let mut columns = Vec::new();
    for_each_match(line, keyword, |column| columns.push(column));
    columns
}

/// Number of occurrences of `keyword` in `line`; `match_columns(..).len()` without the
/// allocation.
pub fn count_occurrences(line: &str, keyword: &str) -> usize {
    let mut count = 0;
    for_each_match(line, keyword, |_| count += 1);
    count
}

fn for_each_match(line: &str, keyword: &str, mut on_match: impl FnMut(usize)) {
    if keyword.is_empty() {
        return;
    }

    let mut byte = 0;
    let mut column = 0;
    let mut counted_to = 0;
    while let Some(found) = line[byte..].find(keyword) {
        let at = byte + found;
        column += line[counted_to..at].chars().count();
        counted_to = at;
        on_match(column);

        // Step past the first character of the hit only.
        let step = line[at..].chars().next().map_or(1, char::len_utf8);
        byte = at + step;
    }
}
