/// Splits a script file into lines, dropping a leading byte order mark.
pub fn script_lines(text: &str) -> Vec<&str> {
    text.trim_start_matches('\u{feff}').lines().collect()
}

/// Returns the non-blank lines between `*block_id` and `**block_id`.
///
/// Only the first occurrence of each marker counts. A missing marker, or an
/// end marker at or before the start marker, yields no lines.
pub fn extract<'a, S: AsRef<str>>(lines: &'a [S], block_id: &str) -> Vec<&'a str> {
    let start_marker = format!("*{}", block_id);
    let end_marker = format!("**{}", block_id);

    let start = lines
        .iter()
        .position(|line| line.as_ref().trim() == start_marker);
    let end = lines
        .iter()
        .position(|line| line.as_ref().trim() == end_marker);

    match (start, end) {
        (Some(s), Some(e)) if e > s => lines[s + 1..e]
            .iter()
            .map(|line| line.as_ref())
            .filter(|line| !line.trim().is_empty())
            .collect(),
        _ => Vec::new(),
    }
}
