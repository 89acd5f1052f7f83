//! Free-text narrative decomposition.

/// One line of a narrative field after classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrativeLine {
    pub bullet: bool,
    pub content: String,
}

const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];

/// Split a narrative field into typed lines, preserving order and count.
///
/// A line whose first post-trim character is a bullet marker becomes a
/// bullet with the marker and the whitespace after it stripped. Every other
/// line passes through unchanged; blank lines become empty plain entries so
/// vertical spacing survives. Marker removal is one-way.
pub fn format_narrative(text: &str) -> Vec<NarrativeLine> {
    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let trimmed = line.trim_start();
            match trimmed.chars().next() {
                Some(marker) if BULLET_MARKERS.contains(&marker) => NarrativeLine {
                    bullet: true,
                    content: trimmed[marker.len_utf8()..].trim_start().to_string(),
                },
                _ => NarrativeLine {
                    bullet: false,
                    content: line.to_string(),
                },
            }
        })
        .collect()
}
