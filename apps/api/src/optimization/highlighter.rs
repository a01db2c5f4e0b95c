//! Keyword highlighting for rewritten text.
//!
//! Keywords are wrapped longest first so a shorter keyword never splits a
//! longer phrase that contains it. Matching is case-sensitive and whole-word,
//! and text already inside a marker is never touched, which makes
//! `highlight` idempotent.

use regex::Regex;

pub const MARKER_OPEN: &str = "<span class='highlighted-keyword'>";
pub const MARKER_CLOSE: &str = "</span>";

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Plain(String),
    Marked(String),
}

/// Wraps every whole-word occurrence of each keyword in a highlight marker.
pub fn highlight(text: &str, keywords: &[String]) -> String {
    let mut ordered: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    // Stable sort keeps priority order among keywords of equal length.
    ordered.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let patterns: Vec<Regex> = ordered.iter().filter_map(|k| keyword_pattern(k)).collect();

    let mut segments = parse_segments(text);
    // Wrapping can expose a new match at a fresh segment edge, so repeat until
    // a full pass changes nothing.
    loop {
        let mut changed = false;
        for pattern in &patterns {
            changed |= wrap_matches(&mut segments, pattern);
        }
        if !changed {
            break;
        }
    }

    render(&segments)
}

/// Removes highlight markers, returning the plain text.
pub fn strip_markers(text: &str) -> String {
    parse_segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(s) | Segment::Marked(s) => s,
        })
        .collect()
}

/// Whole-word pattern for a literal keyword. Word boundaries are only asserted
/// on edges that are word characters, so keywords like "C++" still match.
fn keyword_pattern(keyword: &str) -> Option<Regex> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let first = keyword.chars().next()?;
    let last = keyword.chars().last()?;

    let pattern = format!(
        "{}{}{}",
        if is_word(first) { r"\b" } else { "" },
        regex::escape(keyword),
        if is_word(last) { r"\b" } else { "" },
    );
    Regex::new(&pattern).ok()
}

/// Splits text into plain runs and runs already wrapped in a marker.
/// An opening marker with no closing marker is treated as plain text.
fn parse_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(MARKER_OPEN) {
        let inner_start = open + MARKER_OPEN.len();
        let Some(close) = rest[inner_start..].find(MARKER_CLOSE) else {
            break;
        };
        if open > 0 {
            segments.push(Segment::Plain(rest[..open].to_string()));
        }
        segments.push(Segment::Marked(
            rest[inner_start..inner_start + close].to_string(),
        ));
        rest = &rest[inner_start + close + MARKER_CLOSE.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Plain(rest.to_string()));
    }
    segments
}

/// Wraps matches of `pattern` found in plain segments. Returns whether anything changed.
fn wrap_matches(segments: &mut Vec<Segment>, pattern: &Regex) -> bool {
    let mut changed = false;
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments.drain(..) {
        let plain = match segment {
            Segment::Plain(s) => s,
            marked => {
                out.push(marked);
                continue;
            }
        };

        let mut last = 0;
        for m in pattern.find_iter(&plain) {
            if m.start() > last {
                out.push(Segment::Plain(plain[last..m.start()].to_string()));
            }
            out.push(Segment::Marked(m.as_str().to_string()));
            last = m.end();
            changed = true;
        }
        if last < plain.len() {
            out.push(Segment::Plain(plain[last..].to_string()));
        }
    }

    *segments = out;
    changed
}

fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Plain(s) => out.push_str(s),
            Segment::Marked(s) => {
                out.push_str(MARKER_OPEN);
                out.push_str(s);
                out.push_str(MARKER_CLOSE);
            }
        }
    }
    out
}
