//! Query string tokenizer and value parsers.

use alloc::string::String;
use alloc::vec::Vec;

use super::ParseWarning;
use crate::gallery::{Direction, GalleryOptions, Setting};

/// Values seen so far. `Some(Setting::Auto)` means the key was given as
/// `auto`, which still counts for duplicate detection.
#[derive(Default)]
struct Seen {
    direction: Option<Direction>,
    columns: Option<Setting<usize>>,
    max_node_search: Option<Setting<usize>>,
    target_row_height: Option<f64>,
    margin: Option<f64>,
}

/// Parse a query string into options + warnings.
pub(crate) fn parse_query(query: &str) -> (GalleryOptions, Vec<ParseWarning>) {
    let mut seen = Seen::default();
    let mut warnings = Vec::new();

    for pair in split_query(query) {
        let (raw_key, raw_value) = split_pair(pair);
        let key = percent_decode(raw_key).to_ascii_lowercase();
        let value = percent_decode(raw_value);
        dispatch_key(&key, &value, &mut seen, &mut warnings);
    }

    let mut options = GalleryOptions::new();
    if let Some(d) = seen.direction {
        options.direction = d;
    }
    if let Some(c) = seen.columns {
        options.columns = c;
    }
    if let Some(m) = seen.max_node_search {
        options.max_node_search = m;
    }
    if let Some(h) = seen.target_row_height {
        options.target_row_height = Setting::Fixed(h);
    }
    if let Some(m) = seen.margin {
        options.margin = m;
    }
    (options, warnings)
}

fn dispatch_key(key: &str, value: &str, seen: &mut Seen, warnings: &mut Vec<ParseWarning>) {
    match key {
        "direction" => match Direction::parse(value.trim()) {
            Some(d) => set_or_warn(&mut seen.direction, d, key, value, warnings),
            None => invalid("direction", value, "expected row|column", warnings),
        },
        "columns" | "cols" => match parse_count(value) {
            Some(c) => set_or_warn(&mut seen.columns, c, key, value, warnings),
            None => invalid("columns", value, "expected a positive integer or auto", warnings),
        },
        "maxnodesearch" | "limitnodesearch" => match parse_count(value) {
            Some(n) => set_or_warn(&mut seen.max_node_search, n, key, value, warnings),
            None => invalid(
                "maxnodesearch",
                value,
                "expected a positive integer or auto",
                warnings,
            ),
        },
        "targetrowheight" | "rowheight" => match parse_f64(value).filter(|&h| h > 0.0) {
            Some(h) => set_or_warn(&mut seen.target_row_height, h, key, value, warnings),
            None => invalid(
                "targetrowheight",
                value,
                "expected a positive number",
                warnings,
            ),
        },
        "margin" | "spacing" => match parse_f64(value).filter(|&m| m >= 0.0) {
            Some(m) => set_or_warn(&mut seen.margin, m, key, value, warnings),
            None => invalid("margin", value, "expected a non-negative number", warnings),
        },
        _ => warnings.push(ParseWarning::KeyNotRecognized {
            key: String::from(key),
            value: String::from(value),
        }),
    }
}

/// Set a field, warning on duplicate.
fn set_or_warn<T>(
    field: &mut Option<T>,
    parsed: T,
    key: &str,
    value: &str,
    warnings: &mut Vec<ParseWarning>,
) {
    if field.is_some() {
        warnings.push(ParseWarning::DuplicateKey {
            key: String::from(key),
            value: String::from(value),
        });
    }
    *field = Some(parsed);
}

fn invalid(
    key: &'static str,
    value: &str,
    reason: &'static str,
    warnings: &mut Vec<ParseWarning>,
) {
    warnings.push(ParseWarning::ValueInvalid {
        key,
        value: String::from(value),
        reason,
    });
}

// ---- Value parsers ----

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Positive integer, or `auto` for the width-tiered default.
fn parse_count(s: &str) -> Option<Setting<usize>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("auto") {
        return Some(Setting::Auto);
    }
    s.parse::<usize>()
        .ok()
        .filter(|&v| v > 0)
        .map(Setting::Fixed)
}

// ---- Query string tokenizer ----

/// Split query string on '&', skipping empty segments.
fn split_query(query: &str) -> impl Iterator<Item = &str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').filter(|s| !s.is_empty())
}

/// Split a single "key=value" pair on the first '='.
fn split_pair(pair: &str) -> (&str, &str) {
    pair.split_once('=').unwrap_or((pair, ""))
}

/// Percent-decode a URL component. Also handles '+' as space. Invalid UTF-8
/// is replaced rather than rejected.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
