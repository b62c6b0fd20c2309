//! Human-readable value formatting for expectation traces.
//!
//! Everything an error message quotes back at the user goes through
//! [`describe`]: strings come out single-quoted with control characters
//! escaped, collections are walked with a shrinking character budget and
//! truncated with a trailing `...` once the budget runs out.

use regex::Regex;
use serde_json::{Map, Value};

use crate::path::Accessor;

/// Collections never give a nested value less budget than this.
const MIN_LIMIT: usize = 16;

/// Default character budget for a rendered value.
pub const DEFAULT_LIMIT: usize = 80;

/// Renders a value with the default budget.
#[must_use]
pub fn describe(value: &Value) -> String {
    describe_with(value, DEFAULT_LIMIT)
}

/// Renders a value, truncating so the result stays close to `limit`
/// characters.
#[must_use]
pub fn describe_with(value: &Value, limit: usize) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => describe_number(n),
        Value::String(s) => string(s, limit),
        Value::Array(items) => array(items, limit),
        Value::Object(map) => object(map, limit),
    }
}

/// Renders a float without a trailing `.0` when it is a whole number, so
/// labels read `greater than 0` rather than `greater than 0.0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn describe_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        number(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn escape_char(c: char) -> String {
    match c {
        '\0' => "\\0".to_owned(),
        '\u{8}' => "\\b".to_owned(),
        '\t' => "\\t".to_owned(),
        '\n' => "\\n".to_owned(),
        '\u{b}' => "\\v".to_owned(),
        '\u{c}' => "\\f".to_owned(),
        '\r' => "\\r".to_owned(),
        '\'' => "\\'".to_owned(),
        '\\' => "\\\\".to_owned(),
        c if c <= '\u{1f}' || ('\u{7f}'..='\u{9f}').contains(&c) => {
            format!("\\x{:02x}", c as u32)
        }
        c => c.to_string(),
    }
}

/// Renders a string single-quoted with escapes, truncated to roughly
/// `limit` characters with a trailing `...` marker.
#[must_use]
pub fn string(s: &str, limit: usize) -> String {
    let mut pieces: Vec<String> = s.chars().take(limit).map(escape_char).collect();

    let mut length = pieces.iter().map(|p| p.chars().count()).sum::<usize>() + 2;
    if length <= limit {
        return format!("'{}'", pieces.concat());
    }

    length += 3;
    while length > limit {
        match pieces.pop() {
            Some(piece) => length -= piece.chars().count(),
            None => break,
        }
    }

    format!("'{}'...", pieces.concat())
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn array(items: &[Value], limit: usize) -> String {
    let mut pieces: Vec<String> = Vec::new();

    let mut rem = limit as i64 - 2;
    let last = items.len() as i64 - 1;
    let mut i: i64 = 0;
    while i <= last {
        let piece = describe_with(&items[i as usize], rem.max(MIN_LIMIT as i64) as usize);
        rem -= piece.chars().count() as i64;

        // the last element needs neither a ', ' separator nor room for '...'
        if i == last && rem >= 0 {
            pieces.push(piece);
            break;
        }

        rem -= 2;

        if rem < 3 {
            // lookahead: a short final element may still fit where '...' would go
            if i == last - 1 {
                let next =
                    describe_with(&items[(i + 1) as usize], rem.max(MIN_LIMIT as i64) as usize);
                if next.chars().count() as i64 <= rem {
                    pieces.push(piece);
                    pieces.push(next);
                    break;
                }
            }

            pieces.push("...".to_owned());
            break;
        }

        pieces.push(piece);
        i += 1;
    }

    format!("[{}]", pieces.join(", "))
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn object(map: &Map<String, Value>, limit: usize) -> String {
    let mut pieces: Vec<String> = Vec::new();

    let mut rem = limit as i64 - 2;
    let entries: Vec<(&String, &Value)> = map.iter().collect();
    let last = entries.len() as i64 - 1;
    let mut i: i64 = 0;
    while i <= last {
        let (key, value) = entries[i as usize];

        let shown_key = object_key(key, rem.max(MIN_LIMIT as i64) as usize);
        rem -= shown_key.chars().count() as i64 + 2;

        let shown_value = describe_with(value, rem.max(MIN_LIMIT as i64) as usize);
        rem -= shown_value.chars().count() as i64;

        let piece = format!("{shown_key}: {shown_value}");

        if i == last && rem >= 0 {
            pieces.push(piece);
            break;
        }

        rem -= 2;

        if rem < 3 {
            pieces.push("...".to_owned());
            break;
        }

        pieces.push(piece);
        i += 1;
    }

    format!("{{{}}}", pieces.join(", "))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Renders an accessor in property-trace form: `.key`, `['odd key']`,
/// `[3]` or `[*]`.
#[must_use]
pub fn accessor(accessor: &Accessor) -> String {
    match accessor {
        Accessor::Index(i) => format!("[{i}]"),
        Accessor::Dynamic => "[*]".to_owned(),
        Accessor::Key(key) => {
            if is_identifier(key) && key.chars().count() < DEFAULT_LIMIT {
                format!(".{key}")
            } else {
                format!("[{}]", string(key, DEFAULT_LIMIT))
            }
        }
    }
}

/// Renders an object key the way it would appear in an object literal.
#[must_use]
pub fn object_key(key: &str, limit: usize) -> String {
    if is_identifier(key) && key.chars().count() <= limit {
        key.to_owned()
    } else {
        string(key, limit)
    }
}

/// Renders a regular expression in `/pattern/` form.
#[must_use]
pub fn regexp(re: &Regex) -> String {
    let shown = format!("/{}/", re.as_str());
    if shown.chars().count() <= DEFAULT_LIMIT {
        shown
    } else {
        let head: String = shown.chars().take((DEFAULT_LIMIT - 6).max(1)).collect();
        format!("{head}/... /")
    }
}
