//! Text normalization for stems, options, and feedback.
//!
//! Two transforms are supported: stripping a leading `A) ` enumerator from
//! option text, and rewriting single-dollar inline math to the double-dollar
//! form. Neither can fail; malformed input is passed through unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

/// One uppercase letter, a closing parenthesis, one whitespace character.
static ENUMERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]\)\s").unwrap());

/// Normalize option text.
pub fn normalize_option(text: &str, strip_prefix: bool, convert_math: bool) -> String {
    let text = if strip_prefix {
        strip_enumerator(text)
    } else {
        text
    };
    normalize_general(text, convert_math)
}

/// Normalize stem or feedback text.
pub fn normalize_general(text: &str, convert_math: bool) -> String {
    if convert_math {
        convert_inline_math(text)
    } else {
        text.to_string()
    }
}

/// Remove one leading `A) `-style enumerator. Only the very start is checked.
pub fn strip_enumerator(text: &str) -> &str {
    match ENUMERATOR.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Rewrite every `$...$` span to `$$...$$`.
///
/// Existing `$$...$$` spans are copied verbatim. A single `$` only closes on
/// another lone `$`; if the next `$` starts a `$$` run, or there is none, the
/// opening `$` is copied as-is and scanning resumes after it. Applying this to
/// its own output returns the output unchanged.
pub fn convert_inline_math(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut rest = text;

    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(body) = tail.strip_prefix("$$") {
            let Some(end) = body.find("$$") else {
                out.push_str(tail);
                return out;
            };
            let span = 2 + end + 2;
            out.push_str(&tail[..span]);
            rest = &tail[span..];
        } else {
            let body = &tail[1..];
            let close = body
                .find('$')
                .filter(|&end| !body[end + 1..].starts_with('$'));
            let Some(end) = close else {
                out.push('$');
                rest = body;
                continue;
            };
            out.push_str("$$");
            out.push_str(&body[..end]);
            out.push_str("$$");
            rest = &body[end + 1..];
        }
    }

    out.push_str(rest);
    out
}
