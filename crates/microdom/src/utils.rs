//! Utility functions for text handling

use std::borrow::Cow;

/// Replace the predefined XML entities and numeric character references
///
/// Unknown or malformed references are left untouched.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match tail.find(';').and_then(|end| decode_entity(&tail[1..end]).map(|c| (end, c))) {
            Some((end, c)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Expand `%(key)s` placeholders and `%%` escapes
///
/// Keys `lookup` does not know, and any other `%` sequence, are copied
/// through unchanged. Borrows when nothing was replaced.
pub fn substitute_placeholders<'a, 'v, F>(text: &'a str, mut lookup: F) -> Cow<'a, str>
where
    F: FnMut(&str) -> Option<&'v str>,
{
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut changed = false;

    while let Some(pct) = rest.find('%') {
        out.push_str(&rest[..pct]);
        let tail = &rest[pct..];

        if tail.starts_with("%%") {
            out.push('%');
            rest = &tail[2..];
            changed = true;
            continue;
        }

        let placeholder = tail
            .strip_prefix("%(")
            .and_then(|body| body.find(")s").map(|end| (&body[..end], end + 4)))
            .and_then(|(key, len)| lookup(key).map(|value| (value, len)));

        match placeholder {
            Some((value, len)) => {
                out.push_str(value);
                rest = &tail[len..];
                changed = true;
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }

    if !changed {
        return Cow::Borrowed(text);
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
