use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Comments and things shaped like tags; a bare `<` in prose is left alone.
pub(super) const TAG_PATTERN: &str = r"<!--(?s:.*?)-->|</?[A-Za-z][^<>]*>";

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(TAG_PATTERN).unwrap());
static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Project authored markup onto plain text: tags are dropped and the common
/// character entities decoded. Text without markup is borrowed unchanged.
pub fn plain_text(markup: &str) -> Cow<'_, str> {
    if !markup.contains('<') && !markup.contains('&') {
        return Cow::Borrowed(markup);
    }

    let stripped = TAG_REGEX.replace_all(markup, "");
    let decoded = ENTITY_REGEX.replace_all(&stripped, |caps: &regex::Captures| {
        decode_entity(&caps[1]).map_or_else(|| caps[0].to_string(), String::from)
    });

    Cow::Owned(decoded.into_owned())
}

fn decode_entity(name: &str) -> Option<char> {
    // a no-break space reads as a plain space, however it is spelled
    decode_named_or_numeric(name).map(|c| if c == '\u{00A0}' { ' ' } else { c })
}

fn decode_named_or_numeric(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = name.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }

    match name {
        "nbsp" => Some(' '),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "hellip" => Some('…'),
        _ => None,
    }
}

/// Regex source matching `literal` as it may be spelled in markup: each
/// character that the plain projection decodes also matches its entity forms.
pub(super) fn literal_pattern(literal: &str) -> String {
    let mut pattern = String::with_capacity(literal.len() * 2);
    for c in literal.chars() {
        let spellings: &[&str] = match c {
            ' ' | '\u{00A0}' => &[" ", "\u{00A0}", "&nbsp;", "&#160;", "&#xA0;", "&#xa0;"],
            '…' => &["…", "&hellip;", "&#8230;", "&#x2026;"],
            '&' => &["&amp;", "&#38;", "&"],
            '<' => &["&lt;", "&#60;", "<"],
            '>' => &["&gt;", "&#62;", ">"],
            '"' => &["&quot;", "&#34;", "\""],
            '\'' => &["&apos;", "&#39;", "'"],
            other => {
                pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4])));
                continue;
            }
        };
        pattern.push_str("(?:");
        pattern.push_str(
            &spellings
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<String>>()
                .join("|"),
        );
        pattern.push(')');
    }
    pattern
}

/// Escape text for insertion into HTML.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
