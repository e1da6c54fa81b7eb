use std::sync::LazyLock;
use regex::{Captures, Regex};

/// Elements removed together with their content before text or links are read.
pub const BLOCK_ELEMENTS: [&str; 6] = ["head", "style", "script", "noscript", "iframe", "svg"];

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^<]*?>").unwrap());

static ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&([^;\s&]+);").unwrap());

static ELEMENTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BLOCK_ELEMENTS
        .iter()
        .map(|name| Regex::new(&format!(r"(?is)<\b{name}\b.*?</{name}\s*>")).unwrap())
        .collect()
});

pub fn strip_comments(html: &str) -> String {
    COMMENT.replace_all(html, "").into_owned()
}

pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Decodes numeric and common named entities; anything else that looks like an
/// entity is dropped.
pub fn strip_entities(html: &str) -> String {
    ENTITY
        .replace_all(html, |caps: &Captures| decode_entity(&caps[1]).map(String::from).unwrap_or_default())
        .into_owned()
}

/// Removes comments, then the block elements in `BLOCK_ELEMENTS`. Tags are kept so
/// links can still be extracted from the result.
pub fn strip_block_elements(html: &str) -> String {
    let mut cleaned = strip_comments(html);
    for element in ELEMENTS.iter() {
        cleaned = element.replace_all(&cleaned, "").into_owned();
    }
    cleaned
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let decoded = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "deg" => '°',
        "middot" => '·',
        "bull" => '•',
        "hellip" => '…',
        "ndash" => '–',
        "mdash" => '—',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "laquo" => '«',
        "raquo" => '»',
        "times" => '×',
        "divide" => '÷',
        "euro" => '€',
        "pound" => '£',
        "yen" => '¥',
        "cent" => '¢',
        "sect" => '§',
        "para" => '¶',
        "eacute" => 'é',
        "egrave" => 'è',
        "aacute" => 'á',
        "agrave" => 'à',
        "ouml" => 'ö',
        "uuml" => 'ü',
        "auml" => 'ä',
        "ccedil" => 'ç',
        "ntilde" => 'ñ',
        _ => return None,
    };
    Some(decoded)
}
