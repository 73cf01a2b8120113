//! Language codes in URLs and Accept-Language negotiation

use once_cell::sync::Lazy;
use regex::Regex;

/// `xx/rest` or `xx-XX/rest` at the start of a site-relative path
static LANGUAGE_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]{2}(?:-[A-Z]{2})?)/(.*)$").unwrap());

/// A bare language root such as `en/` or `de-CH/`
static LANGUAGE_ROOT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(?:-[A-Z]{2})?/$").unwrap());

/// Language list entry that matches no root language, forcing the fallback root
pub const NO_PREFERENCE: &str = "-";

/// Splits `en/news/item` into `("en", "news/item")`
///
/// Returns `None` when the path does not start with a language segment
/// followed by a slash.
///
/// # Examples
///
/// ```
/// use pagetree_router::language::split_language_prefix;
///
/// assert_eq!(split_language_prefix("de-CH/news"), Some(("de-CH", "news")));
/// assert_eq!(split_language_prefix("en/"), Some(("en", "")));
/// assert_eq!(split_language_prefix("en"), None);
/// assert_eq!(split_language_prefix("news/item"), None);
/// ```
pub fn split_language_prefix(path: &str) -> Option<(&str, &str)> {
    let captures = LANGUAGE_PREFIX_REGEX.captures(path)?;
    let language = captures.get(1)?.as_str();
    let rest = captures.get(2).map_or("", |m| m.as_str());
    Some((language, rest))
}

/// Whether `path` is only a language root (`en/`)
pub fn is_language_root(path: &str) -> bool {
    LANGUAGE_ROOT_REGEX.is_match(path)
}

/// Parses an Accept-Language header into an ordered language list
///
/// Entries are ordered by descending `q` weight (stable for equal weights),
/// entries with `q=0` are dropped, and the primary subtag of every regional
/// code is appended after the explicit entries (`de-CH` also yields `de`).
/// `*` is ignored.
///
/// # Examples
///
/// ```
/// use pagetree_router::language::parse_accept_language;
///
/// let langs = parse_accept_language("de-CH,en;q=0.8,fr;q=0");
/// assert_eq!(langs, vec!["de-CH", "en", "de"]);
/// ```
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut entries: Vec<(&str, f64)> = Vec::new();

    for part in header.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let mut pieces = part.split(';');
        let lang = pieces.next().unwrap_or("").trim();
        if lang.is_empty() || lang == "*" {
            continue;
        }

        let q = pieces
            .filter_map(|p| p.trim().strip_prefix("q="))
            .filter_map(|v| v.parse::<f64>().ok())
            .last()
            .unwrap_or(1.0);

        if q > 0.0 {
            entries.push((lang, q));
        }
    }

    // sort_by is stable, equal weights keep header order
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut languages: Vec<String> = entries.iter().map(|(lang, _)| normalize_tag(lang)).collect();

    let primaries: Vec<String> = languages
        .iter()
        .filter_map(|lang| lang.split_once('-').map(|(primary, _)| primary.to_string()))
        .collect();

    for primary in primaries {
        if !languages.contains(&primary) {
            languages.push(primary);
        }
    }

    languages
}

/// `EN-us` → `en-US`
fn normalize_tag(tag: &str) -> String {
    match tag.split_once('-') {
        Some((primary, region)) => {
            format!("{}-{}", primary.to_ascii_lowercase(), region.to_ascii_uppercase())
        }
        None => tag.to_ascii_lowercase(),
    }
}
