//! Request path normalization
//!
//! Turns the raw request path into the site-relative form the alias matcher works
//! on: no query string, decoded, no language segment, no URL suffix.
//!
//! Nothing here touches persistence.

use std::borrow::Cow;

use crate::config::RouterConfig;
use crate::error::{Result, RouteError};
use crate::language::{is_language_root, split_language_prefix};

pub mod hierarchy;
pub use hierarchy::AliasHierarchy;

/// Outcome of normalizing a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// A page path still to be matched against aliases
    Path(NormalizedPath),
    /// Only the site (or language) root was requested
    DeferToRoot { language: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Site-relative path without language segment and suffix (`news/archive/item`)
    pub path: String,
    /// Language taken from the URL prefix
    pub language: Option<String>,
}

/// Strips the query string and one leading slash
///
/// # Examples
///
/// ```
/// use pagetree_router::path::relative_request;
///
/// assert_eq!(relative_request("/news/item.html?page=2"), "news/item.html");
/// assert_eq!(relative_request("news"), "news");
/// assert_eq!(relative_request("/?a=b"), "");
/// ```
pub fn relative_request(raw: &str) -> &str {
    let without_query = raw.split_once('?').map_or(raw, |(path, _)| path);
    without_query.strip_prefix('/').unwrap_or(without_query)
}

/// Percent-decodes a path without treating `+` as a space
pub fn raw_decode(input: &str) -> Result<Cow<'_, str>> {
    urlencoding::decode(input)
        .map_err(|_| RouteError::invalid(format!("path is not valid UTF-8 after decoding: {input}")))
}

/// Normalizes a raw request path
///
/// # Steps
///
/// 1. Drop the query string and the leading slash
/// 2. Percent-decode
/// 3. Reject the literal auto-item marker segment
/// 4. Take off the language segment when language prefixes are enabled
/// 5. Take off the URL suffix (unless only a language root remains)
/// 6. Reject a path that is exactly `/`
///
/// # Examples
///
/// ```
/// use pagetree_router::{RouterConfig, path::{normalize_request, Normalized}};
///
/// let config = RouterConfig::default().with_language_prefix(true);
///
/// match normalize_request("/en/news/item.html", &config).unwrap() {
///     Normalized::Path(p) => {
///         assert_eq!(p.path, "news/item");
///         assert_eq!(p.language.as_deref(), Some("en"));
///     }
///     other => panic!("unexpected {:?}", other),
/// }
///
/// assert_eq!(
///     normalize_request("/en/", &config).unwrap(),
///     Normalized::DeferToRoot { language: Some("en".to_string()) }
/// );
/// ```
pub fn normalize_request(raw: &str, config: &RouterConfig) -> Result<Normalized> {
    let relative = relative_request(raw);

    if relative.is_empty() {
        return Ok(Normalized::DeferToRoot { language: None });
    }

    let decoded = raw_decode(relative)?;

    let marker = format!("/{}/", config.auto_item_key);
    if decoded.contains(&marker) {
        return Err(RouteError::invalid(format!(
            "request contains the reserved segment \"{}\"",
            config.auto_item_key
        )));
    }

    let (language, mut request) = if config.add_language_to_url {
        match split_language_prefix(&decoded) {
            Some((language, "")) => {
                return Ok(Normalized::DeferToRoot {
                    language: Some(language.to_string()),
                })
            }
            Some((language, rest)) => (Some(language.to_string()), rest.to_string()),
            None => return Err(RouteError::invalid("language could not be determined")),
        }
    } else {
        (None, decoded.into_owned())
    };

    let bare_language_root = config.add_language_to_url && is_language_root(&request);

    if !bare_language_root && !config.url_suffix.is_empty() {
        match request.strip_suffix(config.url_suffix.as_str()) {
            Some(stripped) => request = stripped.to_string(),
            None => {
                return Err(RouteError::invalid(format!(
                    "URL suffix \"{}\" does not match",
                    config.url_suffix
                )))
            }
        }
    }

    if request == "/" {
        return Err(RouteError::invalid("empty alias in \"/\""));
    }

    if request.is_empty() {
        return Ok(Normalized::DeferToRoot { language });
    }

    Ok(Normalized::Path(NormalizedPath {
        path: request,
        language,
    }))
}
