//! Fragment handling
//!
//! Fragments are the `/`-separated pieces of a request after alias matching, with the
//! alias itself in front: `[alias, key, value, key, value, ...]`.
//!
//! Between alias matching and parameter extraction the router runs an ordered list
//! of [`FragmentTransformer`]s; each one receives the fragment list and returns the
//! list the next stage sees.

use std::collections::HashSet;

use crate::config::RouterConfig;
use crate::error::{Result, RouteError};

/// A pipeline stage rewriting the fragment list
pub type FragmentTransformer = Box<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

/// Applies transformers in order
pub fn apply_transformers(fragments: Vec<String>, transformers: &[FragmentTransformer]) -> Vec<String> {
    transformers
        .iter()
        .fold(fragments, |fragments, transform| transform(fragments))
}

/// Alias plus extracted parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    pub alias: String,
    /// Decoded parameters in encounter order, keys unique
    pub params: Vec<(String, String)>,
}

/// Decodes a key or value the way query strings are decoded (`+` is a space)
pub fn form_decode(input: &str) -> Result<String> {
    let spaced = input.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RouteError::invalid(format!("fragment is not valid UTF-8 after decoding: {input}")))
}

/// Turns fragments into key/value parameters
pub struct FragmentBuilder<'c> {
    config: &'c RouterConfig,
}

impl<'c> FragmentBuilder<'c> {
    pub fn new(config: &'c RouterConfig) -> Self {
        Self { config }
    }

    /// Inserts the auto-item key at index 1 when enabled and the fragment count is even
    pub fn insert_auto_item(&self, mut fragments: Vec<String>) -> Vec<String> {
        if self.config.use_auto_item && !fragments.is_empty() && fragments.len() % 2 == 0 {
            fragments.insert(1, self.config.auto_item_key.clone());
        }
        fragments
    }

    /// Builds the parameter list
    ///
    /// `taken` lists keys already occupied by the request (the URL language);
    /// reusing one of them counts as a duplicate.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when the alias is empty but more fragments follow
    /// - `DuplicateParameter` when a key appears twice
    /// - `ReservedKeyCollision` when a reserved auto-item key is used as a key
    pub fn build(&self, fragments: Vec<String>, taken: &[&str]) -> Result<Fragments> {
        let fragments = self.insert_auto_item(fragments);

        if fragments.first().map_or(true, String::is_empty) && fragments.len() > 1 {
            return Err(RouteError::invalid("empty alias with further fragments"));
        }

        let mut seen: HashSet<String> = taken.iter().map(|k| k.to_string()).collect();
        let mut params = Vec::with_capacity(fragments.len() / 2);

        for pair in fragments.get(1..).unwrap_or_default().chunks(2) {
            let raw_key = &pair[0];

            // A blank key is a deliberate separator
            if raw_key.is_empty() {
                continue;
            }

            let key = form_decode(raw_key)?;
            let value = form_decode(pair.get(1).map_or("", String::as_str))?;

            if seen.contains(&key) {
                return Err(RouteError::DuplicateParameter(key));
            }

            if self.config.use_auto_item && self.config.is_reserved_key(&key) {
                return Err(RouteError::ReservedKeyCollision(key));
            }

            seen.insert(key.clone());
            params.push((key, value));
        }

        let alias = fragments.into_iter().next().unwrap_or_default();
        Ok(Fragments { alias, params })
    }
}
