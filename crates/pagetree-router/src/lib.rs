//! # Pagetree Router
//!
//! Front-end request routing for a page tree that hosts several sites and languages.
//! Resolves a request path to a page plus its path parameters, and builds the
//! canonical path for a page and a parameter set:
//! - Language prefixes (`/en/news.html`, `/de-CH/news.html`)
//! - URL suffixes (`.html`)
//! - Flat (`news/page/2`) and folder-style (`news/archive/item`) aliases
//! - Shared aliases across domains and languages
//! - The auto-item parameter (`/news/my-article` → `auto_item = my-article`)
//!
//! ## Pipeline
//!
//! ```text
//! normalize_request → AliasMatcher → Disambiguator → transformers → FragmentBuilder
//!         │
//!         └── empty path → RootPageSelector
//! ```
//!
//! [`UrlComposer`] runs the other way and is the left inverse of the pipeline.
//!
//! Page data comes from a [`PageLookup`] implementation; [`MemoryPageStore`] keeps
//! a whole site in memory.
//!
//! ## Example
//!
//! ```
//! use pagetree_router::{
//!     MemoryPageStore, PageRecord, PageRouter, RequestContext, Resolution, RouterConfig,
//! };
//!
//! let store = MemoryPageStore::from_pages([
//!     PageRecord::root(1, "home", "example.org", "en").with_fallback(true),
//!     PageRecord::new(2, 1, "index"),
//!     PageRecord::new(3, 1, "events"),
//! ]);
//! let router = PageRouter::new(RouterConfig::default(), store);
//!
//! let request = RequestContext::new("/events/summer-party.html").with_host("example.org");
//! let Resolution::Page(resolved) = router.resolve(&request).unwrap() else {
//!     panic!("expected a page");
//! };
//! assert_eq!(resolved.page.id, 3);
//! assert_eq!(resolved.param("auto_item"), Some("summer-party"));
//!
//! let url = router.compose_url(&resolved.page, &resolved.params, &[]).unwrap();
//! assert_eq!(url.to_string(), "/events/summer-party.html");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod alias;
pub mod compose;
pub mod config;
pub mod disambiguate;
pub mod error;
pub mod fragment;
pub mod language;
pub mod lookup;
pub mod page;
pub mod path;
pub mod root;
pub mod router;

pub use alias::{AliasMatch, AliasMatcher};
pub use compose::{form_encode, CanonicalUrl, UrlComposer};
pub use config::{RouterConfig, SiteFile, UrlMode};
pub use disambiguate::{AliasCandidateSet, Disambiguator};
pub use error::{ErrorClass, Result, RouteError};
pub use fragment::{FragmentBuilder, FragmentTransformer, Fragments};
pub use language::{parse_accept_language, NO_PREFERENCE};
pub use lookup::{MemoLookup, MemoryPageStore, PageLookup};
pub use page::{PageRecord, PageType, Robots};
pub use path::{normalize_request, AliasHierarchy, Normalized, NormalizedPath};
pub use root::{Redirect, RedirectKind, RootPageSelector, RootRequest, RootSelection};
pub use router::{PageRouter, RequestContext, Resolution, ResolvedRequest};
