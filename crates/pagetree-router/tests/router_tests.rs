//! Integration tests for the request router
//!
//! Each section exercises one stage of the pipeline through the public
//! `PageRouter` API, backed by an in-memory page tree.

use pagetree_router::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// Fixtures
// ============================================================================

fn site() -> MemoryPageStore {
    MemoryPageStore::from_pages([
        PageRecord::root(1, "home", "", "en").with_fallback(true),
        PageRecord::new(2, 1, "index"),
        PageRecord::new(3, 1, "news"),
        PageRecord::new(4, 1, ""),
        PageRecord::new(5, 3, "news/archive"),
    ])
}

fn params(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn sorted(mut params: Vec<(String, String)>) -> Vec<(String, String)> {
    params.sort();
    params
}

fn expect_page(resolution: Resolution) -> ResolvedRequest {
    match resolution {
        Resolution::Page(resolved) => resolved,
        other => panic!("expected a page, got {:?}", other),
    }
}

// ============================================================================
// Round trip: resolve(compose(page, params)) == (page, params)
// ============================================================================

#[rstest]
#[case::no_params(&[])]
#[case::single_pair(&[("page", "2")])]
#[case::auto_item_and_pair(&[("auto_item", "summer-party"), ("page", "3")])]
#[case::slashes_and_spaces(&[("q", "a/b c"), ("sort", "100%+")])]
#[case::unicode_auto_item(&[("auto_item", "ümlaut & co"), ("year", "2024"), ("month", "06")])]
#[case::encoded_key(&[("key with space", "v")])]
fn test_compose_then_resolve_round_trips(
    #[case] input: &[(&str, &str)],
    #[values(false, true)] language_prefix: bool,
    #[values(3, 4)] page_id: u64,
) {
    let config = RouterConfig::default().with_language_prefix(language_prefix);
    let router = PageRouter::new(config, site());
    let page = router.lookup().get(page_id).unwrap().clone();

    let url = router.compose_url(&page, &params(input), &[]).unwrap();
    let resolved = expect_page(router.resolve(&RequestContext::new(url.to_string())).unwrap());

    assert_eq!(resolved.page.id, page_id, "url {}", url);
    assert_eq!(sorted(resolved.params), sorted(params(input)), "url {}", url);
}

#[test]
fn test_round_trip_hierarchical_alias() {
    let config = RouterConfig::default().with_url_mode(UrlMode::Hierarchical);
    let router = PageRouter::new(config, site());
    let archive = router.lookup().get(5).unwrap().clone();
    let input = params(&[("auto_item", "42"), ("year", "2023")]);

    let url = router.compose_url(&archive, &input, &[]).unwrap();
    assert_eq!(url.to_string(), "/news/archive/42/year/2023.html");

    let resolved = expect_page(router.resolve(&RequestContext::new(url.to_string())).unwrap());
    assert_eq!(resolved.page.id, 5);
    assert_eq!(sorted(resolved.params), sorted(input));
}

// ============================================================================
// Fragment rules
// ============================================================================

#[test]
fn test_duplicate_parameter_rejected() {
    let config = RouterConfig::default().with_url_suffix("");
    let router = PageRouter::new(config, site());

    let err = router
        .resolve(&RequestContext::new("/news/category/foo/category/bar"))
        .unwrap_err();

    assert!(matches!(err, RouteError::DuplicateParameter(ref key) if key == "category"));
    assert_eq!(err.class(), ErrorClass::Request);
}

#[test]
fn test_reserved_key_rejected() {
    let router = PageRouter::new(RouterConfig::default(), site());
    let err = router
        .resolve(&RequestContext::new("/news/items/launch.html"))
        .unwrap_err();
    assert!(matches!(err, RouteError::ReservedKeyCollision(ref key) if key == "items"));
}

#[test]
fn test_auto_item_marker_rejected() {
    let router = PageRouter::new(RouterConfig::default(), site());
    let err = router
        .resolve(&RequestContext::new("/news/auto_item/launch.html"))
        .unwrap_err();
    assert!(matches!(err, RouteError::InvalidRequest(_)));
}

#[test]
fn test_blank_key_is_skipped() {
    let router = PageRouter::new(RouterConfig::default(), site());
    let resolved = expect_page(
        router
            .resolve(&RequestContext::new("/news//ignored/page/2.html"))
            .unwrap(),
    );
    assert_eq!(resolved.params, params(&[("page", "2")]));
}

// ============================================================================
// Folder-style aliases
// ============================================================================

#[test]
fn test_longest_alias_wins() {
    let config = RouterConfig::default()
        .with_url_mode(UrlMode::Hierarchical)
        .with_url_suffix("");
    let router = PageRouter::new(config, site());

    let resolved = expect_page(router.resolve(&RequestContext::new("/news/archive/item")).unwrap());

    assert_eq!(resolved.alias, "news/archive");
    assert_eq!(resolved.page.id, 5);
    assert_eq!(resolved.params, params(&[("auto_item", "item")]));
}

#[test]
fn test_auto_item_inserted_after_folder_alias() {
    let config = RouterConfig::default()
        .with_url_mode(UrlMode::Hierarchical)
        .with_url_suffix("");
    let router = PageRouter::new(config, site());

    let resolved = expect_page(router.resolve(&RequestContext::new("/news/archive/42")).unwrap());

    assert_eq!(resolved.alias, "news/archive");
    assert_eq!(resolved.params, params(&[("auto_item", "42")]));
}

#[test]
fn test_folder_alias_per_language() {
    let config = RouterConfig::default()
        .with_url_mode(UrlMode::Hierarchical)
        .with_language_prefix(true);
    let store = MemoryPageStore::from_pages([
        PageRecord::root(1, "home-en", "", "en").with_fallback(true),
        PageRecord::new(2, 1, "news"),
        PageRecord::new(3, 2, "news/archive"),
        PageRecord::root(10, "home-de", "", "de"),
        PageRecord::new(11, 10, "news"),
        PageRecord::new(12, 11, "news/archive"),
    ]);
    let router = PageRouter::new(config, store);

    let resolved = expect_page(router.resolve(&RequestContext::new("/de/news/archive/x.html")).unwrap());
    assert_eq!(resolved.page.id, 12);
    assert_eq!(resolved.language.as_deref(), Some("de"));

    let err = router
        .resolve(&RequestContext::new("/fr/news/archive/x.html"))
        .unwrap_err();
    assert!(matches!(err, RouteError::NotFound(_)));
}

// ============================================================================
// Domain and language disambiguation
// ============================================================================

#[test]
fn test_host_selects_site() {
    let store = MemoryPageStore::from_pages([
        PageRecord::root(10, "site-b", "b.example", "de").with_fallback(true),
        PageRecord::new(11, 10, "index"),
        PageRecord::root(1, "site-a", "a.example", "en").with_fallback(true),
        PageRecord::new(2, 1, "index"),
    ]);
    let router = PageRouter::new(RouterConfig::default(), store);

    let resolved = expect_page(
        router
            .resolve(&RequestContext::new("/index.html").with_host("a.example"))
            .unwrap(),
    );

    assert_eq!(resolved.page.id, 2);
    assert_eq!(resolved.page.root_language, "en");
}

#[test]
fn test_unknown_host_without_wildcard_site_is_not_found() {
    let store = MemoryPageStore::from_pages([
        PageRecord::root(1, "site-a", "a.example", "en"),
        PageRecord::new(2, 1, "index"),
    ]);
    let router = PageRouter::new(RouterConfig::default(), store);

    let err = router
        .resolve(&RequestContext::new("/index.html").with_host("c.example"))
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Path normalization
// ============================================================================

#[test]
fn test_suffix_mismatch() {
    let router = PageRouter::new(RouterConfig::default(), site());
    let err = router.resolve(&RequestContext::new("/news/archive")).unwrap_err();
    assert!(matches!(err, RouteError::InvalidRequest(_)));
}

#[test]
fn test_query_string_ignored() {
    let router = PageRouter::new(RouterConfig::default(), site());
    let resolved = expect_page(
        router
            .resolve(&RequestContext::new("/news/page/2.html?page=9&utm=x"))
            .unwrap(),
    );
    assert_eq!(resolved.param("page"), Some("2"));
}

#[test]
fn test_missing_language_segment() {
    let config = RouterConfig::default().with_language_prefix(true);
    let router = PageRouter::new(config, site());
    let err = router.resolve(&RequestContext::new("/news.html")).unwrap_err();
    assert!(matches!(err, RouteError::InvalidRequest(_)));
}

// ============================================================================
// Root pages and redirects
// ============================================================================

fn multilingual() -> MemoryPageStore {
    MemoryPageStore::from_pages([
        PageRecord::root(1, "home-en", "example.org", "en").with_fallback(true),
        PageRecord::new(2, 1, "index"),
        PageRecord::root(10, "home-de", "example.org", "de"),
        PageRecord::new(11, 10, "startseite"),
    ])
}

#[test]
fn test_no_root_page_found() {
    let router = PageRouter::new(RouterConfig::default(), multilingual());

    let err = router
        .resolve(&RequestContext::new("/").with_host("unconfigured.example"))
        .unwrap_err();

    assert!(matches!(err, RouteError::NoRootPageFound { ref host, .. } if host == "unconfigured.example"));
    assert_eq!(err.class(), ErrorClass::Configuration);
    assert!(!err.is_not_found());
}

#[test]
fn test_unknown_url_language_has_no_root() {
    let config = RouterConfig::default().with_language_prefix(true);
    let store = MemoryPageStore::from_pages([
        PageRecord::root(1, "home-en", "", "en"),
        PageRecord::new(2, 1, "index"),
    ]);
    let router = PageRouter::new(config, store);

    let err = router.resolve(&RequestContext::new("/fr/")).unwrap_err();

    match &err {
        RouteError::NoRootPageFound { languages, .. } => assert_eq!(languages, &vec!["fr".to_string()]),
        other => panic!("expected NoRootPageFound, got {:?}", other),
    }
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn test_root_negotiates_accept_language() {
    let router = PageRouter::new(RouterConfig::default(), multilingual());

    let resolution = router
        .resolve(
            &RequestContext::new("/")
                .with_host("example.org")
                .with_accept_language("de-DE,de;q=0.9,en;q=0.5"),
        )
        .unwrap();

    assert_eq!(resolution, Resolution::Redirect(Redirect::temporary("/startseite.html")));
}

#[test]
fn test_root_with_index_child_is_served() {
    let router = PageRouter::new(RouterConfig::default(), multilingual());

    let resolution = router
        .resolve(
            &RequestContext::new("/")
                .with_host("example.org")
                .with_accept_language("fr"),
        )
        .unwrap();

    assert!(matches!(resolution, Resolution::Root(ref root) if root.id == 1));
}

#[test]
fn test_root_redirects_to_language_root() {
    let config = RouterConfig::default().with_language_prefix(true);
    let router = PageRouter::new(config, multilingual());

    let resolution = router
        .resolve(
            &RequestContext::new("/")
                .with_host("example.org")
                .with_accept_language("de"),
        )
        .unwrap();

    match resolution {
        Resolution::Redirect(redirect) => {
            assert_eq!(redirect.status(), 301);
            assert_eq!(redirect.target, "/de/");
        }
        other => panic!("expected redirect, got {:?}", other),
    }
}

#[test]
fn test_language_root_request() {
    let config = RouterConfig::default().with_language_prefix(true);
    let router = PageRouter::new(config, multilingual());

    let resolution = router
        .resolve(&RequestContext::new("/de/").with_host("example.org"))
        .unwrap();

    assert!(matches!(resolution, Resolution::Root(ref root) if root.id == 10));
}

#[test]
fn test_select_root_directly() {
    let router = PageRouter::new(RouterConfig::default(), multilingual());
    let languages = vec!["de".to_string()];

    let selection = router
        .select_root(RootRequest {
            host: "example.org",
            language: None,
            accept_language: &languages,
            empty_path: false,
        })
        .unwrap();

    assert_eq!(selection.page.id, 10);
    assert_eq!(selection.redirect, None);
}

// ============================================================================
// Transformers, add_to_url and site files
// ============================================================================

#[test]
fn test_transformers_run_before_fragment_building() {
    let router = PageRouter::new(RouterConfig::default(), site())
        .with_transformer(|fragments| {
            fragments
                .into_iter()
                .map(|f| if f == "seite" { "page".to_string() } else { f })
                .collect()
        })
        .with_transformer(|mut fragments| {
            fragments.retain(|f| f != "tracking");
            fragments
        });

    let resolved = expect_page(
        router
            .resolve(&RequestContext::new("/news/seite/2/tracking.html"))
            .unwrap(),
    );

    assert_eq!(resolved.params, params(&[("page", "2")]));
}

#[test]
fn test_add_to_url_from_resolved_request() {
    let router = PageRouter::new(RouterConfig::default(), site());
    let resolved = expect_page(
        router
            .resolve(&RequestContext::new("/news/launch/page/2.html"))
            .unwrap(),
    );

    let url = router
        .add_to_url(&resolved.page, &resolved.params, "page=3&amp;sort=date", false, &[])
        .unwrap();
    assert_eq!(url.to_string(), "/news/launch/page/3/sort/date.html");

    let url = router
        .add_to_url(&resolved.page, &resolved.params, "page=", false, &["auto_item"])
        .unwrap();
    assert_eq!(url.to_string(), "/news.html");
}

#[test]
fn test_site_file_drives_router() {
    let site = SiteFile::parse(
        r#"
        [routing]
        add_language_to_url = true
        url_suffix = ""

        [[pages]]
        id = 1
        type = "root"
        alias = "home"
        domain = "example.org"
        language = "en"
        fallback = true

        [[pages]]
        id = 2
        pid = 1
        alias = "contact"
        "#,
    )
    .unwrap();

    let router = PageRouter::new(site.routing.clone(), MemoryPageStore::from_site(&site));
    let resolved = expect_page(
        router
            .resolve(&RequestContext::new("/en/contact").with_host("example.org"))
            .unwrap(),
    );

    assert_eq!(resolved.page.id, 2);
    assert_eq!(resolved.page.trail, vec![1, 2]);
}
