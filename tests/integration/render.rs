use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use plotmark::cache::{CacheError, CacheService};
use plotmark::config::{CacheLocation, CacheSettings};
use plotmark::dsl::parse;
use plotmark::render::{
    CompletionRouter, RenderCoordinator, RenderError, RenderSource, Renderer,
};
use plotmark::test_utils::{FakeMode, FakeRenderer, init_test_logging};
use tempfile::TempDir;

const ORIGIN: &str = "app://plotmark-test";

fn filesystem_cache(directory: &Path) -> CacheService {
    CacheService::new(
        CacheSettings {
            enabled: true,
            location: CacheLocation::Filesystem,
            directory: Some(directory.to_path_buf()),
        },
        "plotmark",
    )
}

fn coordinator<R: Renderer>(
    renderer: R,
    cache: CacheService,
    router: &CompletionRouter,
) -> RenderCoordinator<R> {
    RenderCoordinator::new(renderer, cache, router.clone())
}

#[tokio::test]
async fn test_cached_file_is_served_without_rendering() {
    init_test_logging(None);
    let dir = TempDir::new().unwrap();
    let spec = parse("y=x^2|red").unwrap();
    let cached = dir.path().join(format!("plotmark-graph-{}.png", spec.fingerprint()));
    std::fs::write(&cached, b"cached image").unwrap();

    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"fresh image"));
    let coordinator = coordinator(renderer.clone(), filesystem_cache(dir.path()), &router);

    let rendered = coordinator.render(&spec, dir.path()).await.unwrap();
    assert_eq!(rendered.source, RenderSource::Cache);
    assert_eq!(rendered.image, Bytes::from_static(b"cached image"));
    assert_eq!(renderer.submissions(), 0);
}

#[tokio::test]
async fn test_cold_render_populates_filesystem_cache() {
    init_test_logging(None);
    let dir = TempDir::new().unwrap();
    let spec = parse("width=320---y=x|dashed").unwrap();

    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"png"));
    let coordinator = coordinator(renderer.clone(), filesystem_cache(dir.path()), &router);

    let rendered = coordinator.render(&spec, dir.path()).await.unwrap();
    assert_eq!(rendered.source, RenderSource::Renderer);
    assert!(rendered.cache_warning.is_none());

    let requests = renderer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].fingerprint, spec.fingerprint());
    assert_eq!(requests[0].width, 320);

    let cached = dir.path().join(format!("plotmark-graph-{}.png", spec.fingerprint()));
    assert_eq!(std::fs::read(cached).unwrap(), b"png");

    // Second request is a hit.
    let again = coordinator.render(&spec, dir.path()).await.unwrap();
    assert_eq!(again.source, RenderSource::Cache);
    assert_eq!(renderer.submissions(), 1);
    assert_eq!(router.pending(spec.fingerprint()), 0);
}

#[tokio::test]
async fn test_concurrent_cold_renders_both_resolve() {
    init_test_logging(None);
    let spec = parse("y=\\sin(x)|blue").unwrap();

    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"png"))
        .with_delay(Duration::from_millis(20));
    let coordinator = coordinator(
        renderer.clone(),
        CacheService::new(CacheSettings::default(), "plotmark"),
        &router,
    );

    let root = Path::new("/");
    let (first, second) = tokio::join!(coordinator.render(&spec, root), coordinator.render(&spec, root));

    assert_eq!(first.unwrap().image, Bytes::from_static(b"png"));
    assert_eq!(second.unwrap().image, Bytes::from_static(b"png"));
    assert_eq!(renderer.submissions(), 2);
    assert_eq!(router.pending(spec.fingerprint()), 0);
}

#[tokio::test]
async fn test_distinct_specs_resolve_independently() {
    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"png"))
        .with_delay(Duration::from_millis(10));
    let coordinator = coordinator(
        renderer.clone(),
        CacheService::new(CacheSettings::default(), "plotmark"),
        &router,
    );

    let a = parse("y=x").unwrap();
    let b = parse("y=-x").unwrap();
    let root = Path::new("/");
    let (ra, rb) = tokio::join!(coordinator.render(&a, root), coordinator.render(&b, root));

    assert!(ra.is_ok());
    assert!(rb.is_ok());
    assert!(coordinator.cache().memory().contains(a.fingerprint()));
    assert!(coordinator.cache().memory().contains(b.fingerprint()));
}

#[tokio::test]
async fn test_renderer_error_is_passed_through_and_not_cached() {
    init_test_logging(None);
    let dir = TempDir::new().unwrap();
    let spec = parse("y=q").unwrap();

    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::failing(&router, "Undefined symbol q");
    let coordinator = coordinator(renderer, filesystem_cache(dir.path()), &router);

    let err = coordinator.render(&spec, dir.path()).await.unwrap_err();
    assert_eq!(
        err,
        RenderError::RenderFailed {
            fingerprint: spec.fingerprint().to_string(),
            message: "Undefined symbol q".to_string(),
        }
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_cache_directory_still_returns_image() {
    init_test_logging(None);
    let root = TempDir::new().unwrap();
    let missing = root.path().join("not-created");
    let spec = parse("y=x").unwrap();

    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"png"));
    let coordinator = coordinator(renderer, filesystem_cache(&missing), &router);

    let rendered = coordinator.render(&spec, root.path()).await.unwrap();
    assert_eq!(rendered.image, Bytes::from_static(b"png"));
    assert!(matches!(rendered.cache_warning, Some(CacheError::DirectoryMissing { .. })));
    assert!(!missing.exists());
}

#[tokio::test]
async fn test_disabled_cache_always_renders() {
    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"png"));
    let cache = CacheService::new(
        CacheSettings {
            enabled: false,
            ..CacheSettings::default()
        },
        "plotmark",
    );
    let coordinator = coordinator(renderer.clone(), cache, &router);
    let spec = parse("y=x").unwrap();

    for _ in 0..2 {
        let rendered = coordinator.render(&spec, Path::new("/")).await.unwrap();
        assert_eq!(rendered.source, RenderSource::Renderer);
    }
    assert_eq!(renderer.submissions(), 2);
    assert!(coordinator.cache().memory().is_empty());
}

#[tokio::test]
async fn test_untrusted_origin_completion_is_ignored() {
    init_test_logging(None);
    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"forged"))
        .with_origin("https://attacker.example");
    let coordinator = coordinator(
        renderer.clone(),
        CacheService::new(CacheSettings::default(), "plotmark"),
        &router,
    );
    let spec = parse("y=x").unwrap();

    let outcome =
        tokio::time::timeout(Duration::from_millis(100), coordinator.render(&spec, Path::new("/")))
            .await;
    assert!(outcome.is_err(), "render must still be waiting");
    assert_eq!(renderer.submissions(), 1);
    assert_eq!(router.pending(spec.fingerprint()), 0);
    assert!(coordinator.cache().memory().is_empty());
}

#[tokio::test]
async fn test_abandoned_render_deregisters() {
    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::new(&router, FakeMode::Silent);
    let coordinator = coordinator(
        renderer,
        CacheService::new(CacheSettings::default(), "plotmark"),
        &router,
    );
    let spec = parse("y=x").unwrap();

    let outcome =
        tokio::time::timeout(Duration::from_millis(20), coordinator.render(&spec, Path::new("/")))
            .await;
    assert!(outcome.is_err());
    assert_eq!(router.pending(spec.fingerprint()), 0);
}

#[tokio::test]
async fn test_unavailable_renderer_fails_fast() {
    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::new(&router, FakeMode::Unavailable);
    let coordinator = coordinator(
        renderer.clone(),
        CacheService::new(CacheSettings::default(), "plotmark"),
        &router,
    );
    let spec = parse("y=x").unwrap();

    let err = coordinator.render(&spec, Path::new("/")).await.unwrap_err();
    assert!(matches!(err, RenderError::RendererUnavailable { .. }));
    assert_eq!(renderer.submissions(), 0);
    assert_eq!(router.pending(spec.fingerprint()), 0);
}

#[tokio::test]
async fn test_render_all_keeps_order_and_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let ok = parse("y=x").unwrap();
    let cached = parse("y=2x").unwrap();
    std::fs::write(
        dir.path().join(format!("plotmark-graph-{}.png", cached.fingerprint())),
        b"from disk",
    )
    .unwrap();

    let router = CompletionRouter::new(ORIGIN);
    let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"rendered"));
    let coordinator = coordinator(renderer.clone(), filesystem_cache(dir.path()), &router);

    let results = coordinator.render_all(&[ok.clone(), cached.clone()], dir.path()).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().source, RenderSource::Renderer);
    assert_eq!(results[1].as_ref().unwrap().image, Bytes::from_static(b"from disk"));
    assert_eq!(renderer.submissions(), 1);
}
