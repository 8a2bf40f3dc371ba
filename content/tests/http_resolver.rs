//! End-to-end tests of the resolver over real HTTP against a mock content API.

use content::{
    Collection, ContentConfig, ContentResource, HttpFetcher, ImageOrigin, Palette, Phase,
    RecordingObserver, RequestOptions, ResolvedImage, Resolver, ResolverProfile,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/wp-json/wp/v2";

fn config(server: &MockServer) -> ContentConfig {
    ContentConfig::default()
        .with_api_base_url(format!("{}{}", server.uri(), API))
        .with_timeout(Duration::from_secs(5))
}

fn make_resolver(server: &MockServer, collection: Collection) -> Resolver {
    let config = config(server);
    let fetcher = HttpFetcher::new(&config).expect("fetcher creation");
    Resolver::for_collection(Arc::new(fetcher), config, collection).expect("resolver creation")
}

#[tokio::test]
async fn test_posts_resolve_embedded_lookup_and_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/posts", API)))
        .and(query_param("_embed", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "slug": "first",
                "title": {"rendered": "First"},
                "featured_media": 3,
                "_embedded": {"wp:featuredmedia": [{"id": 3, "source_url": "https://cdn.test/first.jpg"}]}
            },
            {"id": 2, "slug": "second", "title": {"rendered": "Second"}, "featured_media": 7},
            {"id": 6, "slug": "third", "title": {"rendered": "Third"}, "featured_media": 0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/media/7", API)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 7, "source_url": "https://cdn.test/seven.jpg"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/media/3", API)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = make_resolver(&server, Collection::Posts);
    let url = Collection::Posts.url(resolver.config());
    let payload = resolver
        .resolve(&url, &RequestOptions::default())
        .await
        .expect("resolve posts");

    let items = payload.items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].image, ResolvedImage::url("https://cdn.test/first.jpg"));
    assert_eq!(items[1].image, ResolvedImage::url("https://cdn.test/seven.jpg"));
    assert_eq!(
        items[2].image,
        ResolvedImage::gradient(Palette::content().gradient_for(6))
    );
    assert_eq!(items[2].image_origin, ImageOrigin::NoReference);
}

#[tokio::test]
async fn test_embed_failure_falls_back_to_plain_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/services", API)))
        .and(query_param("_embed", ""))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/services", API)))
        .and(query_param_is_missing("_embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 21, "title": {"rendered": "SEO"}},
            {"id": 22, "title": {"rendered": "Branding"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = make_resolver(&server, Collection::Services);
    let mut resource = ContentResource::new(resolver);
    resource.set_url(format!("{}{}/services", server.uri(), API));

    let state = resource.settled().await;
    assert_eq!(state.phase(), Phase::Ready);
    assert!(state.error.is_none());
    assert_eq!(state.data.expect("data").len(), 2);
}

#[tokio::test]
async fn test_both_requests_failing_surface_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/posts", API)))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = make_resolver(&server, Collection::Posts);
    let mut resource = ContentResource::new(resolver);
    resource.set_url(format!("{}{}/posts", server.uri(), API));

    let state = resource.settled().await;
    assert!(!state.loading);
    assert!(state.data.is_none());
    assert_eq!(state.error.as_deref(), Some("HTTP error! status: 503"));
}

#[tokio::test]
async fn test_portfolio_lookup_failure_is_isolated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/portfolio", API)))
        .and(query_param_is_missing("_embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 30, "acf": {"project_images": 300, "client_name": "Acme"}},
            {"id": 31, "acf": {"project_images": 310}}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/media/300", API)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"source_url": "https://cdn.test/300.png"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/media/310", API)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let observer = Arc::new(RecordingObserver::new());
    let resolver = make_resolver(&server, Collection::Portfolio).with_observer(observer.clone());
    let url = Collection::Portfolio.url(resolver.config());

    let payload = resolver
        .resolve(&url, &RequestOptions::default())
        .await
        .expect("resolve portfolio");
    let items = payload.items();

    assert_eq!(items[0].image, ResolvedImage::url("https://cdn.test/300.png"));
    assert_eq!(
        items[0].portfolio.as_ref().and_then(|p| p.client_name.as_deref()),
        Some("Acme")
    );
    assert_eq!(
        items[1].image,
        ResolvedImage::gradient(ResolverProfile::portfolio().palette.gradient_for(31))
    );
    assert_eq!(items[1].image_origin, ImageOrigin::LookupFailed { media_id: 310 });
    assert_eq!(observer.media_failures(), vec![(31, 310)]);
}

#[tokio::test]
async fn test_request_headers_are_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/pages", API)))
        .and(query_param("slug", "about"))
        .and(header("x-api-key", "secret"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 9, "title": {"rendered": "About us"}}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = make_resolver(&server, Collection::Pages);
    let url = format!("{}?slug=about", Collection::Pages.url(resolver.config()));
    let options = RequestOptions::new().with_header("X-Api-Key", "secret");

    let value = resolver.fetch_json(&url, &options).await.expect("fetch page");
    assert_eq!(value[0]["title"]["rendered"], "About us");
}

#[tokio::test]
async fn test_unreachable_api_is_collection_error() {
    let config = ContentConfig::default()
        .with_api_base_url("http://127.0.0.1:9/wp-json/wp/v2")
        .with_timeout(Duration::from_secs(2));
    let fetcher = HttpFetcher::new(&config).expect("fetcher creation");
    let resolver = Resolver::new(Arc::new(fetcher), config.clone(), ResolverProfile::content())
        .expect("resolver creation");

    let result = resolver
        .resolve(&config.endpoint("posts"), &RequestOptions::default())
        .await;
    assert!(result.is_err());
}
