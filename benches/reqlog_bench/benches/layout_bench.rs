//! Layout rendering benchmarks
//!
//! Renders a typical access-log layout against an `http` request, directly
//! and through a captured snapshot.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reqlog::prelude::*;

fn access_layout() -> Result<Layout> {
    let registry = RendererRegistry::with_defaults();
    Ok(Layout::builder()
        .token(&registry, "request-ip", Value::Null)?
        .literal(" ")
        .token(&registry, "request-method", Value::Null)?
        .literal(" ")
        .token(&registry, "request-url", json!({ "includeQueryString": true }))?
        .literal(" cookies=")
        .token(&registry, "request-cookie", json!({ "outputFormat": "JsonDictionary" }))?
        .literal(" route=")
        .token(&registry, "request-routeparameters", Value::Null)?
        .build())
}

fn request() -> http::Request<()> {
    http::Request::builder()
        .method("GET")
        .uri("https://shop.example.com/orders/42?expand=lines")
        .header("cookie", "session=abc123; theme=dark; lang=en")
        .header("x-forwarded-for", "203.0.113.9")
        .extension(RouteParams::from_iter([("controller", "orders"), ("id", "42")]))
        .body(())
        .unwrap()
}

fn bench_render(c: &mut Criterion) {
    let layout = access_layout().unwrap();
    let request = request();
    let mut group = c.benchmark_group("layout_render");

    group.bench_function("http_context", |b| {
        b.iter(|| layout.render(black_box(&HttpContext::from_request(&request))))
    });

    let snapshot = SnapshotContext::capture(&HttpContext::from_request(&request));
    group.bench_function("snapshot", |b| {
        b.iter(|| layout.render(black_box(&snapshot)))
    });

    group.bench_function("detached", |b| {
        b.iter(|| layout.render(black_box(&HttpContext::detached())))
    });

    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let registry = RendererRegistry::with_defaults();

    c.bench_function("registry/create_cookie", |b| {
        b.iter(|| {
            registry
                .create(
                    black_box("request-cookie"),
                    json!({ "cookieNames": "session,theme", "outputFormat": "JsonArray" }),
                )
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_render, bench_registry);
criterion_main!(benches);
