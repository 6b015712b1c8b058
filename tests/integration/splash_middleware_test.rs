// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{body_json, create_middleware, request_with_meta, rewrite};
use crawlrs_splash::{CrawlRequest, RequestMeta, SplashRequest};
use serde_json::json;

#[test]
fn test_nosplash() {
    let mw = create_middleware();
    let request = request_with_meta(
        "http://example.com",
        json!({"download_timeout": 30, "proxy": "proxy.local:1234", "depth": 1}),
    );
    let old_meta = request.meta.clone();

    let outcome = mw.process_request(&request).unwrap();

    assert!(outcome.is_pass_through());
    assert_eq!(old_meta, request.meta);
    assert_eq!(
        serde_json::to_value(&old_meta).unwrap(),
        serde_json::to_value(&request.meta).unwrap()
    );
}

#[test]
fn test_splash_request() {
    let mw = create_middleware();
    let request = SplashRequest::new("http://example.com?foo=bar&url=1&wait=100")
        .build()
        .unwrap();

    let out = rewrite(&mw, &request);

    assert_ne!(out, request);
    assert_eq!(out.url, "http://127.0.0.1:8050/render.html");
    assert_eq!(out.method, "POST");
    assert_eq!(out.headers.len(), 1);
    assert_eq!(
        out.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(
        body_json(&out),
        json!({"url": "http://example.com?foo=bar&url=1&wait=100", "wait": 0.5})
    );
}

#[test]
fn test_splash_request_no_url() {
    let mw = create_middleware();
    let lua_source = "function main(splash) return {result='ok'} end";
    let meta: RequestMeta = serde_json::from_value(json!({
        "splash": {
            "args": {"lua_source": lua_source},
            "endpoint": "execute"
        }
    }))
    .unwrap();
    let request = SplashRequest::from_meta(meta).build().unwrap();

    let out = rewrite(&mw, &request);

    assert_eq!(out.url, "http://127.0.0.1:8050/execute");
    assert_eq!(
        body_json(&out),
        json!({"url": "about:blank", "lua_source": lua_source})
    );
    // Per-domain slot still resolves without a target host.
    assert_eq!(out.meta.download_slot.as_deref(), Some("127.0.0.1"));
}

#[test]
fn test_override_splash_url() {
    let mw = create_middleware();
    let request = request_with_meta(
        "http://example.com",
        json!({"splash": {"endpoint": "render.png", "splash_url": "http://splash.example.com"}}),
    );

    let out = rewrite(&mw, &request);

    assert_eq!(out.url, "http://splash.example.com/render.png");
    assert_eq!(body_json(&out), json!({"url": "http://example.com"}));
}

#[test]
fn test_override_splash_url_with_port_and_trailing_slash() {
    let mw = create_middleware();
    let request = request_with_meta(
        "http://example.com",
        json!({"splash": {"endpoint": "render.png", "splash_url": "http://alt:9/"}}),
    );

    let out = rewrite(&mw, &request);

    assert_eq!(out.url, "http://alt:9/render.png");
}

#[test]
fn test_float_wait_arg() {
    let mw = create_middleware();
    let request = request_with_meta(
        "http://example.com",
        json!({"splash": {"endpoint": "render.html", "args": {"wait": 0.5}}}),
    );

    let out = rewrite(&mw, &request);

    assert_eq!(body_json(&out), json!({"url": "http://example.com", "wait": 0.5}));
    assert!(out.body.as_deref().unwrap().contains("0.5"));
}

#[test]
fn test_integral_wait_arg_serializes_as_integer() {
    let mw = create_middleware();
    let request = SplashRequest::new("http://example.com")
        .arg("wait", 100.0)
        .build()
        .unwrap();

    let out = rewrite(&mw, &request);
    let body = out.body.as_deref().unwrap();

    assert!(body.contains("\"wait\":100"));
    assert!(!body.contains("100.0"));
}

#[test]
fn test_adjust_timeout() {
    let mw = create_middleware();
    let request = request_with_meta(
        "http://example.com",
        json!({
            "splash": {"args": {"timeout": 60, "html": 1}},
            "download_timeout": 30
        }),
    );
    let out = rewrite(&mw, &request);
    assert!(out.meta.download_timeout.unwrap() > 60.0);
    assert_eq!(request.meta.download_timeout, Some(30.0));

    let request = request_with_meta(
        "http://example.com",
        json!({
            "splash": {"args": {"html": 1}},
            "download_timeout": 30
        }),
    );
    let out = rewrite(&mw, &request);
    assert_eq!(out.meta.download_timeout, Some(30.0));
}

#[test]
fn test_original_request_is_untouched() {
    let mw = create_middleware();
    let request: CrawlRequest = SplashRequest::new("http://example.com/page")
        .arg("timeout", 90)
        .download_timeout(10.0)
        .header("User-Agent", "crawlrs")
        .build()
        .unwrap();
    let snapshot = request.clone();

    let out = rewrite(&mw, &request);

    assert_eq!(request, snapshot);
    assert!(out.meta.splash_processed);
    assert!(!request.meta.splash_processed);
    assert!(request.meta.download_slot.is_none());
}
