// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{body_json, create_middleware, rewrite};
use crawlrs_splash::middleware::crawlera::crawlera_script;
use crawlrs_splash::{SplashError, SplashRequest};
use serde_json::json;

#[test]
fn test_crawlera() {
    let mw = create_middleware();
    let request = SplashRequest::new("http://example.com?foo=bar&url=1&wait=100")
        .endpoint("render.html")
        .proxy("subdomain.crawlera.com:1234")
        .header("X-Crawlera-Foo", "foo")
        .header("Proxy-Authenticate", "Basic foo")
        .build()
        .unwrap();

    let out = rewrite(&mw, &request);

    assert_eq!(
        out.url, "http://127.0.0.1:8050/execute",
        "render.html endpoint gets emulated with a script"
    );
    assert_eq!(out.method, "POST");
    assert_eq!(out.headers.len(), 1);
    assert_eq!(
        body_json(&out),
        json!({
            "url": "http://example.com?foo=bar&url=1&wait=100",
            "lua_source": crawlera_script(),
            "crawlera": {
                "headers": {"X-Crawlera-Foo": "foo"},
                "host": "subdomain.crawlera.com",
                "port": 1234
            },
            "wait": 0.5
        })
    );
    // The original request keeps its proxy auth header.
    assert!(request.headers.contains_key("Proxy-Authenticate"));
}

#[test]
fn test_crawlera_replaces_user_script() {
    let mw = create_middleware();
    let lua_source = "function main(splash) return splash.args.crawlera.host end";
    let request = SplashRequest::new("http://example.com")
        .endpoint("execute")
        .arg("lua_source", lua_source)
        .proxy("subdomain.crawlera.com:1234")
        .build()
        .unwrap();

    let out = rewrite(&mw, &request);
    let body = body_json(&out);

    assert_eq!(out.url, "http://127.0.0.1:8050/execute");
    assert_eq!(body["lua_source"], crawlera_script());
    assert_eq!(body["crawlera"]["port"], 1234);
}

#[test]
fn test_crawlera_not_supported() {
    let mw = create_middleware();

    let request = SplashRequest::new("http://example.com?foo=bar&url=1&wait=100")
        .endpoint("render.png")
        .proxy("subdomain.crawlera.com:1234")
        .build()
        .unwrap();
    match mw.process_request(&request) {
        Err(SplashError::UnsupportedCombination(_)) => {}
        other => panic!("UnsupportedCombination was expected, got {:?}", other),
    }

    let request = SplashRequest::new("http://example.com?foo=bar&url=1&wait=100")
        .arg("js", "js_profile_foo")
        .proxy("subdomain.crawlera.com:1234")
        .build()
        .unwrap();
    match mw.process_request(&request) {
        Err(SplashError::UnsupportedCombination(_)) => {}
        other => panic!("UnsupportedCombination was expected, got {:?}", other),
    }
}
