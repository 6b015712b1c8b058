// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crawlrs_splash::{CrawlRequest, RequestOutcome, SplashMiddleware};
use serde_json::Value;

/// 使用默认配置的中间件
pub fn create_middleware() -> SplashMiddleware {
    SplashMiddleware::default()
}

/// 处理请求并断言被改写
pub fn rewrite(mw: &SplashMiddleware, request: &CrawlRequest) -> CrawlRequest {
    match mw.process_request(request) {
        Ok(RequestOutcome::Rewritten(rewritten)) => rewritten,
        Ok(RequestOutcome::PassThrough) => panic!("request {} was not rewritten", request.url),
        Err(e) => panic!("request {} failed: {}", request.url, e),
    }
}

/// 解析改写后请求的 JSON 请求体
pub fn body_json(request: &CrawlRequest) -> Value {
    serde_json::from_str(request.body.as_deref().expect("rewritten request has a body"))
        .expect("body is valid JSON")
}

/// 由 JSON 元数据构造请求
pub fn request_with_meta(url: &str, meta: Value) -> CrawlRequest {
    serde_json::from_value(serde_json::json!({"url": url, "meta": meta}))
        .expect("valid request description")
}
