// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::{Settings, SplashSettings, DEFAULT_TIMEOUT_MARGIN};
use crate::domain::models::crawl_request::{CrawlRequest, RequestMeta};
use crate::domain::models::splash_options::{RenderArgs, SplashOptions};
use crate::middleware::{crawlera, slot};
use crate::utils::errors::SplashError;
use crate::utils::url_utils::join_endpoint;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// 原始请求没有URL时使用的占位地址
pub const BLANK_URL: &str = "about:blank";

/// 改写请求的 Content-Type
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 请求处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// 不需要渲染，调用方继续使用原始请求
    PassThrough,
    /// 改写后的渲染服务请求
    Rewritten(CrawlRequest),
}

impl RequestOutcome {
    pub fn is_pass_through(&self) -> bool {
        matches!(self, RequestOutcome::PassThrough)
    }

    /// 取出改写后的请求，直通时返回原始请求的副本
    pub fn into_request(self, original: &CrawlRequest) -> CrawlRequest {
        match self {
            RequestOutcome::PassThrough => original.clone(),
            RequestOutcome::Rewritten(request) => request,
        }
    }
}

/// Splash 渲染中间件
///
/// 在请求到达网络层之前，把带有渲染指令的请求改写为发往渲染服务的 POST 请求
#[derive(Debug, Clone, Default)]
pub struct SplashMiddleware {
    settings: SplashSettings,
}

impl SplashMiddleware {
    /// 创建新的渲染中间件
    ///
    /// # 参数
    ///
    /// * `settings` - 渲染服务配置
    pub fn new(settings: SplashSettings) -> Self {
        Self { settings }
    }

    /// 从应用配置创建
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.splash.clone())
    }

    /// 处理一个外发请求
    ///
    /// # 参数
    ///
    /// * `request` - 原始请求，不会被修改
    ///
    /// # 返回值
    ///
    /// * `Ok(RequestOutcome::PassThrough)` - 没有渲染指令或已经改写过
    /// * `Ok(RequestOutcome::Rewritten)` - 发往渲染服务的新请求
    /// * `Err(SplashError::UnsupportedCombination)` - 代理与渲染功能的组合无法表示
    pub fn process_request(&self, request: &CrawlRequest) -> Result<RequestOutcome, SplashError> {
        let Some(options) = request.meta.splash.as_ref() else {
            trace!("No splash directive on {}", request.url);
            return Ok(RequestOutcome::PassThrough);
        };
        if request.meta.splash_processed {
            debug!("Request {} already targets the render service", request.url);
            return Ok(RequestOutcome::PassThrough);
        }

        let mut args = self.merge_args(options, &request.url);
        let mut endpoint = options
            .endpoint
            .as_deref()
            .unwrap_or(self.settings.endpoint.as_str())
            .trim_matches('/')
            .to_string();
        let splash_url = options
            .splash_url
            .as_deref()
            .unwrap_or(self.settings.url.as_str());

        if let Some(proxy) = request.meta.proxy.as_deref() {
            endpoint = crawlera::rewrite_for_proxy(&endpoint, &mut args, proxy, &request.headers)?;
        }

        let mut meta = request.meta.clone();
        meta.splash_processed = true;
        self.adjust_timeout(&mut meta, &args);

        let policy = options.slot_policy.unwrap_or(self.settings.slot_policy);
        if let Some(key) = slot::slot_key(policy, &request.url, splash_url) {
            debug!("Assigned download slot {} ({})", key, policy);
            meta.download_slot = Some(key);
        }

        let url = join_endpoint(splash_url, &endpoint);
        let body = serde_json::to_string(&args.into_json())?;
        debug!("Rewrote {} into POST {}", request.url, url);

        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());

        Ok(RequestOutcome::Rewritten(CrawlRequest {
            url,
            method: "POST".to_string(),
            headers,
            body: Some(body),
            meta,
        }))
    }

    /// 合并默认参数、指令参数与原始URL
    fn merge_args(&self, options: &SplashOptions, original_url: &str) -> RenderArgs {
        let mut args = self.settings.default_args.clone();
        args.merge(&options.args);

        if !args.contains("url") {
            let url = if original_url.is_empty() {
                BLANK_URL
            } else {
                original_url
            };
            args.insert("url", url);
        }

        args
    }

    /// 保证传输层超时晚于渲染服务自身的超时
    fn adjust_timeout(&self, meta: &mut RequestMeta, args: &RenderArgs) {
        let Some(timeout) = args.timeout() else {
            return;
        };
        // An absent download_timeout means unbounded.
        if let Some(current) = meta.download_timeout {
            if current <= timeout {
                let margin = if self.settings.timeout_margin > 0.0 {
                    self.settings.timeout_margin
                } else {
                    DEFAULT_TIMEOUT_MARGIN
                };
                let raised = timeout + margin;
                debug!(
                    "Raising download_timeout from {} to {} for render timeout {}",
                    current, raised, timeout
                );
                meta.download_timeout = Some(raised);
            }
        }
    }
}

#[cfg(test)]
#[path = "splash_middleware_test.rs"]
mod tests;
