// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_request::{CrawlRequest, RequestMeta};
use crate::domain::models::splash_options::{RenderArgs, SlotPolicy, SplashOptions};
use crate::utils::errors::SplashError;
use serde_json::Value;

/// 便捷请求默认的 `wait` 参数（秒）
pub const DEFAULT_REQUEST_WAIT: f64 = 0.5;

/// 渲染请求构建器
///
/// 构建携带渲染指令的 [`CrawlRequest`]，默认参数为 `{"wait": 0.5}`
#[derive(Debug, Clone)]
pub struct SplashRequest {
    request: CrawlRequest,
    options: SplashOptions,
}

impl SplashRequest {
    /// 创建指向 `url` 的渲染请求
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            request: CrawlRequest::new(url),
            options: Self::default_options(),
        }
    }

    /// 只由元数据构造的请求（没有原始URL）
    ///
    /// 元数据中没有渲染指令时使用默认指令
    pub fn from_meta(mut meta: RequestMeta) -> Self {
        let options = meta.splash.take().unwrap_or_else(Self::default_options);
        Self {
            request: CrawlRequest::default().with_meta(meta),
            options,
        }
    }

    fn default_options() -> SplashOptions {
        let mut args = RenderArgs::new();
        args.insert("wait", DEFAULT_REQUEST_WAIT);
        SplashOptions {
            args,
            ..Default::default()
        }
    }

    /// 整体替换渲染参数
    pub fn args(mut self, args: RenderArgs) -> Self {
        self.options.args = args;
        self
    }

    /// 设置单个渲染参数
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.args.insert(key, value);
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.options.endpoint = Some(endpoint.into());
        self
    }

    pub fn splash_url(mut self, splash_url: impl Into<String>) -> Self {
        self.options.splash_url = Some(splash_url.into());
        self
    }

    pub fn slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.options.slot_policy = Some(policy);
        self
    }

    /// 通过轮换代理发送
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.request.meta.proxy = Some(proxy.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    pub fn download_timeout(mut self, seconds: f64) -> Self {
        self.request.meta.download_timeout = Some(seconds);
        self
    }

    /// 校验渲染指令并生成请求
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlRequest)` - 带渲染指令的请求
    /// * `Err(SplashError::InvalidDirective)` - 指令不合法
    pub fn build(self) -> Result<CrawlRequest, SplashError> {
        self.options.validate()?;
        let mut request = self.request;
        request.meta.splash = Some(self.options);
        Ok(request)
    }
}
