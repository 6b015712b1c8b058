// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::splash_options::SplashOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 爬取请求描述
///
/// 由调用方持有的请求值对象。中间件只读取它，改写结果总是一个新的实例，
/// 原始请求在重试和日志中仍然可用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlRequest {
    /// 目标URL，仅由渲染指令构造的请求可以为空
    #[serde(default)]
    pub url: String,
    /// HTTP方法
    #[serde(default = "default_method")]
    pub method: String,
    /// 请求头
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// 请求体
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// 请求元数据
    #[serde(default)]
    pub meta: RequestMeta,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Default for CrawlRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: default_method(),
            headers: BTreeMap::new(),
            body: None,
            meta: RequestMeta::default(),
        }
    }
}

impl CrawlRequest {
    /// 创建一个 GET 请求
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 替换请求元数据
    pub fn with_meta(mut self, meta: RequestMeta) -> Self {
        self.meta = meta;
        self
    }

    /// 是否携带渲染指令
    pub fn wants_splash(&self) -> bool {
        self.meta.splash.is_some()
    }
}

/// 请求元数据
///
/// 已知字段被显式建模，其余字段原样保存在 `extra` 中
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestMeta {
    /// 渲染指令
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash: Option<SplashOptions>,
    /// 轮换代理地址（`host:port`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// 下载超时（秒），由上游超时中间件设置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_timeout: Option<f64>,
    /// 调度器并发槽位
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_slot: Option<String>,
    /// 已被改写为渲染服务请求
    #[serde(
        rename = "_splash_processed",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub splash_processed: bool,
    /// 其他元数据
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
