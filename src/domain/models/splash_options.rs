// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::SplashError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// 默认渲染端点
pub const DEFAULT_ENDPOINT: &str = "render.html";
/// 脚本执行端点
pub const EXECUTE_ENDPOINT: &str = "execute";
/// 默认渲染服务地址
pub const DEFAULT_SPLASH_URL: &str = "http://127.0.0.1:8050";

/// 下载槽位策略
///
/// 决定改写后的请求如何分配到调度器的并发槽位中
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotPolicy {
    /// 不设置槽位，由调度器按目标URL（即渲染服务）自行推导
    ScrapyDefault,
    /// 按原始请求的域名分配槽位
    #[default]
    PerDomain,
    /// 所有渲染请求共享同一个槽位
    SingleSlot,
}

impl fmt::Display for SlotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SlotPolicy::ScrapyDefault => write!(f, "scrapy_default"),
            SlotPolicy::PerDomain => write!(f, "per_domain"),
            SlotPolicy::SingleSlot => write!(f, "single_slot"),
        }
    }
}

impl FromStr for SlotPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scrapy_default" => Ok(SlotPolicy::ScrapyDefault),
            "per_domain" => Ok(SlotPolicy::PerDomain),
            "single_slot" => Ok(SlotPolicy::SingleSlot),
            _ => Err(()),
        }
    }
}

/// 渲染参数
///
/// 参数名到参数值的映射，例如 `wait`、`timeout`、`viewport`、`lua_source`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderArgs(Map<String, Value>);

impl RenderArgs {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 用 `other` 覆盖当前参数，键冲突时 `other` 优先
    pub fn merge(&mut self, other: &RenderArgs) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// 数值型的 `timeout` 参数（秒）
    pub fn timeout(&self) -> Option<f64> {
        self.0.get("timeout").and_then(Value::as_f64)
    }

    /// 转为请求体使用的 JSON 对象
    ///
    /// 整数值的浮点数会被规范化为整数，`100.0` 输出为 `100`，`0.5` 保持不变
    pub fn into_json(self) -> Map<String, Value> {
        self.0
            .into_iter()
            .map(|(key, value)| (key, normalize_number(value)))
            .collect()
    }
}

impl From<Map<String, Value>> for RenderArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// 2^53，超过该值的浮点数不再能精确表示整数
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn normalize_number(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => {
            let f = n.as_f64().unwrap_or_default();
            if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER {
                Value::Number(Number::from(f as i64))
            } else {
                Value::Number(n)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_number).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize_number(value)))
                .collect(),
        ),
        other => other,
    }
}

/// 渲染指令
///
/// 对应请求元数据中的 `splash` 子映射，描述该请求应当如何被渲染
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplashOptions {
    /// 渲染参数
    #[serde(default, skip_serializing_if = "RenderArgs::is_empty")]
    pub args: RenderArgs,
    /// 渲染端点名称，缺省为 `render.html`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// 覆盖渲染服务的基础地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash_url: Option<String>,
    /// 槽位策略，缺省使用配置中的策略
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_policy: Option<SlotPolicy>,
    /// 透传标记，本模块不做处理
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dont_process_response: bool,
    /// 其他透传字段（缓存控制等）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SplashOptions {
    /// 校验渲染指令
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 指令有效
    /// * `Err(SplashError::InvalidDirective)` - 端点为空或渲染服务地址不是 http(s) 绝对地址
    pub fn validate(&self) -> Result<(), SplashError> {
        if let Some(endpoint) = &self.endpoint {
            let endpoint = endpoint.trim_matches('/');
            if endpoint.is_empty() || endpoint.contains(char::is_whitespace) {
                return Err(SplashError::InvalidDirective(format!(
                    "invalid endpoint name: {:?}",
                    self.endpoint
                )));
            }
        }

        if let Some(splash_url) = &self.splash_url {
            let parsed = Url::parse(splash_url).map_err(|e| {
                SplashError::InvalidDirective(format!("invalid splash_url {}: {}", splash_url, e))
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(SplashError::InvalidDirective(format!(
                    "splash_url must be http(s): {}",
                    splash_url
                )));
            }
        }

        Ok(())
    }
}
