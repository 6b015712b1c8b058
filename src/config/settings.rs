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

use crate::domain::models::splash_options::{
    RenderArgs, SlotPolicy, DEFAULT_ENDPOINT, DEFAULT_SPLASH_URL,
};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 默认的超时余量（秒）
pub const DEFAULT_TIMEOUT_MARGIN: f64 = 15.0;

/// 应用程序配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// 渲染服务配置
    pub splash: SplashSettings,
}

/// 渲染服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SplashSettings {
    /// 渲染服务基础地址
    pub url: String,
    /// 默认渲染端点
    pub endpoint: String,
    /// 默认槽位策略
    pub slot_policy: SlotPolicy,
    /// `download_timeout` 高出 `timeout` 参数的余量（秒）
    pub timeout_margin: f64,
    /// 所有渲染请求共享的默认参数
    #[serde(default)]
    pub default_args: RenderArgs,
}

impl Default for SplashSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SPLASH_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            slot_policy: SlotPolicy::default(),
            timeout_margin: DEFAULT_TIMEOUT_MARGIN,
            default_args: RenderArgs::new(),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `CRAWLRS_SPLASH__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CRAWLRS_SPLASH").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 从指定配置文件加载，文件之上仍可被环境变量覆盖
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("CRAWLRS_SPLASH").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("splash.url", DEFAULT_SPLASH_URL)?
            .set_default("splash.endpoint", DEFAULT_ENDPOINT)?
            .set_default("splash.slot_policy", SlotPolicy::default().to_string())?
            .set_default("splash.timeout_margin", DEFAULT_TIMEOUT_MARGIN)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
