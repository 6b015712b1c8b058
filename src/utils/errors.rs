// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Splash 中间件错误类型
#[derive(Error, Debug)]
pub enum SplashError {
    /// 代理与渲染功能的组合无法表示（例如代理下请求 render.png）
    #[error("不支持的组合: {0}")]
    UnsupportedCombination(String),

    /// 渲染指令在构造或校验时不合法
    #[error("无效的渲染指令: {0}")]
    InvalidDirective(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SplashError {
    /// 判断是否为配置层面的不支持组合
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SplashError::UnsupportedCombination(_))
    }
}
