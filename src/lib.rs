// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理渲染服务的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含请求描述和渲染指令等值对象
pub mod domain;

/// 中间件模块
///
/// 把带渲染指令的爬取请求改写为渲染服务请求
pub mod middleware;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

pub use domain::models::crawl_request::{CrawlRequest, RequestMeta};
pub use domain::models::splash_options::{RenderArgs, SlotPolicy, SplashOptions};
pub use domain::models::splash_request::SplashRequest;
pub use middleware::splash_middleware::{RequestOutcome, SplashMiddleware};
pub use utils::errors::SplashError;
