// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了渲染改写涉及的值对象，包括：
/// - 爬取请求（crawl_request）：请求描述及其元数据
/// - 渲染指令（splash_options）：端点、参数、槽位策略
/// - 渲染请求构建器（splash_request）：携带默认参数的便捷构造
///
/// 这些对象都是短生命周期的值，构造、改写一次后交给传输层。
pub mod crawl_request;
pub mod splash_options;
pub mod splash_request;
