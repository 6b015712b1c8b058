// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 中间件模块
///
/// 包含渲染请求改写的各个环节：
/// - 请求分类、参数合并与超时调整（splash_middleware）
/// - 下载槽位分配（slot）
/// - 轮换代理兼容改写（crawlera）
pub mod crawlera;
pub mod slot;
pub mod splash_middleware;
