// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 包含请求描述、渲染指令等核心值对象，不依赖任何外部实现
pub mod models;
