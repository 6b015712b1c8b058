// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理渲染服务地址、默认端点、槽位策略和超时余量等配置
pub mod settings;
