// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::splash_options::SlotPolicy;
use crate::utils::url_utils::host_of;

/// `SingleSlot` 策略下所有渲染请求共享的槽位
pub const SINGLE_SLOT_KEY: &str = "__splash__";

/// 计算改写后请求的下载槽位
///
/// # 参数
///
/// * `policy` - 槽位策略
/// * `original_url` - 改写前的目标URL
/// * `splash_url` - 渲染服务基础地址
///
/// # 返回值
///
/// `None` 表示不设置槽位，交给调度器默认处理
pub fn slot_key(policy: SlotPolicy, original_url: &str, splash_url: &str) -> Option<String> {
    match policy {
        SlotPolicy::ScrapyDefault => None,
        SlotPolicy::PerDomain => Some(
            host_of(original_url)
                .or_else(|| host_of(splash_url))
                .or_else(|| Some(splash_url.trim().to_string()).filter(|s| !s.is_empty()))
                .unwrap_or_else(|| SINGLE_SLOT_KEY.to_string()),
        ),
        SlotPolicy::SingleSlot => Some(SINGLE_SLOT_KEY.to_string()),
    }
}
