// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 拼接渲染服务地址与端点名，保证中间只有一个 `/`
pub fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// 提取 URL 的主机名（小写）
///
/// 空字符串、无法解析或没有主机部分的 URL（如 `about:blank`）返回 `None`
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_ascii_lowercase())
}

/// 解析 `host:port` 形式的代理地址
///
/// 也接受带 scheme 的写法（`http://host:port`）
pub fn parse_proxy_address(proxy: &str) -> Option<(String, u16)> {
    let proxy = proxy.trim();
    if proxy.contains("://") {
        let parsed = Url::parse(proxy).ok()?;
        let host = parsed.host_str()?.to_string();
        let port = parsed.port_or_known_default()?;
        return Some((host, port));
    }

    let (host, port) = proxy.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    let port = port.parse::<u16>().ok()?;
    Some((host.to_string(), port))
}
