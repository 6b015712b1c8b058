// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::splash_options::{RenderArgs, DEFAULT_ENDPOINT, EXECUTE_ENDPOINT};
use crate::utils::errors::SplashError;
use crate::utils::url_utils::parse_proxy_address;
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 由代理层消费、不能转发给目标站点的请求头
pub const PROXY_AUTH_HEADER: &str = "Proxy-Authenticate";

/// 在脚本中没有等价写法的渲染参数
const UNSCRIPTABLE_ARGS: &[&str] = &["js"];

/// 脚本在未传入 `wait` 时的等待时间（秒）
const SCRIPT_DEFAULT_WAIT: f64 = 0.5;

// Built once per process and shared read-only afterwards.
static CRAWLERA_SCRIPT: Lazy<String> = Lazy::new(build_crawlera_script);

/// 代理兼容脚本
///
/// 通过 `crawlera` 参数设置代理和请求头，加载页面后返回 HTML、响应头和状态码
pub fn crawlera_script() -> &'static str {
    CRAWLERA_SCRIPT.as_str()
}

fn build_crawlera_script() -> String {
    format!(
        r#"function main(splash)
  local crawlera = splash.args.crawlera
  local headers = crawlera.headers or {{}}
  splash:on_request(function (request)
    request:set_proxy{{host = crawlera.host, port = crawlera.port}}
    for name, value in pairs(headers) do
      request:set_header(name, value)
    end
  end)
  assert(splash:go(splash.args.url))
  assert(splash:wait(splash.args.wait or {wait}))
  local entries = splash:history()
  local last_response = entries[#entries].response
  return {{
    html = splash:html(),
    headers = last_response.headers,
    http_status = last_response.status,
  }}
end
"#,
        wait = SCRIPT_DEFAULT_WAIT
    )
}

/// 将经过轮换代理的渲染请求改写为脚本调用
///
/// # 参数
///
/// * `endpoint` - 已确定的渲染端点
/// * `args` - 合并后的渲染参数，成功时会被加入 `lua_source` 和 `crawlera`
/// * `proxy` - `host:port` 形式的代理地址
/// * `headers` - 原始请求的请求头
///
/// # 返回值
///
/// * `Ok(String)` - 改写后的端点（总是 `execute`）
/// * `Err(SplashError::UnsupportedCombination)` - 该端点或参数无法在代理下表示
pub fn rewrite_for_proxy(
    endpoint: &str,
    args: &mut RenderArgs,
    proxy: &str,
    headers: &BTreeMap<String, String>,
) -> Result<String, SplashError> {
    if endpoint != DEFAULT_ENDPOINT && endpoint != EXECUTE_ENDPOINT {
        warn!("Endpoint {} cannot be rendered through proxy {}", endpoint, proxy);
        return Err(SplashError::UnsupportedCombination(format!(
            "endpoint {} is not supported with proxy {}",
            endpoint, proxy
        )));
    }

    if let Some(arg) = UNSCRIPTABLE_ARGS.iter().copied().find(|arg| args.contains(arg)) {
        warn!("Argument {} cannot be rendered through proxy {}", arg, proxy);
        return Err(SplashError::UnsupportedCombination(format!(
            "argument {} is not supported with proxy {}",
            arg, proxy
        )));
    }

    let (host, port) = parse_proxy_address(proxy).ok_or_else(|| {
        SplashError::UnsupportedCombination(format!("proxy {} is not in host:port form", proxy))
    })?;

    // The proxy is only applied by the fixed script, so any user script is replaced.
    if args.contains("lua_source") {
        debug!("Replacing user lua_source with the proxy script");
    }
    args.insert("lua_source", crawlera_script());

    let forwarded: Map<String, Value> = headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case(PROXY_AUTH_HEADER))
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();

    debug!(
        "Rewriting {} into {} for proxy {}:{} ({} headers forwarded)",
        endpoint,
        EXECUTE_ENDPOINT,
        host,
        port,
        forwarded.len()
    );

    args.insert(
        "crawlera",
        json!({
            "host": host,
            "port": port,
            "headers": forwarded,
        }),
    );

    Ok(EXECUTE_ENDPOINT.to_string())
}
