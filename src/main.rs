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

use crawlrs_splash::config::settings::Settings;
use crawlrs_splash::utils::telemetry;
use crawlrs_splash::{CrawlRequest, RequestOutcome, SplashMiddleware};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

/// 主函数
///
/// 从标准输入逐行读取 JSON 请求描述，改写后逐行写到标准输出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting crawlrs-splash...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!(
        "Configuration loaded, render service at {} ({})",
        settings.splash.url, settings.splash.slot_policy
    );
    let middleware = SplashMiddleware::from_settings(&settings);

    // 3. Process requests
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut processed = 0u64;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let mut output = serde_json::to_vec(&handle_line(&middleware, &line))?;
        output.push(b'\n');
        stdout.write_all(&output).await?;
        processed += 1;
    }

    stdout.flush().await?;
    info!("Processed {} requests", processed);
    Ok(())
}

/// 处理一行输入，失败时返回错误对象而不是中断
///
/// 不需要渲染的请求原样回显，不经过类型化的往返
fn handle_line(middleware: &SplashMiddleware, line: &str) -> Value {
    let raw: Value = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Skipping malformed request: {}", e);
            return json!({"outcome": "error", "error": format!("malformed request: {}", e)});
        }
    };

    if raw.pointer("/meta/splash").map_or(true, Value::is_null) {
        return json!({"outcome": "pass_through", "request": raw});
    }

    let request: CrawlRequest = match serde_json::from_value(raw.clone()) {
        Ok(request) => request,
        Err(e) => {
            warn!("Skipping malformed request: {}", e);
            return json!({"outcome": "error", "error": format!("malformed request: {}", e)});
        }
    };

    match middleware.process_request(&request) {
        Ok(RequestOutcome::PassThrough) => json!({"outcome": "pass_through", "request": raw}),
        Ok(RequestOutcome::Rewritten(rewritten)) => {
            json!({"outcome": "rewritten", "request": rewritten})
        }
        Err(e) => {
            warn!("Rejected request {}: {}", request.url, e);
            json!({"outcome": "error", "error": e.to_string()})
        }
    }
}
