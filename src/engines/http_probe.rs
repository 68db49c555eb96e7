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

use crate::engines::traits::{EndpointProbe, FetchOutcome, ProbeError, TlsMode};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// 桌面浏览器User-Agent，降低被站点当作机器人拒绝的概率
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

// Accept-Encoding is deliberately absent: setting it by hand would switch off
// reqwest's transparent decompression.
static BROWSER_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let pairs = [
        (
            "accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
        ),
        ("accept-language", "en-US,en;q=0.9"),
        ("upgrade-insecure-requests", "1"),
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
        ("cache-control", "max-age=0"),
        (
            "sec-ch-ua",
            "\"Chromium\";v=\"122\", \"Not(A:Brand\";v=\"24\", \"Google Chrome\";v=\"122\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"macOS\""),
        ("dnt", "1"),
        ("pragma", "no-cache"),
        ("referer", "https://www.google.com/"),
        ("origin", "https://www.google.com"),
    ];

    let mut headers = HeaderMap::new();
    for (k, v) in pairs {
        if let (Ok(k), Ok(v)) = (
            HeaderName::from_bytes(k.as_bytes()),
            HeaderValue::from_str(v),
        ) {
            headers.insert(k, v);
        }
    }
    headers
});

/// HTTP探测引擎
///
/// 基于reqwest实现；持有一对客户端，分别对应放宽和严格的TLS校验
pub struct ReqwestProbe {
    lenient: reqwest::Client,
    strict: reqwest::Client,
}

impl ReqwestProbe {
    /// 创建新的探测引擎实例
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestProbe)` - 探测引擎
    /// * `Err(ProbeError)` - 客户端构建失败
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self {
            lenient: Self::builder().danger_accept_invalid_certs(true).build()?,
            strict: Self::builder().build()?,
        })
    }

    fn builder() -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(BROWSER_HEADERS.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            // Some hosts set a session cookie and then redirect to it
            .cookie_store(true)
    }
}

#[async_trait]
impl EndpointProbe for ReqwestProbe {
    /// 执行一次HTTP GET
    ///
    /// 自动跟随重定向并保留最终URL；任何HTTP状态码都作为结果返回，
    /// 留给校验器分类，而不是当作错误抛出
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `tls` - TLS校验模式
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchOutcome)` - 探测结果
    /// * `Err(ProbeError)` - 连接层失败
    async fn fetch(&self, url: &str, tls: TlsMode) -> Result<FetchOutcome, ProbeError> {
        let client = match tls {
            TlsMode::Lenient => &self.lenient,
            TlsMode::Strict => &self.strict,
        };

        let response = client.get(url).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(FetchOutcome {
            status,
            final_url,
            body,
        })
    }
}

#[cfg(test)]
#[path = "http_probe_test.rs"]
mod tests;
