// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::verdict::{EndpointKind, Severity, ValidationVerdict, VerdictKind};
use crate::engines::fetcher::ResilientFetcher;
use crate::engines::traits::{FetchOutcome, ProbeError, TlsMode};
use crate::utils::url_utils;
use tracing::debug;

/// 主机可达但访问受限的状态码，按警告而非死链处理
const RESTRICTED_STATUSES: [u16; 4] = [401, 403, 429, 451];

/// 浏览器内容启发式规则
#[derive(Debug, Clone)]
pub struct ContentRules {
    /// 正文必须同时包含的关键词
    pub required_tokens: Vec<String>,
    /// 任一命中即视为浏览器实例的引导标记
    pub bootstrap_markers: Vec<String>,
}

impl Default for ContentRules {
    fn default() -> Self {
        Self {
            required_tokens: vec!["blocks".to_string(), "transactions".to_string()],
            bootstrap_markers: vec![
                "/static/js/main.".to_string(),
                "__blockscout".to_string(),
                "etherscan".to_string(),
            ],
        }
    }
}

/// URL校验器
///
/// 把一个原始URL和端点角色变成恰好一条校验结论：
/// 协议回退、跳转域名比对、状态码分类和内容启发式都在这里完成
pub struct EndpointValidator {
    fetcher: ResilientFetcher,
    content_rules: ContentRules,
}

impl EndpointValidator {
    /// 创建新的校验器实例
    ///
    /// # 参数
    ///
    /// * `fetcher` - 弹性抓取器
    /// * `content_rules` - 浏览器内容启发式规则
    pub fn new(fetcher: ResilientFetcher, content_rules: ContentRules) -> Self {
        Self {
            fetcher,
            content_rules,
        }
    }

    /// 校验单个端点
    ///
    /// 缺少协议前缀的URL按`https://`处理；HTTPS失败时回退到明文HTTP
    /// 再试一次。任何失败都会被转换为结论，不会向上抛出
    ///
    /// # 参数
    ///
    /// * `raw_url` - 数据源中的原始URL
    /// * `kind` - 端点角色
    ///
    /// # 返回值
    ///
    /// 该端点的校验结论
    pub async fn validate(&self, raw_url: &str, kind: EndpointKind) -> ValidationVerdict {
        let url = url_utils::ensure_scheme(raw_url);
        let originally_https = url.starts_with("https://");

        let verdict = match self.fetcher.fetch_with_retry(&url, TlsMode::Lenient).await {
            Ok(outcome) => self.classify_response(&url, kind, originally_https, &outcome),
            Err(primary_error) if originally_https => {
                self.fallback_to_http(&url, primary_error).await
            }
            Err(error) => Self::connection_error(&url, &error),
        };

        debug!(url = %verdict.source_url, kind = ?verdict.kind, "Endpoint validated");
        verdict
    }

    /// HTTPS不可达时用明文HTTP再试一次
    ///
    /// 回退使用严格TLS配置无关紧要（明文请求不走TLS）；回退成功时
    /// 可达性优先于协议纯度，报告为协议降级
    async fn fallback_to_http(
        &self,
        https_url: &str,
        primary_error: ProbeError,
    ) -> ValidationVerdict {
        let http_url = url_utils::downgrade_to_http(https_url);

        match self.fetcher.fetch_with_retry(&http_url, TlsMode::Strict).await {
            Ok(outcome) => {
                // A redirect to an unrelated domain outranks the downgrade finding
                if url_utils::is_cross_domain_redirect(&http_url, &outcome.final_url) {
                    return Self::domain_redirect(&http_url, &outcome.final_url);
                }

                ValidationVerdict {
                    source_url: https_url.to_string(),
                    kind: VerdictKind::ProtocolDowngrade,
                    message: format!("HTTPS is invalid, but HTTP works ({})", http_url),
                    severity: Severity::Warning,
                }
            }
            Err(_) => Self::connection_error(https_url, &primary_error),
        }
    }

    fn classify_response(
        &self,
        url: &str,
        kind: EndpointKind,
        originally_https: bool,
        outcome: &FetchOutcome,
    ) -> ValidationVerdict {
        // The domain check fires first: a same-domain redirect that merely
        // changes scheme must not be reported as a redirect
        if url_utils::is_cross_domain_redirect(url, &outcome.final_url) {
            return Self::domain_redirect(url, &outcome.final_url);
        }

        if originally_https && outcome.final_url.starts_with("http://") {
            return ValidationVerdict {
                source_url: url.to_string(),
                kind: VerdictKind::ProtocolDowngrade,
                message: format!("HTTPS is invalid, but HTTP works ({})", url),
                severity: Severity::Warning,
            };
        }

        if !outcome.is_success() {
            return Self::client_error(url, outcome.status);
        }

        if kind == EndpointKind::Explorer && !self.looks_like_explorer(&outcome.body) {
            return ValidationVerdict {
                source_url: url.to_string(),
                kind: VerdictKind::ContentInvalid,
                message: format!(
                    "Page loads but does not look like an explorer instance ({})",
                    url
                ),
                severity: Severity::Critical,
            };
        }

        ValidationVerdict::ok(url)
    }

    fn looks_like_explorer(&self, body: &str) -> bool {
        let haystack = body.to_lowercase();

        let has_tokens = !self.content_rules.required_tokens.is_empty()
            && self
                .content_rules
                .required_tokens
                .iter()
                .all(|token| haystack.contains(&token.to_lowercase()));

        let has_marker = self
            .content_rules
            .bootstrap_markers
            .iter()
            .any(|marker| haystack.contains(&marker.to_lowercase()));

        has_tokens || has_marker
    }

    fn client_error(url: &str, status: u16) -> ValidationVerdict {
        if RESTRICTED_STATUSES.contains(&status) {
            ValidationVerdict {
                source_url: url.to_string(),
                kind: VerdictKind::ClientError,
                message: format!("URL exists but access is restricted (HTTP {}) ({})", status, url),
                severity: Severity::Warning,
            }
        } else {
            ValidationVerdict {
                source_url: url.to_string(),
                kind: VerdictKind::ClientError,
                message: format!("HTTP error! status: {} ({})", status, url),
                severity: Severity::Critical,
            }
        }
    }

    fn domain_redirect(url: &str, final_url: &str) -> ValidationVerdict {
        ValidationVerdict {
            source_url: url.to_string(),
            kind: VerdictKind::DomainRedirect,
            message: format!(
                "URL redirects to different domain => {} ({})",
                url_utils::normalize_domain(final_url),
                url
            ),
            severity: Severity::Warning,
        }
    }

    fn connection_error(url: &str, error: &ProbeError) -> ValidationVerdict {
        ValidationVerdict {
            source_url: url.to_string(),
            kind: VerdictKind::ConnectionError,
            message: format!("URL is unreachable ({}): {}", url, error),
            severity: Severity::Critical,
        }
    }
}

#[cfg(test)]
#[path = "endpoint_validator_test.rs"]
mod tests;
