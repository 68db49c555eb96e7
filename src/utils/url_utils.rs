// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 提取URL的父域名（取主机名最后两段标签）
///
/// 解析失败时原样返回输入，调用方永远不会因此失败
pub fn normalize_domain(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => {
                let labels: Vec<&str> = host.split('.').collect();
                if labels.len() > 2 {
                    labels[labels.len() - 2..].join(".")
                } else {
                    host.to_string()
                }
            }
            None => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// 判断最终URL是否跳转到了不同的父域名
pub fn is_cross_domain_redirect(original: &str, final_url: &str) -> bool {
    normalize_domain(original) != normalize_domain(final_url)
}

/// 为缺少协议前缀的URL补上`https://`
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// 将`https://`URL降级为等价的`http://`URL
pub fn downgrade_to_http(url: &str) -> String {
    match url.strip_prefix("https://") {
        Some(rest) => format!("http://{}", rest),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain_takes_last_two_labels() {
        assert_eq!(normalize_domain("https://foo.bar.com"), "bar.com");
        assert_eq!(normalize_domain("https://other.com/x"), "other.com");
        assert_eq!(normalize_domain("https://a.b.c.example.org/path?q=1"), "example.org");
    }

    #[test]
    fn test_normalize_domain_short_hosts() {
        assert_eq!(normalize_domain("http://localhost:3000"), "localhost");
        assert_eq!(normalize_domain("https://example.com"), "example.com");
    }

    #[test]
    fn test_normalize_domain_unparseable_input_is_returned_unchanged() {
        assert_eq!(normalize_domain("not a url"), "not a url");
        assert_eq!(normalize_domain(""), "");
    }

    #[test]
    fn test_cross_domain_redirect() {
        assert!(is_cross_domain_redirect(
            "https://foo.bar.com",
            "https://other.com/x"
        ));
        assert!(!is_cross_domain_redirect(
            "https://foo.bar.com",
            "https://sub.bar.com"
        ));
    }

    #[test]
    fn test_ensure_scheme_prefixes_https() {
        assert_eq!(ensure_scheme("example.com"), "https://example.com");
        assert_eq!(ensure_scheme("https://example.com"), "https://example.com");
        assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
    }

    #[test]
    fn test_downgrade_to_http() {
        assert_eq!(downgrade_to_http("https://example.com/a"), "http://example.com/a");
        assert_eq!(downgrade_to_http("http://example.com"), "http://example.com");
    }
}
