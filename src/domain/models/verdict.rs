// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::fmt;

/// 端点角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum EndpointKind {
    /// 项目官网
    Website,
    /// 区块浏览器
    Explorer,
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKind::Website => write!(f, "Website"),
            EndpointKind::Explorer => write!(f, "Explorer"),
        }
    }
}

/// 结论严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// 无问题
    None,
    /// 警告
    Warning,
    /// 严重
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::None => write!(f, "NONE"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// 结论类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerdictKind {
    /// 端点健康
    Ok,
    /// 跳转到了不同父域名
    DomainRedirect,
    /// HTTPS不可用但HTTP可用
    ProtocolDowngrade,
    /// HTTP错误状态
    ClientError,
    /// 页面内容不像浏览器实例
    ContentInvalid,
    /// 连接失败
    ConnectionError,
}

/// 单个URL的校验结论
///
/// 每次运行中每个输入URL恰好产生一条结论，永远不会部分填充
#[derive(Debug, Clone, Serialize)]
pub struct ValidationVerdict {
    /// 被校验的URL（补全协议后）
    pub source_url: String,
    /// 结论类型
    pub kind: VerdictKind,
    /// 人类可读的说明
    pub message: String,
    /// 严重级别
    pub severity: Severity,
}

impl ValidationVerdict {
    /// 构造健康结论
    pub fn ok(url: &str) -> Self {
        Self {
            source_url: url.to_string(),
            kind: VerdictKind::Ok,
            message: String::new(),
            severity: Severity::None,
        }
    }

    /// 端点是否健康
    pub fn is_ok(&self) -> bool {
        self.kind == VerdictKind::Ok
    }
}
