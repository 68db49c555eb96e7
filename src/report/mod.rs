// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 报告渲染
pub mod render;

use crate::domain::models::verdict::{EndpointKind, Severity};
use serde::Serialize;
use thiserror::Error;

/// 报告写入错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// 报告行
///
/// 只有非健康结论才会产生报告行
#[derive(Debug, Clone, Serialize)]
pub struct ChainReportEntry {
    /// 所属链ID
    pub chain_id: String,
    /// 所属链名称
    pub chain_name: String,
    /// 端点角色
    pub endpoint_kind: EndpointKind,
    /// 被校验的URL
    pub url: String,
    /// 问题说明
    pub message: String,
    /// 严重级别
    pub severity: Severity,
}

/// 单次运行的汇总报告
///
/// 运行开始时为空，结论产生后追加，运行结束时定稿并交给外部接收方
#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<ChainReportEntry>,
    completed: usize,
    total: usize,
}

impl RunReport {
    /// 创建空报告
    ///
    /// # 参数
    ///
    /// * `total` - 本次运行要校验的链总数
    pub fn new(total: usize) -> Self {
        Self {
            entries: Vec::new(),
            completed: 0,
            total,
        }
    }

    /// 追加一批报告行
    pub fn extend(&mut self, entries: Vec<ChainReportEntry>) {
        self.entries.extend(entries);
    }

    /// 记录一条链校验完成，返回当前完成数
    pub fn mark_chain_completed(&mut self) -> usize {
        self.completed += 1;
        self.completed
    }

    /// 已完成的链数
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// 链总数
    pub fn total(&self) -> usize {
        self.total
    }

    /// 报告行
    pub fn entries(&self) -> &[ChainReportEntry] {
        &self.entries
    }

    /// 所有端点都健康
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    /// 警告行数
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Warning)
            .count()
    }

    /// 严重行数
    pub fn critical_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Critical)
            .count()
    }

    /// 定稿报告
    ///
    /// 完成顺序是不确定的，定稿时按（链ID、端点角色、URL）稳定排序，
    /// 保证同一数据集的多次运行产生逐字节相同的报告
    pub fn finalize(&mut self) {
        self.entries.sort_by(|a, b| {
            a.chain_id
                .cmp(&b.chain_id)
                .then_with(|| a.endpoint_kind.cmp(&b.endpoint_kind))
                .then_with(|| a.url.cmp(&b.url))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(chain_id: &str, kind: EndpointKind, url: &str) -> ChainReportEntry {
        ChainReportEntry {
            chain_id: chain_id.to_string(),
            chain_name: format!("Chain {}", chain_id),
            endpoint_kind: kind,
            url: url.to_string(),
            message: "HTTP error! status: 500".to_string(),
            severity: Severity::Critical,
        }
    }

    #[test]
    fn test_finalize_sorts_by_chain_then_kind_then_url() {
        let mut report = RunReport::new(3);
        report.extend(vec![
            entry("2", EndpointKind::Explorer, "https://scan.two.example"),
            entry("1", EndpointKind::Explorer, "https://scan.one.example"),
            entry("1", EndpointKind::Website, "https://one.example"),
        ]);
        report.finalize();

        let keys: Vec<(&str, EndpointKind)> = report
            .entries()
            .iter()
            .map(|e| (e.chain_id.as_str(), e.endpoint_kind))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("1", EndpointKind::Website),
                ("1", EndpointKind::Explorer),
                ("2", EndpointKind::Explorer),
            ]
        );
    }

    #[test]
    fn test_counts_by_severity() {
        let mut report = RunReport::new(1);
        let mut warning = entry("1", EndpointKind::Website, "https://one.example");
        warning.severity = Severity::Warning;
        report.extend(vec![
            warning,
            entry("1", EndpointKind::Explorer, "https://scan.one.example"),
        ]);

        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.critical_count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_completion_counter_is_monotonic() {
        let mut report = RunReport::new(2);
        assert_eq!(report.mark_chain_completed(), 1);
        assert_eq!(report.mark_chain_completed(), 2);
        assert_eq!(report.completed(), 2);
    }
}
