// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::verdict::Severity;
use crate::report::{ReportError, RunReport};
use chrono::Utc;
use serde::Deserialize;
use std::path::Path;

/// 报告输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// 按链分组的叙述式列表
    Narrative,
    /// Markdown表格
    Table,
}

/// 按指定格式渲染报告
pub fn render(report: &RunReport, format: ReportFormat) -> String {
    match format {
        ReportFormat::Narrative => render_narrative(report),
        ReportFormat::Table => render_table(report),
    }
}

/// 叙述式渲染
///
/// 每条有问题的链一个`**{name} ({id})**`标题，其后跟随
/// `- Website:` / `- Explorer:` 问题行
pub fn render_narrative(report: &RunReport) -> String {
    if report.is_clean() {
        return format!("All {} chains validated clean.\n", report.total());
    }

    let mut out = String::new();
    let mut current_chain: Option<&str> = None;

    for entry in report.entries() {
        if current_chain != Some(entry.chain_id.as_str()) {
            if current_chain.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("**{} ({})**\n", entry.chain_name, entry.chain_id));
            current_chain = Some(&entry.chain_id);
        }
        out.push_str(&format!("- {}: {}\n", entry.endpoint_kind, entry.message));
    }

    out.push('\n');
    out
}

/// 表格式渲染
pub fn render_table(report: &RunReport) -> String {
    let mut out = String::from("| ID | Name | Type | URL | Issue | Severity |\n");
    out.push_str("|---|---|---|---|---|---|\n");

    for entry in report.entries() {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            entry.chain_id,
            entry.chain_name,
            entry.endpoint_kind,
            entry.url,
            entry.message,
            severity_marker(entry.severity)
        ));
    }

    out.push_str(&format!(
        "\n_Generated: {}_\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "⚠ WARNING",
        Severity::Critical => "✗ CRITICAL",
        Severity::None => "-",
    }
}

/// 把渲染好的报告写入目标文件
///
/// # 参数
///
/// * `path` - 输出路径
/// * `content` - 渲染好的报告内容
pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content)?;
    Ok(())
}
