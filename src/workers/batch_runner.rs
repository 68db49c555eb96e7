// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::chain::{ChainRecord, ChainRegistry};
use crate::domain::models::verdict::{EndpointKind, ValidationVerdict};
use crate::domain::services::endpoint_validator::EndpointValidator;
use crate::report::{ChainReportEntry, RunReport};
use crate::workers::progress::ProgressSink;
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

/// 批量校验执行器
///
/// 把校验扇出到所有链上并汇总报告。链之间、同一条链的官网与
/// 各浏览器之间都并发执行；实际网络并发只受共享调度器约束，
/// 链的数量只影响队列深度
pub struct BatchRunner {
    validator: Arc<EndpointValidator>,
    progress: Arc<dyn ProgressSink>,
}

impl BatchRunner {
    /// 创建新的批量执行器实例
    ///
    /// # 参数
    ///
    /// * `validator` - URL校验器
    /// * `progress` - 进度接收方
    pub fn new(validator: Arc<EndpointValidator>, progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            validator,
            progress,
        }
    }

    /// 执行一次完整的校验运行
    ///
    /// 单个端点的失败永远不会中断其他链的校验；运行总是完成并
    /// 产出报告（可能为空，表示全部健康）
    ///
    /// # 参数
    ///
    /// * `registry` - 链注册表
    ///
    /// # 返回值
    ///
    /// 定稿后的运行报告
    pub async fn run(&self, registry: &ChainRegistry) -> RunReport {
        let total = registry.len();
        info!(total, "Starting chain validation run");

        let mut tasks = JoinSet::new();
        for (id, chain) in registry {
            let validator = self.validator.clone();
            let id = id.clone();
            let chain = chain.clone();
            tasks.spawn(async move { validate_chain(validator, id, chain).await });
        }

        let mut report = RunReport::new(total);
        // Single collection point: the completion counter, the progress
        // callback and the report append all happen serially here
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entries) => report.extend(entries),
                Err(join_error) => error!(%join_error, "Chain validation task failed"),
            }
            let completed = report.mark_chain_completed();
            self.progress.on_chain_completed(completed, total);
        }

        report.finalize();
        info!(
            issues = report.entries().len(),
            warnings = report.warning_count(),
            criticals = report.critical_count(),
            "Validation run finished"
        );
        report
    }
}

/// 校验一条链的所有端点
///
/// 官网和各浏览器互不依赖，放在一起并发执行
async fn validate_chain(
    validator: Arc<EndpointValidator>,
    id: String,
    chain: ChainRecord,
) -> Vec<ChainReportEntry> {
    let website = validator.validate(&chain.website, EndpointKind::Website);
    let explorers = join_all(
        chain
            .explorers
            .iter()
            .map(|explorer| validator.validate(&explorer.url, EndpointKind::Explorer)),
    );
    let (website_verdict, explorer_verdicts) = tokio::join!(website, explorers);

    let mut entries = Vec::new();
    push_entry(
        &mut entries,
        &id,
        &chain.name,
        EndpointKind::Website,
        website_verdict,
    );
    for verdict in explorer_verdicts {
        push_entry(&mut entries, &id, &chain.name, EndpointKind::Explorer, verdict);
    }
    entries
}

fn push_entry(
    entries: &mut Vec<ChainReportEntry>,
    id: &str,
    name: &str,
    kind: EndpointKind,
    verdict: ValidationVerdict,
) {
    if verdict.is_ok() {
        return;
    }
    entries.push(ChainReportEntry {
        chain_id: id.to_string(),
        chain_name: name.to_string(),
        endpoint_kind: kind,
        url: verdict.source_url,
        message: verdict.message,
        severity: verdict.severity,
    });
}

#[cfg(test)]
#[path = "batch_runner_test.rs"]
mod tests;
