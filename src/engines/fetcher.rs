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
use crate::queue::dispatcher::Dispatcher;
use crate::utils::retry_policy::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// 弹性抓取配置
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// 单次尝试的超时时间
    pub attempt_timeout: Duration,
    /// 重试策略
    pub policy: RetryPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(5000),
            policy: RetryPolicy::default(),
        }
    }
}

/// 弹性抓取器
///
/// 执行一次逻辑HTTP GET：每次物理尝试经过调度器并受超时约束，
/// 瞬时失败按重试策略重试，最终返回响应或错误
pub struct ResilientFetcher {
    probe: Arc<dyn EndpointProbe>,
    dispatcher: Arc<Dispatcher>,
    config: FetcherConfig,
}

impl ResilientFetcher {
    /// 创建新的弹性抓取器实例
    ///
    /// # 参数
    ///
    /// * `probe` - 端点探测引擎
    /// * `dispatcher` - 共享限流调度器
    /// * `config` - 抓取配置
    pub fn new(
        probe: Arc<dyn EndpointProbe>,
        dispatcher: Arc<Dispatcher>,
        config: FetcherConfig,
    ) -> Self {
        Self {
            probe,
            dispatcher,
            config,
        }
    }

    /// 带重试地抓取一个URL
    ///
    /// 每个URL最多尝试 `max_retries + 1` 次；只有瞬时失败（超时、
    /// 连接层错误）才会重试，HTTP错误状态作为结果返回交给上层分类
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `tls` - TLS校验模式
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchOutcome)` - 最终响应
    /// * `Err(ProbeError)` - 所有尝试都失败后的最后一个错误
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        tls: TlsMode,
    ) -> Result<FetchOutcome, ProbeError> {
        let mut retries: u32 = 0;

        loop {
            match self.attempt(url, tls).await {
                Ok(outcome) => {
                    debug!(url, status = outcome.status, "Fetch succeeded");
                    return Ok(outcome);
                }
                Err(error) => {
                    if !error.is_transient() || !self.config.policy.should_retry(retries) {
                        return Err(error);
                    }
                    retries += 1;
                    let backoff = self.config.policy.calculate_backoff(retries);
                    warn!(url, retry = retries, error = %error, "Transient fetch failure, retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn attempt(&self, url: &str, tls: TlsMode) -> Result<FetchOutcome, ProbeError> {
        let timeout = self.config.attempt_timeout;
        self.dispatcher
            .submit(async {
                // The timer starts once execution begins, so it bounds the
                // attempt itself rather than time spent waiting in the queue
                match tokio::time::timeout(timeout, self.probe.fetch(url, tls)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProbeError::Timeout),
                }
            })
            .await
    }
}
