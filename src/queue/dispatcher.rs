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

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// 调度器配置
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// 最大并发执行数
    pub max_concurrency: usize,
    /// 准入时间窗口
    pub admission_interval: Duration,
    /// 每个时间窗口允许的准入次数
    pub admissions_per_interval: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            admission_interval: Duration::from_millis(2000),
            admissions_per_interval: 1,
        }
    }
}

/// 限流调度器
///
/// 所有网络尝试都经过的单一漏斗：并发上限由信号量保证，
/// 准入节奏由间隔配额控制。提交永远不会因容量不足而失败，
/// 调用方会挂起直到有空位
pub struct Dispatcher {
    /// 并发许可
    permits: Arc<Semaphore>,
    /// 准入节流器（窗口或配额为零时禁用）
    pacer: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl Dispatcher {
    /// 创建新的调度器实例
    ///
    /// # 参数
    ///
    /// * `config` - 调度器配置
    ///
    /// # 返回值
    ///
    /// 返回新的调度器实例
    pub fn new(config: DispatcherConfig) -> Self {
        let pacer = NonZeroU32::new(config.admissions_per_interval)
            .and_then(|cap| {
                Quota::with_period(config.admission_interval / cap.get())
                    .map(|quota| quota.allow_burst(cap))
            })
            .map(RateLimiter::direct);

        Self {
            permits: Arc::new(Semaphore::new(config.max_concurrency)),
            pacer,
        }
    }

    /// 提交任务并等待其完成
    ///
    /// 任务按提交顺序准入（信号量是FIFO公平的）；超过并发上限时
    /// 调用方挂起等待，准入后再按间隔配额放行执行
    ///
    /// # 参数
    ///
    /// * `task` - 要执行的任务
    ///
    /// # 返回值
    ///
    /// 任务的输出
    pub async fn submit<F>(&self, task: F) -> F::Output
    where
        F: Future,
    {
        // The semaphore is never closed, acquisition can only fail after close
        let _permit = self.permits.clone().acquire_owned().await.unwrap();

        if let Some(pacer) = &self.pacer {
            pacer.until_ready().await;
        }

        task.await
    }
}
