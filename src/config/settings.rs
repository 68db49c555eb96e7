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

use crate::domain::services::endpoint_validator::ContentRules;
use crate::engines::fetcher::FetcherConfig;
use crate::queue::dispatcher::DispatcherConfig;
use crate::report::render::ReportFormat;
use crate::utils::retry_policy::RetryPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含输入、调度、抓取、校验和报告等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 输入配置
    pub input: InputSettings,
    /// 调度器配置
    pub dispatcher: DispatcherSettings,
    /// 抓取配置
    pub fetcher: FetcherSettings,
    /// 校验配置
    pub validator: ValidatorSettings,
    /// 报告配置
    pub report: ReportSettings,
}

/// 输入配置设置
#[derive(Debug, Deserialize)]
pub struct InputSettings {
    /// 链数据JSON文件路径
    pub path: String,
}

/// 调度器配置设置
#[derive(Debug, Deserialize)]
pub struct DispatcherSettings {
    /// 最大并发执行数
    pub max_concurrency: usize,
    /// 准入时间窗口（毫秒）
    pub admission_interval_ms: u64,
    /// 每个时间窗口允许的准入次数
    pub admissions_per_interval: u32,
}

/// 抓取配置设置
#[derive(Debug, Deserialize)]
pub struct FetcherSettings {
    /// 单次尝试超时时间（毫秒）
    pub attempt_timeout_ms: u64,
    /// 最大重试次数
    pub max_retries: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
}

/// 校验配置设置
#[derive(Debug, Deserialize)]
pub struct ValidatorSettings {
    /// 浏览器正文必须同时包含的关键词
    pub required_tokens: Vec<String>,
    /// 浏览器引导标记
    pub bootstrap_markers: Vec<String>,
}

/// 报告配置设置
#[derive(Debug, Deserialize)]
pub struct ReportSettings {
    /// 报告输出路径
    pub path: String,
    /// 报告输出格式
    pub format: ReportFormat,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("input.path", "data/chains.json")?
            // Default Dispatcher settings
            .set_default("dispatcher.max_concurrency", 5)?
            .set_default("dispatcher.admission_interval_ms", 2000)?
            .set_default("dispatcher.admissions_per_interval", 1)?
            // Default Fetcher settings
            .set_default("fetcher.attempt_timeout_ms", 5000)?
            .set_default("fetcher.max_retries", 2)?
            .set_default("fetcher.initial_backoff_ms", 500)?
            // Default Validator settings
            .set_default("validator.required_tokens", vec!["blocks", "transactions"])?
            .set_default(
                "validator.bootstrap_markers",
                vec!["/static/js/main.", "__blockscout", "etherscan"],
            )?
            // Default Report settings
            .set_default("report.path", "report.md")?
            .set_default("report.format", "narrative")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CHAINCHECK").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 调度器配置
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            max_concurrency: self.dispatcher.max_concurrency,
            admission_interval: Duration::from_millis(self.dispatcher.admission_interval_ms),
            admissions_per_interval: self.dispatcher.admissions_per_interval,
        }
    }

    /// 抓取配置
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            attempt_timeout: Duration::from_millis(self.fetcher.attempt_timeout_ms),
            policy: RetryPolicy {
                max_retries: self.fetcher.max_retries,
                initial_backoff: Duration::from_millis(self.fetcher.initial_backoff_ms),
                ..RetryPolicy::default()
            },
        }
    }

    /// 内容启发式规则
    pub fn content_rules(&self) -> ContentRules {
        ContentRules {
            required_tokens: self.validator.required_tokens.clone(),
            bootstrap_markers: self.validator.bootstrap_markers.clone(),
        }
    }
}
