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

use async_trait::async_trait;
use thiserror::Error;

/// 探测错误类型
#[derive(Error, Debug)]
pub enum ProbeError {
    /// 单次尝试超时
    #[error("Request timed out")]
    Timeout,
    /// 请求失败
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ProbeError {
    /// 判断错误是否为瞬时错误
    ///
    /// 瞬时错误（超时、连接层失败）会触发重试；其余错误直接交给上层分类
    ///
    /// # 返回值
    ///
    /// 如果错误是瞬时的则返回true，否则返回false
    pub fn is_transient(&self) -> bool {
        match self {
            ProbeError::Timeout => true,
            ProbeError::Request(e) => e.is_timeout() || e.is_connect(),
        }
    }
}

/// TLS校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// 放宽证书校验（浏览器链经常使用自签名或配置错误的证书）
    Lenient,
    /// 严格证书校验
    Strict,
}

/// 单次网络尝试的结果
///
/// 不做持久化，由校验器立即消费
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// 最终HTTP状态码
    pub status: u16,
    /// 跟随重定向后的最终URL
    pub final_url: String,
    /// 响应正文（内容启发式检查需要）
    pub body: String,
}

impl FetchOutcome {
    /// 状态码是否为2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 端点探测特质
///
/// 执行一次物理HTTP GET；重试、超时与限流都在调用方处理
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// 执行探测
    async fn fetch(&self, url: &str, tls: TlsMode) -> Result<FetchOutcome, ProbeError>;
}
