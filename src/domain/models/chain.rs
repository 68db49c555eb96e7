// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// 链数据加载错误类型
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read chains file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse chains file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 浏览器端点
///
/// 一条链的单个区块浏览器实例
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerEndpoint {
    /// 浏览器URL
    pub url: String,
    /// 托管方标签（仅作信息展示）
    #[serde(rename = "hostedBy", default)]
    pub hosted_by: String,
}

/// 链记录
///
/// 由外部数据源持有，本核心只读
#[derive(Debug, Clone, Deserialize)]
pub struct ChainRecord {
    /// 链名称
    pub name: String,
    /// 项目官网URL
    pub website: String,
    /// 浏览器端点列表（可能为空）
    #[serde(default)]
    pub explorers: Vec<ExplorerEndpoint>,
}

/// 按链ID有序的链记录映射
pub type ChainRegistry = BTreeMap<String, ChainRecord>;

/// 从JSON文件加载链注册表
///
/// 数据形如 `{ [chainId]: { name, website, explorers: [{url, hostedBy}], ... } }`，
/// 本核心之外的字段会被忽略
///
/// # 参数
///
/// * `path` - JSON文件路径
///
/// # 返回值
///
/// * `Ok(ChainRegistry)` - 加载成功的注册表
/// * `Err(RegistryError)` - 读取或解析失败
pub fn load_registry(path: &Path) -> Result<ChainRegistry, RegistryError> {
    let raw = std::fs::read_to_string(path)?;
    let registry: ChainRegistry = serde_json::from_str(&raw)?;
    Ok(registry)
}
