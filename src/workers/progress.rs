// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::io::Write;

/// 进度接收方
///
/// 每条链校验完成后由聚合器同步调用，实现方无需考虑并发
pub trait ProgressSink: Send + Sync {
    /// 一条链（官网加全部浏览器）校验完成
    fn on_chain_completed(&self, completed: usize, total: usize);
}

/// 控制台进度：单行原地刷新
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn on_chain_completed(&self, completed: usize, total: usize) {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\rChecking chains... [{}/{}]", completed, total);
        let _ = stderr.flush();
        if completed == total {
            let _ = writeln!(stderr);
        }
    }
}

/// 静默进度，测试用
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_chain_completed(&self, _completed: usize, _total: usize) {}
}
