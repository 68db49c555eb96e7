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

use chaincheck::config::settings::Settings;
use chaincheck::domain::models::chain;
use chaincheck::domain::services::endpoint_validator::EndpointValidator;
use chaincheck::engines::fetcher::ResilientFetcher;
use chaincheck::engines::http_probe::ReqwestProbe;
use chaincheck::queue::dispatcher::Dispatcher;
use chaincheck::report::render;
use chaincheck::utils::telemetry;
use chaincheck::workers::batch_runner::BatchRunner;
use chaincheck::workers::progress::ConsoleProgress;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并执行一次校验运行
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting chaincheck...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Load the chain registry (the only failure that aborts a run)
    let registry = chain::load_registry(Path::new(&settings.input.path))?;
    info!(chains = registry.len(), "Chain registry loaded");

    // 4. Assemble the validation pipeline
    let dispatcher = Arc::new(Dispatcher::new(settings.dispatcher_config()));
    let probe = Arc::new(ReqwestProbe::new()?);
    let fetcher = ResilientFetcher::new(probe, dispatcher, settings.fetcher_config());
    let validator = Arc::new(EndpointValidator::new(fetcher, settings.content_rules()));
    let runner = BatchRunner::new(validator, Arc::new(ConsoleProgress));

    // 5. Run the batch validation
    let report = runner.run(&registry).await;

    // 6. Render the report and hand it to its sink
    let rendered = render::render(&report, settings.report.format);
    render::write_report(Path::new(&settings.report.path), &rendered)?;
    info!(
        path = %settings.report.path,
        issues = report.entries().len(),
        warnings = report.warning_count(),
        criticals = report.critical_count(),
        "Report written"
    );

    // Dead remote hosts are report severity, not process exit status
    Ok(())
}
