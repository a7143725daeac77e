// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/main.rs - 交互式鲜度分类
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xianrou::{
  FromUrl,
  classifier::Classifier,
  frame::MODEL_INPUT_SIDE,
  model::{FreshnessClassifier, TractClassifierBuilder},
  output::{OutputList, render_notice},
  task::{EventLoopTask, Task},
};

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = args::Args::parse();

  info!("模型文件: {}", args.model);
  info!("摄像头: {}", args.camera);
  for output in &args.output {
    info!("输出: {}", output);
  }

  let output = OutputList::from_urls(&args.output)?;

  // 模型只在启动时加载一次，失败后继续运行
  let loaded = TractClassifierBuilder::from_url(&args.model)
    .and_then(|builder| builder.build::<MODEL_INPUT_SIDE, MODEL_INPUT_SIDE>());
  let (classifier, notice): (Classifier<FreshnessClassifier>, _) = Classifier::load(loaded);
  if let Some(notice) = notice {
    render_notice(&output, notice);
  }

  let stdin = std::io::stdin();
  EventLoopTask::new(args.camera).run_task(stdin.lock(), &classifier, &output)?;

  Ok(())
}
