// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/bin/classify.rs - 单张图像鲜度分类
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

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use xianrou::{
  FromUrl,
  classifier::Classifier,
  frame::MODEL_INPUT_SIDE,
  input::InputWrapper,
  model::{FreshnessClassifier, TractClassifierBuilder},
  output::{OutputList, render_notice},
  task::{OneShotTask, Task},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 模型文件，例如 onnx:///path/to/model.onnx
  #[arg(long, value_name = "MODEL")]
  pub model: Url,
  /// 输入来源，gallery:///path/to/image.jpg 或 camera:///dev/video0
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 输出目标，可以重复指定
  #[arg(long, value_name = "OUTPUT", default_value = "console:")]
  pub output: Vec<Url>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();

  info!("模型文件: {}", args.model);
  info!("输入来源: {}", args.input);

  let input = InputWrapper::from_url(&args.input)?;
  let output = OutputList::from_urls(&args.output)?;

  let loaded = TractClassifierBuilder::from_url(&args.model)
    .and_then(|builder| builder.build::<MODEL_INPUT_SIDE, MODEL_INPUT_SIDE>());
  let (classifier, notice): (Classifier<FreshnessClassifier>, _) = Classifier::load(loaded);
  if let Some(notice) = notice {
    render_notice(&output, notice);
  }

  OneShotTask.run_task(input, &classifier, &output)?;

  Ok(())
}
