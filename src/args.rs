// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/args.rs - 命令行参数
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

use clap::Parser;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 模型文件
  /// 支持格式:
  /// - ONNX: onnx:///path/to/model.onnx
  /// - TFLite: tflite:///path/to/model.tflite（需要 tflite 特性）
  #[arg(long, value_name = "MODEL")]
  pub model: Url,

  /// `camera` 命令默认使用的摄像头，例如 camera:///dev/video0?width=640&height=480
  #[arg(long, value_name = "CAMERA", default_value = "camera:///dev/video0")]
  pub camera: Url,

  /// 输出目标，可以重复指定
  /// 支持格式:
  /// - 终端: console:
  /// - 预览图: image:///path/to/preview.png
  /// - 目录记录: folder:///path/to/dir?always&raw
  /// - JSON Lines: json:///path/to/results.jsonl
  #[arg(long, value_name = "OUTPUT", default_value = "console:")]
  pub output: Vec<Url>,
}
