// 该文件是 Xianrou （鲜肉） 项目的一部分。
// tests/tract_model.rs - tract 模型加载与推理测试
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

use std::path::PathBuf;

use image::{Rgb, RgbImage};
use url::Url;

use xianrou::{
  FromUrl,
  classifier::Classifier,
  frame::MODEL_INPUT_SIDE,
  label::Freshness,
  model::{FreshnessClassifier, ModelFormat, TractClassifierBuilder, TractClassifierError},
  utils::path_to_url,
};

/// 单个 ReduceMean 节点：`[1,224,224,3]` 在 H、W 上求均值得到 `[1,3]`
fn channel_mean_model() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/channel_mean.onnx")
}

/// 只在 H 上求均值，输出 `[1,224,3]`
fn row_mean_model() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/row_mean.onnx")
}

fn load(path: PathBuf) -> Result<FreshnessClassifier, TractClassifierError> {
  TractClassifierBuilder::new(path, ModelFormat::Onnx).build::<MODEL_INPUT_SIDE, MODEL_INPUT_SIDE>()
}

fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
  for (a, e) in actual.iter().zip(expected.iter()) {
    assert!((a - e).abs() < 1e-3, "{:?} != {:?}", actual, expected);
  }
}

#[test]
fn forward_pass_through_real_plan() {
  let classifier = Classifier::new(load(channel_mean_model()).unwrap());

  let image = RgbImage::from_pixel(640, 480, Rgb([255, 0, 51]));
  let outcome = classifier.classify(&image).unwrap();
  let prediction = outcome.prediction().unwrap();
  assert_eq!(prediction.kind, Freshness::Fresh);
  assert_close(prediction.confidences, [1.0, 0.0, 0.2]);

  let image = RgbImage::from_pixel(100, 300, Rgb([0, 0, 255]));
  let outcome = classifier.classify(&image).unwrap();
  let prediction = outcome.prediction().unwrap();
  assert_eq!(prediction.kind, Freshness::Spoiled);
  assert_close(prediction.confidences, [0.0, 0.0, 1.0]);
}

#[test]
fn model_loaded_from_url() {
  let url: Url = path_to_url("onnx", &channel_mean_model()).unwrap();
  let loaded = TractClassifierBuilder::from_url(&url)
    .and_then(|builder| builder.build::<MODEL_INPUT_SIDE, MODEL_INPUT_SIDE>());
  let (classifier, notice): (Classifier<FreshnessClassifier>, _) = Classifier::load(loaded);
  assert!(notice.is_none());
  assert!(classifier.is_initialized());

  let image = RgbImage::from_pixel(224, 224, Rgb([10, 200, 30]));
  let outcome = classifier.classify(&image).unwrap();
  assert_eq!(outcome.prediction().map(|p| p.kind), Some(Freshness::Borderline));
}

#[test]
fn output_with_wrong_volume_is_rejected_at_load() {
  match load(row_mean_model()) {
    Err(TractClassifierError::ModelInvalid(message)) => {
      assert!(message.contains("[1, 224, 3]"), "{}", message);
    }
    Err(e) => panic!("unexpected error: {}", e),
    Ok(_) => panic!("model with [1,224,3] output was accepted"),
  }
}

#[test]
fn missing_model_file_is_an_io_error() {
  assert!(matches!(
    load(PathBuf::from("/nonexistent/xianrou/model.onnx")),
    Err(TractClassifierError::ModelLoadError(_))
  ));
}
