// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/model/tract_classifier.rs - 基于 tract 的分类模型
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

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};
use tract_onnx::prelude::*;
use url::Url;

use crate::{
  FromUrl,
  frame::{NormalizedNhwcFrame, RGB_CHANNELS},
  label::{Confidences, Freshness},
  model::Model,
  utils::url_to_path,
};

const CLASSIFIER_NUM_INPUTS: usize = 1;
const CLASSIFIER_NUM_OUTPUTS: usize = 1;

type RunnablePlan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

#[derive(Error, Debug)]
pub enum TractClassifierError {
  #[error("模型加载错误: {0}")]
  ModelLoadError(#[from] std::io::Error),
  #[error("模型无效: {0}")]
  ModelInvalid(String),
  #[error("Tract 错误: {0}")]
  TractError(#[from] TractError),
  #[error("模型输出数量不符: 期望 {expected} 个值, 实际 {actual} 个")]
  UnexpectedOutput { expected: usize, actual: usize },
  #[error("模型路径错误: {0}")]
  ModelPathError(String),
}

/// 模型文件格式，由 URL 方案决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
  Onnx,
  #[cfg(feature = "tflite")]
  Tflite,
}

impl ModelFormat {
  pub fn from_scheme(scheme: &str) -> Option<Self> {
    match scheme {
      "onnx" => Some(ModelFormat::Onnx),
      #[cfg(feature = "tflite")]
      "tflite" => Some(ModelFormat::Tflite),
      _ => None,
    }
  }
}

pub struct TractClassifierBuilder {
  model_path: PathBuf,
  format: ModelFormat,
}

impl FromUrl for TractClassifierBuilder {
  type Error = TractClassifierError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    let format = ModelFormat::from_scheme(url.scheme()).ok_or_else(|| {
      TractClassifierError::ModelPathError(format!("不支持的模型方案: {}", url.scheme()))
    })?;

    let model_path = url_to_path(url);
    if model_path.as_os_str().is_empty() || model_path == PathBuf::from("/") {
      return Err(TractClassifierError::ModelPathError(format!(
        "模型 URL 缺少文件路径: {}",
        url
      )));
    }

    Ok(TractClassifierBuilder { model_path, format })
  }
}

impl TractClassifierBuilder {
  pub fn new(model_path: impl Into<PathBuf>, format: ModelFormat) -> Self {
    Self {
      model_path: model_path.into(),
      format,
    }
  }

  pub fn build<const W: u32, const H: u32>(
    self,
  ) -> Result<TractClassifier<W, H>, TractClassifierError> {
    info!("加载模型文件: {}", self.model_path.display());
    // 文件缺失或不可读时报告 I/O 错误，而不是 tract 的解析错误
    let metadata = std::fs::metadata(&self.model_path)?;
    debug!(
      "模型文件大小: {:.2} MB",
      metadata.len() as f64 / (1024.0 * 1024.0)
    );

    info!("创建 tract 推理计划 ({:?})", self.format);
    let plan = Self::load_plan(self.format, &self.model_path, W as usize, H as usize)?;

    let num_inputs = plan.model().inputs.len();
    let num_outputs = plan.model().outputs.len();
    if num_inputs != CLASSIFIER_NUM_INPUTS || num_outputs != CLASSIFIER_NUM_OUTPUTS {
      let msg = format!(
        "预期模型输入/输出数量为 {}/{}, 实际为 {}/{}",
        CLASSIFIER_NUM_INPUTS, CLASSIFIER_NUM_OUTPUTS, num_inputs, num_outputs
      );
      error!("{}", msg);
      return Err(TractClassifierError::ModelInvalid(msg));
    }

    let output_fact = plan.model().output_fact(0)?;
    if let Some(shape) = output_fact.shape.as_concrete() {
      let volume: usize = shape.iter().product();
      if volume != Freshness::COUNT {
        let msg = format!(
          "预期模型输出 {} 个类别, 实际输出形状为 {:?}",
          Freshness::COUNT,
          shape
        );
        error!("{}", msg);
        return Err(TractClassifierError::ModelInvalid(msg));
      }
    }

    debug!("模型输入数量: {}", num_inputs);
    debug!("模型输出数量: {}", num_outputs);
    info!("模型加载完成");

    Ok(TractClassifier { plan })
  }

  fn load_plan(
    format: ModelFormat,
    path: &Path,
    width: usize,
    height: usize,
  ) -> TractResult<RunnablePlan> {
    match format {
      ModelFormat::Onnx => tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(0, f32::fact([1, height, width, RGB_CHANNELS]).into())?
        .into_optimized()?
        .into_runnable(),
      #[cfg(feature = "tflite")]
      ModelFormat::Tflite => tract_tflite::tflite()
        .model_for_path(path)?
        .into_optimized()?
        .into_runnable(),
    }
  }
}

/// 运行在 CPU 上的分类模型，输入为 `[1, H, W, 3]` 的 f32 张量
pub struct TractClassifier<const W: u32, const H: u32> {
  plan: RunnablePlan,
}

impl<const W: u32, const H: u32> TractClassifier<W, H> {
  /// 取第一个输出张量，要求恰好包含三个值
  fn postprocess(outputs: &[TValue]) -> Result<Confidences, TractClassifierError> {
    let output = outputs
      .first()
      .ok_or(TractClassifierError::UnexpectedOutput {
        expected: Freshness::COUNT,
        actual: 0,
      })?;
    let values: Vec<f32> = output.to_array_view::<f32>()?.iter().copied().collect();
    debug!("模型原始输出: {:?}", values);

    <Confidences as TryFrom<&[f32]>>::try_from(values.as_slice()).map_err(|_| {
      TractClassifierError::UnexpectedOutput {
        expected: Freshness::COUNT,
        actual: values.len(),
      }
    })
  }
}

impl<const W: u32, const H: u32> Model for TractClassifier<W, H> {
  type Input = NormalizedNhwcFrame<W, H>;
  type Output = Confidences;
  type Error = TractClassifierError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    debug!("设置模型输入");
    let tensor = input.to_tensor()?;

    debug!("执行模型推理");
    let outputs = self.plan.run(tvec!(tensor.into_tvalue()))?;

    Self::postprocess(&outputs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  type Classifier = TractClassifier<224, 224>;

  #[test]
  fn test_postprocess_takes_three_values() {
    let outputs = [tensor2(&[[0.1f32, 0.7, 0.2]]).into_tvalue()];
    let confidences = Classifier::postprocess(&outputs).unwrap();
    assert_eq!(confidences, [0.1, 0.7, 0.2]);
  }

  #[test]
  fn test_postprocess_rejects_wrong_length() {
    let outputs = [tensor1(&[0.1f32, 0.9]).into_tvalue()];
    match Classifier::postprocess(&outputs) {
      Err(TractClassifierError::UnexpectedOutput { expected, actual }) => {
        assert_eq!(expected, 3);
        assert_eq!(actual, 2);
      }
      other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
  }

  #[test]
  fn test_postprocess_rejects_empty_outputs() {
    assert!(matches!(
      Classifier::postprocess(&[]),
      Err(TractClassifierError::UnexpectedOutput { actual: 0, .. })
    ));
  }

  #[test]
  fn test_builder_scheme() {
    let url = Url::parse("onnx:///opt/models/meat.onnx").unwrap();
    let builder = TractClassifierBuilder::from_url(&url).unwrap();
    assert_eq!(builder.format, ModelFormat::Onnx);
    assert_eq!(builder.model_path, PathBuf::from("/opt/models/meat.onnx"));

    let url = Url::parse("pytorch:///opt/models/meat.pt").unwrap();
    assert!(matches!(
      TractClassifierBuilder::from_url(&url),
      Err(TractClassifierError::ModelPathError(_))
    ));

    let url = Url::parse("onnx:///").unwrap();
    assert!(TractClassifierBuilder::from_url(&url).is_err());
  }

  #[test]
  fn test_missing_model_file() {
    let builder = TractClassifierBuilder::new("/nonexistent/model.onnx", ModelFormat::Onnx);
    assert!(matches!(
      builder.build::<224, 224>(),
      Err(TractClassifierError::ModelLoadError(_))
    ));
  }

  #[test]
  fn test_garbage_model_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.onnx");
    std::fs::write(&path, b"definitely not a protobuf model").unwrap();
    let builder = TractClassifierBuilder::new(&path, ModelFormat::Onnx);
    assert!(builder.build::<224, 224>().is_err());
  }
}
