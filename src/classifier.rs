// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/classifier.rs - 推理引擎生命周期与单次分类流程
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

use std::fmt;

use image::RgbImage;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::{
  frame::ModelInput,
  label::{Confidences, Freshness, Prediction},
  model::Model,
};

/// 模型加载失败时展示一次的提示
pub const MODEL_LOAD_ERROR_MESSAGE: &str = "Error loading model";

/// 模型未初始化时每次分类的结果文本
pub const MODEL_NOT_INITIALIZED_MESSAGE: &str = "Model not initialized";

/// 一次分类请求的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Prediction(Prediction),
  ModelNotInitialized,
}

impl Outcome {
  pub fn prediction(&self) -> Option<&Prediction> {
    match self {
      Outcome::Prediction(prediction) => Some(prediction),
      Outcome::ModelNotInitialized => None,
    }
  }

  pub fn to_json(&self) -> Value {
    match self {
      Outcome::Prediction(prediction) => prediction.to_json(),
      Outcome::ModelNotInitialized => json!({ "error": MODEL_NOT_INITIALIZED_MESSAGE }),
    }
  }
}

impl fmt::Display for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Outcome::Prediction(prediction) => fmt::Display::fmt(prediction, f),
      Outcome::ModelNotInitialized => f.write_str(MODEL_NOT_INITIALIZED_MESSAGE),
    }
  }
}

/// 持有推理引擎的分类器
///
/// 引擎在启动时获取一次，随分类器一起释放。加载失败时分类器处于未初始化状态，
/// 之后所有分类请求直接返回 [`Outcome::ModelNotInitialized`]。
pub struct Classifier<M> {
  model: Option<M>,
}

impl<M> Classifier<M> {
  pub fn new(model: M) -> Self {
    Self { model: Some(model) }
  }

  pub fn uninitialized() -> Self {
    Self { model: None }
  }

  /// 根据模型加载结果创建分类器，失败时返回需要展示的提示
  pub fn load<E: fmt::Display>(result: Result<M, E>) -> (Self, Option<&'static str>) {
    match result {
      Ok(model) => (Self::new(model), None),
      Err(e) => {
        error!("模型加载失败: {}", e);
        (Self::uninitialized(), Some(MODEL_LOAD_ERROR_MESSAGE))
      }
    }
  }

  pub fn is_initialized(&self) -> bool {
    self.model.is_some()
  }
}

impl<M> Classifier<M>
where
  M: Model<Input = ModelInput, Output = Confidences>,
{
  /// 预处理、推理并解释结果
  pub fn classify(&self, image: &RgbImage) -> Result<Outcome, M::Error> {
    let Some(model) = &self.model else {
      warn!("模型未初始化，跳过分类");
      return Ok(Outcome::ModelNotInitialized);
    };

    debug!("预处理图像: {}x{}", image.width(), image.height());
    let input = ModelInput::from(image);

    let now = std::time::Instant::now();
    let confidences = model.infer(&input)?;
    debug!("推理完成，耗时: {:.2?}", now.elapsed());

    for (kind, confidence) in Freshness::ALL.iter().zip(confidences.iter()) {
      debug!("类别 {} 置信度: {}", kind, confidence);
    }

    let prediction = Prediction::from_confidences(confidences);
    info!("分类结果: {} ({:.4})", prediction.kind, prediction.score);
    Ok(Outcome::Prediction(prediction))
  }
}

impl<M> Drop for Classifier<M> {
  fn drop(&mut self) {
    if self.model.take().is_some() {
      info!("释放推理引擎");
    }
  }
}
