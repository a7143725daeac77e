// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/model.rs - 模型
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

use crate::frame::MODEL_INPUT_SIDE;

/// 推理引擎能力：输入张量，输出置信度向量
///
/// 预处理与结果解释只依赖该 trait。
pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

mod tract_classifier;
pub use self::tract_classifier::{
  ModelFormat, TractClassifier, TractClassifierBuilder, TractClassifierError,
};

/// 默认分类器：224x224 输入
pub type FreshnessClassifier = TractClassifier<MODEL_INPUT_SIDE, MODEL_INPUT_SIDE>;
