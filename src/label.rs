// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/label.rs - 新鲜度类别与结果解释
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

use serde_json::{Value, json};

/// 模型输出的三个类别，顺序与模型输出向量一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
  Fresh,
  Borderline,
  Spoiled,
}

/// 模型输出向量，按 {Fresh, Borderline, Spoiled} 排列，不保证和为 1
pub type Confidences = [f32; Freshness::COUNT];

impl Freshness {
  pub const COUNT: usize = 3;
  pub const ALL: [Freshness; Freshness::COUNT] =
    [Freshness::Fresh, Freshness::Borderline, Freshness::Spoiled];

  pub fn label(&self) -> &'static str {
    match self {
      Freshness::Fresh => "Fresh",
      Freshness::Borderline => "Borderline",
      Freshness::Spoiled => "Spoiled",
    }
  }

  pub fn headline(&self) -> &'static str {
    match self {
      Freshness::Fresh => "Good to Go",
      Freshness::Borderline => "On the Edge",
      Freshness::Spoiled => "No Good",
    }
  }

  pub fn advisory(&self) -> &'static str {
    match self {
      Freshness::Fresh => "This item is perfectly fresh and ready to use.",
      Freshness::Borderline => {
        "This item is still usable but might not last long. Use it soon after checking carefully."
      }
      Freshness::Spoiled => "This item is spoiled and should be discarded.",
    }
  }

  /// 预览边框颜色
  pub fn color(&self) -> [u8; 3] {
    match self {
      Freshness::Fresh => [46, 160, 67],
      Freshness::Borderline => [230, 160, 20],
      Freshness::Spoiled => [200, 40, 40],
    }
  }
}

impl fmt::Display for Freshness {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// 线性扫描求最大值下标
///
/// 使用严格大于比较，相同值时保留最靠前的下标。空输入返回 `None`。
pub fn argmax(values: &[f32]) -> Option<usize> {
  let (first, rest) = values.split_first()?;
  let mut max_pos = 0;
  let mut max_value = *first;
  for (i, &value) in rest.iter().enumerate() {
    if value > max_value {
      max_value = value;
      max_pos = i + 1;
    }
  }
  Some(max_pos)
}

/// 一次分类的解释结果
///
/// 不设置置信度阈值：即使输出接近均匀分布，也会给出一个类别。
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
  pub kind: Freshness,
  pub score: f32,
  pub confidences: Confidences,
}

impl Prediction {
  pub fn from_confidences(confidences: Confidences) -> Self {
    // 定长非空数组，argmax 必然有值
    let index = argmax(&confidences).unwrap_or(0);
    let kind = Freshness::ALL[index];
    Self {
      kind,
      score: confidences[index],
      confidences,
    }
  }

  pub fn class_index(&self) -> usize {
    self.kind as usize
  }

  pub fn to_json(&self) -> Value {
    let scores: serde_json::Map<String, Value> = Freshness::ALL
      .iter()
      .zip(self.confidences.iter())
      .map(|(kind, score)| (kind.label().to_string(), json!(score)))
      .collect();
    json!({
      "prediction": self.kind.label(),
      "class_index": self.class_index(),
      "score": self.score,
      "advisory": format!("{}: {}", self.kind.headline(), self.kind.advisory()),
      "confidences": scores,
    })
  }
}

impl fmt::Display for Prediction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Prediction: {}\n{}: {}",
      self.kind.label(),
      self.kind.headline(),
      self.kind.advisory()
    )
  }
}
