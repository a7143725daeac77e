// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/frame.rs - 归一化 NHWC 帧定义
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

use image::{Rgb, RgbImage, imageops};
use tract_onnx::prelude::{Tensor, TractResult};

pub const RGB_CHANNELS: usize = 3;

/// 模型输入边长
pub const MODEL_INPUT_SIDE: u32 = 224;

/// 模型输入帧：224x224，RGB 交织，数值归一化到 [0, 1]
pub type ModelInput = NormalizedNhwcFrame<MODEL_INPUT_SIDE, MODEL_INPUT_SIDE>;

/// 按行优先、通道交织（R, G, B）排列的浮点帧
///
/// 每个值为对应 8 位通道值除以 255。
#[derive(Debug, Clone)]
pub struct NormalizedNhwcFrame<const W: u32, const H: u32> {
  data: Box<[f32]>,
}

impl<const W: u32, const H: u32> NormalizedNhwcFrame<W, H> {
  pub const LEN: usize = RGB_CHANNELS * (W as usize) * (H as usize);

  pub fn as_slice(&self) -> &[f32] {
    &self.data
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// 转换为形状为 `[1, H, W, 3]` 的张量
  pub fn to_tensor(&self) -> TractResult<Tensor> {
    Tensor::from_shape::<f32>(
      &[1, H as usize, W as usize, RGB_CHANNELS],
      &self.data,
    )
  }
}

#[inline]
fn normalize(value: u8) -> f32 {
  f32::from(value) / 255.0
}

impl<const W: u32, const H: u32> From<Vec<f32>> for NormalizedNhwcFrame<W, H> {
  fn from(data: Vec<f32>) -> Self {
    if data.len() != Self::LEN {
      panic!(
        "数据长度不匹配: 期望长度 {}, 实际长度 {}",
        Self::LEN,
        data.len()
      );
    }

    Self {
      data: data.into_boxed_slice(),
    }
  }
}

impl<const W: u32, const H: u32> From<&RgbImage> for NormalizedNhwcFrame<W, H> {
  /// 非等比缩放到 W x H（最近邻，不做滤波），再逐像素输出 R、G、B 三个归一化值
  fn from(image: &RgbImage) -> Self {
    let resized;
    let source = if image.dimensions() == (W, H) {
      image
    } else {
      resized = imageops::resize(image, W, H, imageops::FilterType::Nearest);
      &resized
    };

    let mut data = Vec::with_capacity(Self::LEN);
    for pixel in source.pixels() {
      let Rgb([r, g, b]) = *pixel;
      data.push(normalize(r));
      data.push(normalize(g));
      data.push(normalize(b));
    }

    Self::from(data)
  }
}
