// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/output/draw.rs - 分类结果预览图绘制
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

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::classifier::Outcome;

const MIN_BORDER_THICKNESS: u32 = 2;
/// 边框厚度占短边的比例分母
const BORDER_RATIO: u32 = 40;
const UNKNOWN_COLOR: [u8; 3] = [128, 128, 128];

/// 在预览图四周绘制类别颜色边框（绿 / 黄 / 红，未初始化为灰）
#[derive(Debug, Clone)]
pub struct Draw {
  min_thickness: u32,
  ratio: u32,
}

impl Default for Draw {
  fn default() -> Self {
    Self {
      min_thickness: MIN_BORDER_THICKNESS,
      ratio: BORDER_RATIO,
    }
  }
}

impl Draw {
  pub fn thickness(&self, image: &RgbImage) -> u32 {
    let short_side = image.width().min(image.height());
    (short_side / self.ratio)
      .max(self.min_thickness)
      .min(short_side.div_ceil(2))
  }

  pub fn draw_outcome(&self, image: &RgbImage, outcome: &Outcome) -> RgbImage {
    let mut preview = image.clone();
    if preview.width() == 0 || preview.height() == 0 {
      return preview;
    }

    let color = match outcome {
      Outcome::Prediction(prediction) => prediction.kind.color(),
      Outcome::ModelNotInitialized => UNKNOWN_COLOR,
    };
    self.draw_border(&mut preview, Rgb(color));
    preview
  }

  fn draw_border(&self, image: &mut RgbImage, color: Rgb<u8>) {
    let (w, h) = image.dimensions();
    let t = self.thickness(image);

    // 上、下、左、右
    draw_filled_rect_mut(image, Rect::at(0, 0).of_size(w, t), color);
    draw_filled_rect_mut(image, Rect::at(0, (h - t) as i32).of_size(w, t), color);
    draw_filled_rect_mut(image, Rect::at(0, 0).of_size(t, h), color);
    draw_filled_rect_mut(image, Rect::at((w - t) as i32, 0).of_size(t, h), color);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::label::{Freshness, Prediction};

  #[test]
  fn test_border_uses_class_color() {
    let image = RgbImage::from_pixel(80, 60, Rgb([0, 0, 0]));
    let outcome = Outcome::Prediction(Prediction::from_confidences([0.0, 0.0, 1.0]));
    let preview = Draw::default().draw_outcome(&image, &outcome);

    let red = Rgb(Freshness::Spoiled.color());
    assert_eq!(preview.get_pixel(0, 0), &red);
    assert_eq!(preview.get_pixel(79, 59), &red);
    assert_eq!(preview.get_pixel(40, 0), &red);
    assert_eq!(preview.get_pixel(0, 30), &red);
    // 中心保持原图
    assert_eq!(preview.get_pixel(40, 30), &Rgb([0, 0, 0]));
    // 原图不被修改
    assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
  }

  #[test]
  fn test_not_initialized_border_is_gray() {
    let image = RgbImage::new(10, 10);
    let preview = Draw::default().draw_outcome(&image, &Outcome::ModelNotInitialized);
    assert_eq!(preview.get_pixel(0, 0), &Rgb(UNKNOWN_COLOR));
  }

  #[test]
  fn test_thickness_bounds() {
    let draw = Draw::default();
    assert_eq!(draw.thickness(&RgbImage::new(800, 400)), 10);
    assert_eq!(draw.thickness(&RgbImage::new(40, 40)), 2);
    assert_eq!(draw.thickness(&RgbImage::new(1, 1)), 1);
  }
}
