// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/input.rs - 图像获取（拍照 / 相册）
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

use image::RgbImage;
use thiserror::Error;

use crate::{FromUrl, FromUrlWithScheme};

pub mod permission;

mod camera;
pub use self::camera::{
  CameraInput, CameraInputError, DEFAULT_CAMERA_DEVICE, DEFAULT_CAPTURE_HEIGHT,
  DEFAULT_CAPTURE_WIDTH, yuyv_to_rgb,
};

mod gallery;
pub use self::gallery::{GalleryInput, GalleryInputError};

#[cfg(feature = "v4l2_camera")]
mod v4l2_capture;

#[derive(Error, Debug)]
pub enum InputError {
  #[error("Gallery input error: {0}")]
  GalleryInputError(#[from] GalleryInputError),
  #[error("Camera input error: {0}")]
  CameraInputError(#[from] CameraInputError),
  #[error("URI scheme mismatch: {0}")]
  SchemeMismatch(String),
}

/// 按 URL 方案选择的输入源，每次迭代产出一张 RGB 图像
pub enum InputWrapper {
  Gallery(GalleryInput),
  Camera(CameraInput),
}

impl FromUrl for InputWrapper {
  type Error = InputError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      GalleryInput::SCHEME => Ok(InputWrapper::Gallery(GalleryInput::from_url(url)?)),
      <CameraInput as FromUrlWithScheme>::SCHEME => {
        Ok(InputWrapper::Camera(CameraInput::from_url(url)?))
      }
      other => Err(InputError::SchemeMismatch(other.to_string())),
    }
  }
}

impl Iterator for InputWrapper {
  type Item = RgbImage;

  fn next(&mut self) -> Option<Self::Item> {
    match self {
      InputWrapper::Gallery(input) => input.next(),
      InputWrapper::Camera(input) => input.next(),
    }
  }
}
