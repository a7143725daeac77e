// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/input/gallery.rs - 相册图像输入
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

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, utils::url_to_path};

#[derive(Error, Debug)]
pub enum GalleryInputError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{actual}'")]
  SchemeMismatch { expected: &'static str, actual: String },
  #[error("URI 缺少图像路径: {0}")]
  MissingPath(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像解码错误: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 从相册（本地文件）选取的一张图像
///
/// 图像在迭代时才读取。读取或解码失败只记录日志，不产生图像。
pub struct GalleryInput {
  path: PathBuf,
  consumed: bool,
}

impl FromUrlWithScheme for GalleryInput {
  const SCHEME: &'static str = "gallery";
}

impl FromUrl for GalleryInput {
  type Error = GalleryInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(GalleryInputError::SchemeMismatch {
        expected: Self::SCHEME,
        actual: url.scheme().to_string(),
      });
    }

    let path = url_to_path(url);
    if path.as_os_str().is_empty() || path == Path::new("/") {
      return Err(GalleryInputError::MissingPath(url.to_string()));
    }

    Ok(Self::new(path))
  }
}

impl GalleryInput {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      consumed: false,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// 按文件内容识别格式并解码为 RGB
  pub fn read(&self) -> Result<RgbImage, GalleryInputError> {
    let image = ImageReader::open(&self.path)?
      .with_guessed_format()?
      .decode()?
      .to_rgb8();
    Ok(image)
  }
}

impl Iterator for GalleryInput {
  type Item = RgbImage;

  fn next(&mut self) -> Option<Self::Item> {
    if self.consumed {
      return None;
    }
    self.consumed = true;

    match self.read() {
      Ok(image) => {
        info!(
          "从相册读取图像: {} ({}x{})",
          self.path.display(),
          image.width(),
          image.height()
        );
        Some(image)
      }
      Err(e) => {
        error!("从相册读取图像失败: {}: {}", self.path.display(), e);
        None
      }
    }
  }
}
