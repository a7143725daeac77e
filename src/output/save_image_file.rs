// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/output/save_image_file.rs - 保存预览图与结果文本
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

use image::RgbImage;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  classifier::Outcome,
  output::{Render, draw::Draw},
  utils::url_to_path,
};

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("URI 缺少文件路径: {0}")]
  MissingPath(String),
}

/// 预览图写入 `path`，结果文本写入同名 `.txt`
pub struct SaveImageFileOutput {
  path: PathBuf,
  draw: Draw,
}

impl FromUrlWithScheme for SaveImageFileOutput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveImageFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    let path = url_to_path(uri);
    if path.file_name().is_none() {
      return Err(SaveImageFileError::MissingPath(uri.to_string()));
    }

    Ok(Self::new(path))
  }
}

impl SaveImageFileOutput {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      draw: Draw::default(),
    }
  }

  pub fn text_path(&self) -> PathBuf {
    self.path.with_extension("txt")
  }

  fn ensure_parent(&self) -> Result<(), SaveImageFileError> {
    if let Some(parent) = Path::new(&self.path).parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    Ok(())
  }
}

impl Render<RgbImage, Outcome> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(&self, frame: &RgbImage, result: &Outcome) -> Result<(), Self::Error> {
    self.ensure_parent()?;

    let preview = self.draw.draw_outcome(frame, result);
    preview.save(&self.path)?;
    std::fs::write(self.text_path(), format!("{}\n", result))?;

    info!("保存预览图到文件: {}", self.path.display());
    Ok(())
  }

  fn render_message(&self, message: &str) -> Result<(), Self::Error> {
    self.ensure_parent()?;
    std::fs::write(self.text_path(), format!("{}\n", message))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::label::Prediction;

  #[test]
  fn test_saves_preview_and_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out/result.png");
    let output = SaveImageFileOutput::new(&path);

    let outcome = Outcome::Prediction(Prediction::from_confidences([0.1, 0.7, 0.2]));
    output
      .render_result(&RgbImage::new(64, 48), &outcome)
      .unwrap();

    let saved = image::open(&path).unwrap().to_rgb8();
    assert_eq!(saved.dimensions(), (64, 48));
    let text = std::fs::read_to_string(path.with_extension("txt")).unwrap();
    assert!(text.starts_with("Prediction: Borderline\nOn the Edge"));
  }

  #[test]
  fn test_message_goes_to_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = SaveImageFileOutput::new(dir.path().join("result.png"));
    output.render_message("Error loading model").unwrap();
    assert_eq!(
      std::fs::read_to_string(output.text_path()).unwrap(),
      "Error loading model\n"
    );
  }

  #[test]
  fn test_from_url() {
    let url = Url::parse("image:///tmp/out/preview%201.png").unwrap();
    let output = SaveImageFileOutput::from_url(&url).unwrap();
    assert_eq!(output.path, PathBuf::from("/tmp/out/preview 1.png"));

    assert!(matches!(
      SaveImageFileOutput::from_url(&Url::parse("image:///").unwrap()),
      Err(SaveImageFileError::MissingPath(_))
    ));
    assert!(matches!(
      SaveImageFileOutput::from_url(&Url::parse("folder:///tmp").unwrap()),
      Err(SaveImageFileError::SchemeMismatch(_))
    ));
  }
}
