// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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

use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local};
use image::RgbImage;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
  FromUrl, FromUrlWithScheme,
  classifier::Outcome,
  output::Render,
  utils::url_to_path,
};

#[cfg(feature = "save_image_file")]
use crate::output::draw::Draw;

const MESSAGE_LOG_FILE: &str = "messages.log";

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 按日期归档每次分类：`<dir>/YYYY/MM/DD/HH-MM-SS-XXXX.png` 与同名 `.json`
///
/// 默认只记录得到类别的结果，URL 带 `always` 参数时未初始化的请求也会记录。
/// 带 `raw` 参数时保存原图，不绘制类别边框。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  frame_counter: Cell<u16>,
  always: bool,
  raw: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let always = uri.query_pairs().any(|(k, _)| k == "always");
    let raw = uri.query_pairs().any(|(k, _)| k == "raw");

    Ok(DirectoryRecordOutput {
      directory: url_to_path(uri),
      frame_counter: Cell::new(0),
      always,
      raw,
    })
  }
}

impl DirectoryRecordOutput {
  pub fn new(directory: impl Into<PathBuf>) -> Self {
    Self {
      directory: directory.into(),
      frame_counter: Cell::new(0),
      always: false,
      raw: false,
    }
  }

  pub fn with_always(mut self, always: bool) -> Self {
    self.always = always;
    self
  }

  pub fn directory(&self) -> &Path {
    &self.directory
  }

  fn frame_id(&self) -> u16 {
    let id = self.frame_counter.get().wrapping_add(1);
    self.frame_counter.set(id);
    id
  }

  fn frame_path(&self, now: &DateTime<Local>) -> Result<PathBuf, DirectoryRecordOutputError> {
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    std::fs::create_dir_all(&directory)?;

    Ok(directory.join(format!(
      "{}-{:04X}.png",
      now.format("%H-%M-%S"),
      self.frame_id()
    )))
  }

  fn preview(&self, frame: &RgbImage, result: &Outcome) -> RgbImage {
    if self.raw {
      return frame.clone();
    }
    Self::draw(frame, result)
  }

  #[cfg(feature = "save_image_file")]
  fn draw(frame: &RgbImage, result: &Outcome) -> RgbImage {
    Draw::default().draw_outcome(frame, result)
  }

  #[cfg(not(feature = "save_image_file"))]
  fn draw(frame: &RgbImage, _result: &Outcome) -> RgbImage {
    frame.clone()
  }
}

impl Render<RgbImage, Outcome> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, frame: &RgbImage, result: &Outcome) -> Result<(), Self::Error> {
    if !self.always && result.prediction().is_none() {
      debug!("跳过记录: {}", result);
      return Ok(());
    }

    let now = Local::now();
    let path = self.frame_path(&now)?;
    self.preview(frame, result).save(&path)?;

    let mut record = result.to_json();
    record["timestamp"] = json!(now.to_rfc3339());
    record["width"] = json!(frame.width());
    record["height"] = json!(frame.height());
    std::fs::write(
      path.with_extension("json"),
      serde_json::to_string_pretty(&record)?,
    )?;

    info!("记录分类结果: {}", path.display());
    Ok(())
  }

  fn render_message(&self, message: &str) -> Result<(), Self::Error> {
    std::fs::create_dir_all(&self.directory)?;
    let mut file = std::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(self.directory.join(MESSAGE_LOG_FILE))?;
    writeln!(file, "{} {}", Local::now().to_rfc3339(), message)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::label::Prediction;

  fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
      let path = entry.unwrap().path();
      if path.is_dir() {
        found.extend(files_with_extension(&path, ext));
      } else if path.extension().is_some_and(|e| e == ext) {
        found.push(path);
      }
    }
    found
  }

  #[test]
  fn test_records_prediction_with_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = DirectoryRecordOutput::new(dir.path());
    let outcome = Outcome::Prediction(Prediction::from_confidences([0.05, 0.15, 0.8]));

    output
      .render_result(&RgbImage::new(30, 20), &outcome)
      .unwrap();
    output
      .render_result(&RgbImage::new(30, 20), &outcome)
      .unwrap();

    let images = files_with_extension(dir.path(), "png");
    let records = files_with_extension(dir.path(), "json");
    assert_eq!(images.len(), 2);
    assert_eq!(records.len(), 2);

    // YYYY/MM/DD 三级目录
    let relative = images[0].strip_prefix(dir.path()).unwrap();
    assert_eq!(relative.components().count(), 4);

    let record: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(&records[0]).unwrap()).unwrap();
    assert_eq!(record["prediction"], "Spoiled");
    assert_eq!(record["width"], 30);
    assert!(record["timestamp"].is_string());
  }

  #[test]
  fn test_skips_not_initialized_unless_always() {
    let dir = tempfile::tempdir().unwrap();
    let output = DirectoryRecordOutput::new(dir.path());
    output
      .render_result(&RgbImage::new(8, 8), &Outcome::ModelNotInitialized)
      .unwrap();
    assert!(files_with_extension(dir.path(), "png").is_empty());

    let output = output.with_always(true);
    output
      .render_result(&RgbImage::new(8, 8), &Outcome::ModelNotInitialized)
      .unwrap();
    assert_eq!(files_with_extension(dir.path(), "json").len(), 1);
  }

  #[test]
  fn test_messages_are_appended() {
    let dir = tempfile::tempdir().unwrap();
    let output = DirectoryRecordOutput::new(dir.path());
    output.render_message("Error loading model").unwrap();
    output.render_message("second").unwrap();

    let log = std::fs::read_to_string(dir.path().join(MESSAGE_LOG_FILE)).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" Error loading model"));
  }

  #[test]
  fn test_from_url_flags() {
    let url = url::Url::parse("folder:///var/lib/xianrou?always&raw").unwrap();
    let output = DirectoryRecordOutput::from_url(&url).unwrap();
    assert_eq!(output.directory(), Path::new("/var/lib/xianrou"));
    assert!(output.always);
    assert!(output.raw);
  }
}
