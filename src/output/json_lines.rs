// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/output/json_lines.rs - JSON Lines 结果输出
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

use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use image::RgbImage;
use serde_json::{Value, json};
use thiserror::Error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, classifier::Outcome, output::Render, utils::url_to_path};

#[derive(Error, Debug)]
pub enum JsonLinesOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("URI 缺少文件路径: {0}")]
  MissingPath(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 每个结果追加一行 JSON
pub struct JsonLinesOutput {
  path: PathBuf,
}

impl FromUrlWithScheme for JsonLinesOutput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for JsonLinesOutput {
  type Error = JsonLinesOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(JsonLinesOutputError::SchemeMismatch(url.scheme().to_string()));
    }
    let path = url_to_path(url);
    if path.file_name().is_none() {
      return Err(JsonLinesOutputError::MissingPath(url.to_string()));
    }
    Ok(Self { path })
  }
}

impl JsonLinesOutput {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  fn append(&self, mut record: Value) -> Result<(), JsonLinesOutputError> {
    record["timestamp"] = json!(Local::now().to_rfc3339());
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)?;
    writeln!(file, "{}", serde_json::to_string(&record)?)?;
    Ok(())
  }
}

impl Render<RgbImage, Outcome> for JsonLinesOutput {
  type Error = JsonLinesOutputError;

  fn render_result(&self, frame: &RgbImage, result: &Outcome) -> Result<(), Self::Error> {
    let mut record = result.to_json();
    record["width"] = json!(frame.width());
    record["height"] = json!(frame.height());
    self.append(record)
  }

  fn render_message(&self, message: &str) -> Result<(), Self::Error> {
    self.append(json!({ "message": message }))
  }
}
