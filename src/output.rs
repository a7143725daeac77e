// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/output.rs - 输出定义
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
use tracing::error;
use url::Url;

use crate::FromUrl;
use crate::FromUrlWithScheme;
use crate::classifier::Outcome;

/// 结果展示：预览图与结果文本两个只写界面
pub trait Render<Frame, Output> {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
  /// 与具体图像无关的提示，例如模型加载失败
  fn render_message(&self, message: &str) -> Result<(), Self::Error>;
}

/// 展示与图像无关的提示，输出失败只记录日志
///
/// 返回提示是否成功送达。
pub fn render_notice<O>(output: &O, notice: &str) -> bool
where
  O: Render<RgbImage, Outcome>,
  O::Error: std::fmt::Display,
{
  match output.render_message(notice) {
    Ok(()) => true,
    Err(e) => {
      error!("输出提示失败: {}: {}", notice, e);
      false
    }
  }
}

mod console;
pub use self::console::{ConsoleOutput, ConsoleOutputError};

mod json_lines;
pub use self::json_lines::{JsonLinesOutput, JsonLinesOutputError};

#[cfg(feature = "save_image_file")]
pub mod draw;

#[cfg(feature = "save_image_file")]
mod save_image_file;
#[cfg(feature = "save_image_file")]
pub use self::save_image_file::{SaveImageFileError, SaveImageFileOutput};

#[cfg(feature = "directory_record")]
mod directory_record;
#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("终端输出错误: {0}")]
  ConsoleOutputError(#[from] ConsoleOutputError),
  #[error("JSON 输出错误: {0}")]
  JsonLinesOutputError(#[from] JsonLinesOutputError),
  #[cfg(feature = "save_image_file")]
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum OutputWrapper {
  ConsoleOutput(ConsoleOutput),
  JsonLinesOutput(JsonLinesOutput),
  #[cfg(feature = "save_image_file")]
  SaveImageFileOutput(SaveImageFileOutput),
  #[cfg(feature = "directory_record")]
  DirectoryRecordOutput(DirectoryRecordOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      <ConsoleOutput as FromUrlWithScheme>::SCHEME => {
        Ok(OutputWrapper::ConsoleOutput(ConsoleOutput::from_url(url)?))
      }
      JsonLinesOutput::SCHEME => Ok(OutputWrapper::JsonLinesOutput(JsonLinesOutput::from_url(
        url,
      )?)),
      #[cfg(feature = "save_image_file")]
      SaveImageFileOutput::SCHEME => Ok(OutputWrapper::SaveImageFileOutput(
        SaveImageFileOutput::from_url(url)?,
      )),
      #[cfg(feature = "directory_record")]
      DirectoryRecordOutput::SCHEME => Ok(OutputWrapper::DirectoryRecordOutput(
        DirectoryRecordOutput::from_url(url)?,
      )),
      other => Err(OutputError::SchemeMismatch(other.to_string())),
    }
  }
}

impl Render<RgbImage, Outcome> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &RgbImage, result: &Outcome) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::ConsoleOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      OutputWrapper::JsonLinesOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "save_image_file")]
      OutputWrapper::SaveImageFileOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }

  fn render_message(&self, message: &str) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::ConsoleOutput(output) => {
        output.render_message(message).map_err(OutputError::from)
      }
      OutputWrapper::JsonLinesOutput(output) => {
        output.render_message(message).map_err(OutputError::from)
      }
      #[cfg(feature = "save_image_file")]
      OutputWrapper::SaveImageFileOutput(output) => {
        output.render_message(message).map_err(OutputError::from)
      }
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(output) => {
        output.render_message(message).map_err(OutputError::from)
      }
    }
  }
}

/// 同时输出到多个目标
///
/// 每个目标都会被调用；出错的目标记录日志，最后返回第一个错误。
#[derive(Default)]
pub struct OutputList<O> {
  outputs: Vec<O>,
}

impl<O> OutputList<O> {
  pub fn new(outputs: Vec<O>) -> Self {
    Self { outputs }
  }

  pub fn len(&self) -> usize {
    self.outputs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.outputs.is_empty()
  }
}

impl OutputList<OutputWrapper> {
  pub fn from_urls<'a>(urls: impl IntoIterator<Item = &'a Url>) -> Result<Self, OutputError> {
    let outputs = urls
      .into_iter()
      .map(OutputWrapper::from_url)
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self::new(outputs))
  }
}

impl<F, D, O> Render<F, D> for OutputList<O>
where
  O: Render<F, D>,
  O::Error: std::fmt::Display,
{
  type Error = O::Error;

  fn render_result(&self, frame: &F, result: &D) -> Result<(), Self::Error> {
    let mut first_error = None;
    for output in &self.outputs {
      if let Err(e) = output.render_result(frame, result) {
        error!("输出结果失败: {}", e);
        first_error.get_or_insert(e);
      }
    }
    first_error.map_or(Ok(()), Err)
  }

  fn render_message(&self, message: &str) -> Result<(), Self::Error> {
    let mut first_error = None;
    for output in &self.outputs {
      if let Err(e) = output.render_message(message) {
        error!("输出提示失败: {}", e);
        first_error.get_or_insert(e);
      }
    }
    first_error.map_or(Ok(()), Err)
  }
}
