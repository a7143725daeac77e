// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/output/console.rs - 终端结果输出
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

use std::cell::RefCell;
use std::io::{Stdout, Write};

use image::RgbImage;
use thiserror::Error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, classifier::Outcome, output::Render};

#[derive(Error, Debug)]
pub enum ConsoleOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 将结果文本写到终端
pub struct ConsoleOutput<W: Write = Stdout> {
  writer: RefCell<W>,
}

impl FromUrlWithScheme for ConsoleOutput {
  const SCHEME: &'static str = "console";
}

impl FromUrl for ConsoleOutput {
  type Error = ConsoleOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ConsoleOutputError::SchemeMismatch(url.scheme().to_string()));
    }
    Ok(ConsoleOutput::new(std::io::stdout()))
  }
}

impl<W: Write> ConsoleOutput<W> {
  pub fn new(writer: W) -> Self {
    Self {
      writer: RefCell::new(writer),
    }
  }

  pub fn into_inner(self) -> W {
    self.writer.into_inner()
  }
}

impl<W: Write> Render<RgbImage, Outcome> for ConsoleOutput<W> {
  type Error = ConsoleOutputError;

  fn render_result(&self, frame: &RgbImage, result: &Outcome) -> Result<(), Self::Error> {
    let mut writer = self.writer.borrow_mut();
    writeln!(writer, "[Image {}x{}]", frame.width(), frame.height())?;
    writeln!(writer, "{}", result)?;
    writer.flush()?;
    Ok(())
  }

  fn render_message(&self, message: &str) -> Result<(), Self::Error> {
    let mut writer = self.writer.borrow_mut();
    writeln!(writer, "{}", message)?;
    writer.flush()?;
    Ok(())
  }
}
