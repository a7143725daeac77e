// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/task.rs - 任务流程
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

use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;

use image::RgbImage;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  classifier::{Classifier, Outcome},
  frame::ModelInput,
  input::{CameraInput, GalleryInput, InputWrapper},
  label::Confidences,
  model::Model,
  output::Render,
  utils::path_to_url,
};

pub trait Task<I, C, O>: Sized {
  type Error;
  fn run_task(self, input: I, classifier: C, output: O) -> Result<(), Self::Error>;
}

/// 对输入中的每张图像分类并输出，返回处理的图像数
fn classify_all<I, M, O>(input: I, classifier: &Classifier<M>, output: &O) -> anyhow::Result<usize>
where
  I: Iterator<Item = RgbImage>,
  M: Model<Input = ModelInput, Output = Confidences>,
  M::Error: std::error::Error + Send + Sync + 'static,
  O: Render<RgbImage, Outcome>,
  O::Error: std::error::Error + Send + Sync + 'static,
{
  let mut count = 0;
  for image in input {
    let now = std::time::Instant::now();
    let outcome = classifier.classify(&image)?;
    output.render_result(&image, &outcome)?;
    info!("分类与输出完成，耗时: {:.2?}", now.elapsed());
    count += 1;
  }
  Ok(count)
}

/// 一次获取、一次分类
pub struct OneShotTask;

impl<'a, I, M, O> Task<I, &'a Classifier<M>, &'a O> for OneShotTask
where
  I: Iterator<Item = RgbImage>,
  M: Model<Input = ModelInput, Output = Confidences>,
  M::Error: std::error::Error + Send + Sync + 'static,
  O: Render<RgbImage, Outcome>,
  O::Error: std::error::Error + Send + Sync + 'static,
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, classifier: &'a Classifier<M>, output: &'a O) -> anyhow::Result<()> {
    info!("开始任务...");
    if classify_all(input, classifier, output)? == 0 {
      // 读取失败已在输入端记录，结果保持不变
      info!("没有获取到图像");
    }
    Ok(())
  }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
  #[error("未知命令: {0}")]
  Unknown(String),
  #[error("gallery 命令缺少图像路径")]
  MissingPath,
}

/// 交互命令，对应界面上的两个按钮
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// `camera [device]`
  Camera(Option<PathBuf>),
  /// `gallery <path>`，路径可以包含空格
  Gallery(PathBuf),
  /// `quit` 或 `exit`
  Quit,
}

impl FromStr for Command {
  type Err = CommandError;

  fn from_str(line: &str) -> Result<Self, Self::Err> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
      Some((name, rest)) => (name, rest.trim()),
      None => (line, ""),
    };

    match name {
      "camera" if rest.is_empty() => Ok(Command::Camera(None)),
      "camera" => Ok(Command::Camera(Some(PathBuf::from(rest)))),
      "gallery" if rest.is_empty() => Err(CommandError::MissingPath),
      "gallery" => Ok(Command::Gallery(PathBuf::from(rest))),
      "quit" | "exit" => Ok(Command::Quit),
      other => Err(CommandError::Unknown(other.to_string())),
    }
  }
}

/// 从行输入读取命令，每条命令获取一张图像并分类
///
/// 单次请求的失败只记录日志，循环继续；`quit` 或输入结束时退出。
pub struct EventLoopTask {
  camera: Url,
}

impl EventLoopTask {
  /// `camera` 为不带设备的 `camera` 命令使用的 URL，其查询参数也用于指定设备的情况
  pub fn new(camera: Url) -> Self {
    Self { camera }
  }

  fn open(&self, command: &Command) -> anyhow::Result<InputWrapper> {
    match command {
      Command::Camera(None) => Ok(InputWrapper::Camera(CameraInput::from_url(&self.camera)?)),
      Command::Camera(Some(device)) => {
        let mut url = path_to_url(<CameraInput as FromUrlWithScheme>::SCHEME, device)?;
        url.set_query(self.camera.query());
        Ok(InputWrapper::Camera(CameraInput::from_url(&url)?))
      }
      Command::Gallery(path) => Ok(InputWrapper::Gallery(GalleryInput::new(path))),
      Command::Quit => anyhow::bail!("quit 命令没有对应的输入"),
    }
  }
}

impl<'a, R, M, O> Task<R, &'a Classifier<M>, &'a O> for EventLoopTask
where
  R: BufRead,
  M: Model<Input = ModelInput, Output = Confidences>,
  M::Error: std::error::Error + Send + Sync + 'static,
  O: Render<RgbImage, Outcome>,
  O::Error: std::error::Error + Send + Sync + 'static,
{
  type Error = anyhow::Error;

  fn run_task(self, input: R, classifier: &'a Classifier<M>, output: &'a O) -> anyhow::Result<()> {
    info!("等待命令: camera [device] | gallery <path> | quit");
    for line in input.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }

      let command = match line.parse::<Command>() {
        Ok(Command::Quit) => {
          info!("收到退出命令");
          break;
        }
        Ok(command) => command,
        Err(e) => {
          warn!("{}", e);
          continue;
        }
      };

      let source = match self.open(&command) {
        Ok(source) => source,
        Err(e) => {
          error!("无法打开输入 {:?}: {}", command, e);
          continue;
        }
      };

      match classify_all(source, classifier, output) {
        Ok(0) => info!("没有获取到图像"),
        Ok(_) => {}
        Err(e) => error!("处理请求失败: {:#}", e),
      }
    }

    info!("任务完成，退出");
    Ok(())
  }
}
