// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/input/v4l2_capture.rs - V4L2 摄像头单帧拍照
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

use std::path::Path;

use image::RgbImage;
use tracing::debug;
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

use super::camera::{CameraInputError, yuyv_to_rgb};

const CAPTURE_BUFFERS: u32 = 4;
/// 丢弃的预热帧数，等待自动曝光稳定
const WARMUP_FRAMES: usize = 5;

/// 打开设备，以 YUYV 格式拍摄一张照片
pub fn capture_still(
  device_path: &Path,
  width: u32,
  height: u32,
) -> Result<RgbImage, CameraInputError> {
  let device = Device::with_path(device_path)?;

  let yuyv = FourCC::new(b"YUYV");
  let mut format = device.format()?;
  format.width = width;
  format.height = height;
  format.fourcc = yuyv;
  let format = device.set_format(&format)?;
  if format.fourcc != yuyv {
    return Err(CameraInputError::UnsupportedFormat(format!(
      "{:?}",
      format.fourcc
    )));
  }
  debug!(
    "摄像头格式: {}x{} {:?}",
    format.width, format.height, format.fourcc
  );

  let mut stream = Stream::with_buffers(&device, Type::VideoCapture, CAPTURE_BUFFERS)?;
  for _ in 0..WARMUP_FRAMES {
    stream.next()?;
  }

  let (buffer, meta) = stream.next()?;
  debug!("采集帧序号: {}, 数据长度: {}", meta.sequence, buffer.len());

  let rgb = yuyv_to_rgb(buffer, format.width, format.height);
  RgbImage::from_raw(format.width, format.height, rgb).ok_or(CameraInputError::InvalidFrame)
}
