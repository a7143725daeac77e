// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/input/camera.rs - 摄像头拍照输入
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
use tracing::{error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  input::permission::{DevicePermission, PermissionGate, PermissionStatus},
  utils::{query_value, url_to_path},
};

pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
pub const DEFAULT_CAPTURE_WIDTH: u32 = 640;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 480;

#[derive(Error, Debug)]
pub enum CameraInputError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{actual}'")]
  SchemeMismatch { expected: &'static str, actual: String },
  #[error("参数 {key} 无效: {value}")]
  InvalidParameter { key: &'static str, value: String },
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("摄像头不支持的像素格式: {0}")]
  UnsupportedFormat(String),
  #[error("无法从摄像头数据创建 RGB 图像")]
  InvalidFrame,
  #[error("未启用摄像头支持（需要 v4l2_camera 特性）")]
  Unsupported,
}

/// 摄像头单次拍照
///
/// 每次迭代前检查权限；未授权时请求权限并放弃本次拍照。
pub struct CameraInput<P = DevicePermission> {
  device: PathBuf,
  width: u32,
  height: u32,
  permission: P,
  consumed: bool,
}

impl FromUrlWithScheme for CameraInput {
  const SCHEME: &'static str = "camera";
}

fn parse_dimension(url: &Url, key: &'static str, default: u32) -> Result<u32, CameraInputError> {
  match query_value(url, key) {
    None => Ok(default),
    Some(value) => match value.parse::<u32>() {
      Ok(parsed) if parsed > 0 => Ok(parsed),
      _ => Err(CameraInputError::InvalidParameter { key, value }),
    },
  }
}

impl FromUrl for CameraInput {
  type Error = CameraInputError;

  /// `camera:///dev/video0?width=640&height=480`
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(CameraInputError::SchemeMismatch {
        expected: Self::SCHEME,
        actual: url.scheme().to_string(),
      });
    }

    let path = url_to_path(url);
    let device = if path.as_os_str().is_empty() || path == Path::new("/") {
      PathBuf::from(DEFAULT_CAMERA_DEVICE)
    } else {
      path
    };

    let width = parse_dimension(url, "width", DEFAULT_CAPTURE_WIDTH)?;
    let height = parse_dimension(url, "height", DEFAULT_CAPTURE_HEIGHT)?;

    Ok(CameraInput {
      device,
      width,
      height,
      permission: DevicePermission,
      consumed: false,
    })
  }
}

impl<P: PermissionGate> CameraInput<P> {
  pub fn with_permission<Q: PermissionGate>(self, permission: Q) -> CameraInput<Q> {
    CameraInput {
      device: self.device,
      width: self.width,
      height: self.height,
      permission,
      consumed: self.consumed,
    }
  }

  pub fn device(&self) -> &Path {
    &self.device
  }

  pub fn resolution(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  #[cfg(feature = "v4l2_camera")]
  fn capture(&self) -> Result<RgbImage, CameraInputError> {
    super::v4l2_capture::capture_still(&self.device, self.width, self.height)
  }

  #[cfg(not(feature = "v4l2_camera"))]
  fn capture(&self) -> Result<RgbImage, CameraInputError> {
    Err(CameraInputError::Unsupported)
  }
}

impl<P: PermissionGate> Iterator for CameraInput<P> {
  type Item = RgbImage;

  fn next(&mut self) -> Option<Self::Item> {
    if self.consumed {
      return None;
    }
    self.consumed = true;

    match self.permission.check(&self.device) {
      PermissionStatus::Granted => {}
      PermissionStatus::Denied => {
        self.permission.request(&self.device);
        return None;
      }
      PermissionStatus::Unavailable => {
        error!("摄像头设备不可用: {}", self.device.display());
        return None;
      }
    }

    match self.capture() {
      Ok(image) => {
        info!(
          "摄像头拍照完成: {} ({}x{})",
          self.device.display(),
          image.width(),
          image.height()
        );
        Some(image)
      }
      Err(e) => {
        error!("摄像头拍照失败: {}: {}", self.device.display(), e);
        None
      }
    }
  }
}

/// 将 YUYV (YUV 4:2:2) 数据转换为 RGB，每 4 字节对应 2 个像素
pub fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Vec<u8> {
  let pixels = (width * height) as usize;
  let mut rgb = Vec::with_capacity(pixels * 3);

  for chunk in yuyv.chunks_exact(4).take(pixels / 2) {
    let y0 = chunk[0] as f32;
    let u = chunk[1] as f32 - 128.0;
    let y1 = chunk[2] as f32;
    let v = chunk[3] as f32 - 128.0;

    for y in [y0, y1] {
      let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
      let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
      let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
      rgb.extend_from_slice(&[r, g, b]);
    }
  }

  rgb
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;

  struct Gate {
    status: PermissionStatus,
    requests: Cell<usize>,
  }

  impl Gate {
    fn new(status: PermissionStatus) -> Self {
      Self {
        status,
        requests: Cell::new(0),
      }
    }
  }

  impl PermissionGate for &Gate {
    fn check(&self, _device: &Path) -> PermissionStatus {
      self.status
    }

    fn request(&self, _device: &Path) {
      self.requests.set(self.requests.get() + 1);
    }
  }

  fn camera() -> CameraInput {
    CameraInput::from_url(&Url::parse("camera:///dev/video0").unwrap()).unwrap()
  }

  #[test]
  fn test_from_url_defaults() {
    let input = CameraInput::from_url(&Url::parse("camera:").unwrap()).unwrap();
    assert_eq!(input.device(), Path::new(DEFAULT_CAMERA_DEVICE));
    assert_eq!(input.resolution(), (640, 480));
  }

  #[test]
  fn test_from_url_parameters() {
    let url = Url::parse("camera:///dev/video2?width=320&height=240").unwrap();
    let input = CameraInput::from_url(&url).unwrap();
    assert_eq!(input.device(), Path::new("/dev/video2"));
    assert_eq!(input.resolution(), (320, 240));

    let url = Url::parse("camera:///dev/video2?width=wide").unwrap();
    assert!(matches!(
      CameraInput::from_url(&url),
      Err(CameraInputError::InvalidParameter { key: "width", .. })
    ));

    let url = Url::parse("gallery:///dev/video2").unwrap();
    assert!(matches!(
      CameraInput::from_url(&url),
      Err(CameraInputError::SchemeMismatch { .. })
    ));
  }

  #[test]
  fn test_denied_permission_requests_and_skips_capture() {
    let gate = Gate::new(PermissionStatus::Denied);
    let mut input = camera().with_permission(&gate);
    assert!(input.next().is_none());
    assert_eq!(gate.requests.get(), 1);
    assert!(input.next().is_none());
    assert_eq!(gate.requests.get(), 1);
  }

  #[test]
  fn test_unavailable_device_does_not_request() {
    let gate = Gate::new(PermissionStatus::Unavailable);
    let mut input = camera().with_permission(&gate);
    assert!(input.next().is_none());
    assert_eq!(gate.requests.get(), 0);
  }

  #[cfg(not(feature = "v4l2_camera"))]
  #[test]
  fn test_granted_without_backend_yields_nothing() {
    let gate = Gate::new(PermissionStatus::Granted);
    let mut input = camera().with_permission(&gate);
    assert!(matches!(input.capture(), Err(CameraInputError::Unsupported)));
    assert!(input.next().is_none());
    assert_eq!(gate.requests.get(), 0);
  }

  #[test]
  fn test_yuyv_to_rgb() {
    // 中性灰：U = V = 128
    let rgb = yuyv_to_rgb(&[100, 128, 200, 128], 2, 1);
    assert_eq!(rgb, vec![100, 100, 100, 200, 200, 200]);

    // 多余数据被忽略
    let rgb = yuyv_to_rgb(&[16, 128, 16, 128, 1, 2, 3, 4], 2, 1);
    assert_eq!(rgb.len(), 6);
  }
}
