// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/input/permission.rs - 摄像头访问权限
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

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
  Granted,
  Denied,
  /// 设备不存在或无法探测
  Unavailable,
}

/// 摄像头权限检查
///
/// 未授权时调用 `request`，本次拍摄随即放弃；授权后需要用户再次触发拍摄。
pub trait PermissionGate {
  fn check(&self, device: &Path) -> PermissionStatus;
  fn request(&self, device: &Path);
}

/// 以操作系统的设备节点访问控制作为授权依据
#[derive(Debug, Default, Clone, Copy)]
pub struct DevicePermission;

impl PermissionGate for DevicePermission {
  fn check(&self, device: &Path) -> PermissionStatus {
    let status = match std::fs::OpenOptions::new()
      .read(true)
      .write(true)
      .open(device)
    {
      Ok(_) => PermissionStatus::Granted,
      Err(e) if e.kind() == ErrorKind::PermissionDenied => PermissionStatus::Denied,
      Err(_) => PermissionStatus::Unavailable,
    };
    debug!("摄像头 {} 权限状态: {:?}", device.display(), status);
    status
  }

  fn request(&self, device: &Path) {
    warn!(
      "没有访问摄像头 {} 的权限，请将当前用户加入 video 组 (sudo usermod -aG video $USER) 并重新登录后再试",
      device.display()
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_device_is_unavailable() {
    assert_eq!(
      DevicePermission.check(Path::new("/nonexistent/video9")),
      PermissionStatus::Unavailable
    );
  }

  #[test]
  fn test_accessible_node_is_granted() {
    let file = tempfile::NamedTempFile::new().unwrap();
    assert_eq!(
      DevicePermission.check(file.path()),
      PermissionStatus::Granted
    );
  }
}
