// 该文件是 Xianrou （鲜肉） 项目的一部分。
// src/utils.rs - URL 辅助函数
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

use url::Url;

/// 将 URL 的路径部分解码为本地文件路径
///
/// `Url` 会对空格、中文等字符做百分号编码，直接使用 `url.path()` 打开文件会失败。
/// 解码失败（非 UTF-8 序列）时退回原始路径。
pub fn url_to_path(url: &Url) -> PathBuf {
  let raw = url.path();
  match urlencoding::decode(raw) {
    Ok(decoded) => PathBuf::from(decoded.into_owned()),
    Err(_) => PathBuf::from(raw),
  }
}

/// 读取 URL 查询参数中的某个键
pub fn query_value(url: &Url, key: &str) -> Option<String> {
  url
    .query_pairs()
    .find(|(k, _)| k == key)
    .map(|(_, v)| v.into_owned())
}

/// 将本地路径转换为指定方案的 URL，例如 `gallery:///tmp/a.jpg`
pub fn path_to_url(scheme: &str, path: &Path) -> Result<Url, url::ParseError> {
  let absolute = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir()
      .map(|cwd| cwd.join(path))
      .unwrap_or_else(|_| path.to_path_buf())
  };
  let encoded: Vec<String> = absolute
    .to_string_lossy()
    .split('/')
    .map(|segment| urlencoding::encode(segment).into_owned())
    .collect();
  Url::parse(&format!("{}://{}", scheme, encoded.join("/")))
}
