use std::future::Future;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as base64_engine};
use futures_util::StreamExt;
use image::imageops::FilterType;
use reqwest::Client;
use tokio::task::spawn_blocking;

use crate::config::ImageRenderConfig;
use crate::error::AppError;

/// 头像字节来源（外部协作方：按地址异步返回原始图片字节）
pub trait AvatarSource: Send + Sync {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<Vec<u8>, AppError>> + Send;
}

/// 默认头像来源：http(s) URL 走 reqwest，`data:` URI 直接解码，其余视为本地路径
#[derive(Debug, Clone)]
pub struct HttpAvatarSource {
    client: Client,
    max_bytes: usize,
}

impl HttpAvatarSource {
    pub fn new(client: Client, max_bytes: usize) -> Self {
        Self { client, max_bytes }
    }

    /// 使用全局复用的 HTTP Client
    pub fn from_config(cfg: &ImageRenderConfig) -> Result<Self, AppError> {
        let client = crate::http::client_default()?.clone();
        Ok(Self::new(client, cfg.avatar_max_bytes))
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        if let Some(len) = resp.content_length()
            && len > self.max_bytes as u64
        {
            return Err(AppError::Network(format!(
                "头像过大（{len} 字节，上限 {}）",
                self.max_bytes
            )));
        }
        // Content-Length 缺失或不可信时按流式累计截断
        let mut stream = resp.bytes_stream();
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            self.check_size(out.len().saturating_add(chunk.len()))?;
            out.extend_from_slice(&chunk);
        }
        Ok(out)
    }

    async fn fetch_file(&self, path: &Path) -> Result<Vec<u8>, AppError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Network(format!("读取头像文件失败 '{}': {e}", path.display())))?;
        self.check_size(data.len())?;
        Ok(data)
    }

    fn check_size(&self, len: usize) -> Result<(), AppError> {
        if len > self.max_bytes {
            return Err(AppError::Network(format!(
                "头像过大（{len} 字节，上限 {}）",
                self.max_bytes
            )));
        }
        Ok(())
    }
}

impl AvatarSource for HttpAvatarSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, AppError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(AppError::Network("头像地址为空".to_string()));
        }
        if location.starts_with("http://") || location.starts_with("https://") {
            self.fetch_http(location).await
        } else if location.starts_with("data:") {
            let data = decode_data_uri(location)?;
            self.check_size(data.len())?;
            Ok(data)
        } else {
            self.fetch_file(Path::new(location)).await
        }
    }
}

/// 解码 `data:[<mediatype>];base64,<data>`，仅支持 base64 形式
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, AppError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AppError::ImageDecode("不是 data URI".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::ImageDecode("data URI 缺少数据段".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(AppError::ImageDecode(
            "仅支持 base64 编码的 data URI".to_string(),
        ));
    }
    base64_engine
        .decode(payload.trim())
        .map_err(|e| AppError::ImageDecode(format!("data URI base64 解码失败: {e}")))
}

/// 解码图片，居中裁剪缩放为 `size × size`，再编码为 PNG data URI
pub fn decode_avatar(bytes: &[u8], size: u32, fast: bool) -> Result<String, AppError> {
    let filter = if fast {
        FilterType::Triangle
    } else {
        FilterType::Lanczos3
    };
    let img = image::load_from_memory(bytes)?;
    let square = img.resize_to_fill(size, size, filter);

    let mut out = Vec::new();
    square
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| AppError::ImageDecode(format!("头像重新编码失败: {e}")))?;
    Ok(format!("data:image/png;base64,{}", base64_engine.encode(out)))
}

/// 拉取并解码单个头像；超时视为拉取失败
pub async fn load_avatar<S: AvatarSource>(
    source: &S,
    location: &str,
    size: u32,
    timeout: Option<Duration>,
    fast: bool,
) -> Result<String, AppError> {
    let bytes = match timeout {
        Some(limit) => tokio::time::timeout(limit, source.fetch(location))
            .await
            .map_err(|_| AppError::Timeout(format!("头像拉取超过 {limit:?}")))??,
        None => source.fetch(location).await?,
    };

    spawn_blocking(move || decode_avatar(&bytes, size, fast))
        .await
        .map_err(|e| AppError::Internal(format!("头像解码任务执行失败: {e}")))?
}
