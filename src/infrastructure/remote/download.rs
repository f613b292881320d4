use super::http_client::HttpClient;
use crate::error::{AppError, AppResult};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_DISPOSITION;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta}) {percent}%",
    )
    .map(|s| s.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// 只接受绝对的 http(s) 地址
pub fn validate_download_url(url: &str) -> AppResult<Url> {
    let invalid = || AppError::InvalidDownloadUrl {
        url: url.to_string(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        _ => Err(invalid()),
    }
}

/// 从 `Content-Disposition` 中取文件名，`filename*` 优先
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // RFC 5987: charset'language'percent-encoded
                let encoded = value.rsplit('\'').next().unwrap_or(value);
                extended = urlencoding::decode(encoded).ok().map(|s| s.into_owned());
            }
            "filename" => plain = Some(value.to_string()),
            _ => {}
        }
    }

    extended.or(plain).and_then(|name| sanitize_file_name(&name))
}

fn filename_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = urlencoding::decode(segment).ok()?;
    sanitize_file_name(&decoded)
}

/// 文件名只保留最后一个路径组件，避免响应头把文件写到目录之外
fn sanitize_file_name(name: &str) -> Option<String> {
    let name = name.replace('\\', "/");
    Path::new(&name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(|n| n.to_string())
}

/// 下载器：把下载地址保存为本地文件
pub struct Downloader {
    http: HttpClient,
    show_progress: bool,
}

impl Downloader {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 下载到 `dir` 目录，返回写入的文件路径
    pub async fn download(&self, url: &str, dir: &Path) -> AppResult<PathBuf> {
        let parsed = validate_download_url(url)?;
        let response = self.http.get(parsed.as_str()).await?;

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_content_disposition)
            .or_else(|| filename_from_url(response.url()))
            .or_else(|| filename_from_url(&parsed))
            .ok_or_else(|| AppError::Network {
                message: format!("无法从响应中确定文件名 (URL: {})", url),
            })?;

        let file_path = dir.join(&file_name);
        tracing::info!(%url, file = %file_path.display(), "开始下载");

        let pb = if self.show_progress {
            create_progress_bar(response.content_length().unwrap_or(0))
        } else {
            ProgressBar::hidden()
        };

        let mut file = tokio::fs::File::create(&file_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            pb.inc(chunk.len() as u64);
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        pb.finish_and_clear();

        Ok(file_path)
    }
}
