use crate::core::normalize_version;
use crate::error::AppResult;
use crate::infrastructure::config::Config;
use crate::infrastructure::installer::{extract, unpack_jars, ArchiveFormat};
use crate::infrastructure::remote::{DownloadRequest, Downloader, HttpClient, VendorRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Java 安装管理器：解析下载地址 → 下载 → 解压 → pack200 转换
pub struct JavaInstaller {
    config: Config,
    registry: VendorRegistry,
    downloader: Downloader,
}

impl JavaInstaller {
    /// 按配置注册全部厂商
    pub fn new(config: Config) -> AppResult<Self> {
        let registry = VendorRegistry::with_defaults(&config)?;
        let downloader = Downloader::new(HttpClient::with_user_agent(&config.user_agent)?);
        Ok(Self::with_registry(config, registry, downloader))
    }

    pub fn with_registry(config: Config, registry: VendorRegistry, downloader: Downloader) -> Self {
        Self {
            config,
            registry,
            downloader,
        }
    }

    pub fn registry(&self) -> &VendorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 只解析下载地址
    pub async fn resolve_url(
        &self,
        vendor: Option<&str>,
        request: &DownloadRequest,
    ) -> AppResult<String> {
        let provider = self.registry.resolve(vendor)?;
        tracing::debug!(vendor = %provider.vendor(), version = %request.version, "解析下载地址");
        provider.get_download_url(request).await
    }

    /// 安装 JDK/JRE，返回解压出的目录
    ///
    /// `path` 为空时按 `is_jre` 选择配置中的 jdk/jre 目录。下载的临时文件无论成败都会删除。
    pub async fn install(
        &self,
        vendor: Option<&str>,
        request: &DownloadRequest,
        path: Option<&Path>,
    ) -> AppResult<PathBuf> {
        let url = self.resolve_url(vendor, request).await?;
        println!("🔗 下载地址: {}", url);

        let destination = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.install_dir(request.is_jre).clone());

        let temp_dir = TempDir::new()?;
        let archive = self.downloader.download(&url, temp_dir.path()).await?;
        println!("📦 下载完成: {}", archive.display());

        let format = ArchiveFormat::classify_path(&archive);
        let jdk_dir = extract(&archive, format, &destination)?;

        let converted = unpack_jars(&jdk_dir)?;
        if converted > 0 {
            tracing::info!(converted, "已转换 pack200 文件");
        }

        println!("✅ 安装完成: {}", jdk_dir.display());
        Ok(jdk_dir)
    }

    /// 删除名称匹配 `jdk{version}` 的安装目录，返回被删除的路径
    pub fn uninstall(&self, version: &str, jre: bool) -> AppResult<Vec<PathBuf>> {
        let install_dir = self.config.install_dir(jre);
        if !install_dir.exists() {
            return Ok(Vec::new());
        }

        let version = normalize_version(version);
        let mut removed = Vec::new();
        for entry in fs::read_dir(install_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !entry.file_type()?.is_dir() || !matches_version(&name, &version) {
                continue;
            }

            let path = entry.path();
            println!("🗑️  删除: {}", path.display());
            fs::remove_dir_all(&path)?;
            removed.push(path);
        }

        if removed.is_empty() {
            tracing::info!(%version, dir = %install_dir.display(), "没有匹配的安装目录");
        }
        Ok(removed)
    }
}

/// 去掉 `-` 后包含 `jdk{version}`，且其后不是数字（避免 `17` 匹配 `171`）
fn matches_version(dir_name: &str, version: &str) -> bool {
    if version.is_empty() {
        return false;
    }
    let compact = dir_name.replace('-', "");
    let needle = format!("jdk{}", version);
    compact.match_indices(&needle).any(|(idx, _)| {
        !compact[idx + needle.len()..]
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
    })
}
