use super::http_client::HttpClient;
use super::provider::{options_for, DownloadRequest, JdkProvider, VendorOptions};
use crate::core::capability::capability;
use crate::core::constants::endpoints;
use crate::core::{resolve_arch, ImageType, OperatingSystem, Vendor};
use crate::error::{AppError, AppResult, Dimension};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;

capability! {
    /// Corretto 索引中的操作系统键
    CorrettoOperatingSystem {
        Linux => "linux",
        Windows => "windows",
        Solaris => "solaris",
        Aix => "aix",
        Al2 => "al2",
        Al2022 => "al2022",
        Alpine => "alpine",
        Jmc => "jmc",
        Macos => "macos",
    }
}

impl From<OperatingSystem> for CorrettoOperatingSystem {
    fn from(os: OperatingSystem) -> Self {
        match os {
            OperatingSystem::Linux => CorrettoOperatingSystem::Linux,
            OperatingSystem::Windows => CorrettoOperatingSystem::Windows,
            OperatingSystem::Mac => CorrettoOperatingSystem::Macos,
            OperatingSystem::Solaris => CorrettoOperatingSystem::Solaris,
            OperatingSystem::Aix => CorrettoOperatingSystem::Aix,
            OperatingSystem::AlpineLinux => CorrettoOperatingSystem::Alpine,
        }
    }
}

impl CorrettoOperatingSystem {
    pub fn detect() -> Option<Self> {
        OperatingSystem::detect().map(Self::from)
    }

    pub fn file_format(&self) -> &'static str {
        match self {
            CorrettoOperatingSystem::Windows => "zip",
            _ => "tar.gz",
        }
    }
}

capability! {
    CorrettoImageType {
        Jdk => "jdk",
        Jre => "jre",
        Headless => "headless",
    }
}

impl From<ImageType> for CorrettoImageType {
    fn from(image_type: ImageType) -> Self {
        match image_type {
            ImageType::Jdk => CorrettoImageType::Jdk,
            ImageType::Jre => CorrettoImageType::Jre,
        }
    }
}

/// Corretto 专属选项
#[derive(Debug, Clone, Default)]
pub struct CorrettoOptions {
    pub image_type: Option<CorrettoImageType>,
    /// 覆盖通用操作系统，例如 al2
    pub operating_system: Option<CorrettoOperatingSystem>,
}

/// Corretto 远程索引
///
/// 结构为 os → arch → image_type → version → file_format → { resource }。
#[derive(Debug, Clone)]
pub struct CorrettoIndex {
    root: Value,
}

impl CorrettoIndex {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// 逐级查找资源路径，缺失时指出具体缺失的维度
    pub fn resource(
        &self,
        os: CorrettoOperatingSystem,
        arch: &str,
        image_type: CorrettoImageType,
        version: &str,
        file_format: &str,
    ) -> AppResult<&str> {
        let levels = [
            (Dimension::OperatingSystem, os.as_str()),
            (Dimension::Architecture, arch),
            (Dimension::ImageType, image_type.as_str()),
            (Dimension::Version, version),
            (Dimension::FileFormat, file_format),
        ];

        let mut node = &self.root;
        for (dimension, key) in levels {
            node = node
                .get(key)
                .ok_or_else(|| AppError::not_offered(Vendor::Corretto.name(), dimension, key))?;
        }

        node.get("resource")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Resolution {
                vendor: Vendor::Corretto.name().to_string(),
                message: format!("索引条目缺少 resource 字段: {}/{}", version, file_format),
            })
    }
}

/// 基于远程索引的 Corretto 下载地址解析器
///
/// 索引在首次使用时下载一次，之后整个实例生命周期内复用。
pub struct CorrettoProvider {
    base_url: String,
    index_url: String,
    http: HttpClient,
    index: OnceCell<Arc<CorrettoIndex>>,
}

impl CorrettoProvider {
    pub fn new(base_url: &str, index_url: &str, http: HttpClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            index_url: index_url.to_string(),
            http,
            index: OnceCell::new(),
        }
    }

    /// 使用已加载的索引，不再访问网络
    pub fn with_index(base_url: &str, index: Value, http: HttpClient) -> Self {
        let mut provider = Self::new(base_url, endpoints::CORRETTO_INDEX_MAP, http);
        provider.index = OnceCell::new_with(Some(Arc::new(CorrettoIndex::new(index))));
        provider
    }

    /// 读取索引，并发调用只会触发一次下载
    pub async fn index(&self) -> AppResult<Arc<CorrettoIndex>> {
        let index = self
            .index
            .get_or_try_init(|| async {
                tracing::info!(url = %self.index_url, "下载 Corretto 索引");
                let root: Value = self.http.get_json(&self.index_url).await?;
                Ok::<_, AppError>(Arc::new(CorrettoIndex::new(root)))
            })
            .await?;
        Ok(Arc::clone(index))
    }
}

#[async_trait]
impl JdkProvider for CorrettoProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Corretto
    }

    async fn get_download_url(&self, request: &DownloadRequest) -> AppResult<String> {
        let options = options_for(&Vendor::Corretto, &request.options, VendorOptions::as_corretto);

        let os = match (options.operating_system, request.operating_system) {
            (Some(os), _) => os,
            (None, Some(os)) => CorrettoOperatingSystem::from(os),
            (None, None) => CorrettoOperatingSystem::detect()
                .ok_or_else(|| AppError::not_detected("operating_system"))?,
        };
        let arch = resolve_arch(request.architecture)?;

        let image_type = if request.is_jre {
            CorrettoImageType::Jre
        } else {
            options.image_type.unwrap_or(CorrettoImageType::Jdk)
        };

        let index = self.index().await?;
        let resource = index.resource(
            os,
            arch.as_str(),
            image_type,
            &request.version,
            os.file_format(),
        )?;

        let url = format!("{}{}", self.base_url, resource);
        tracing::debug!(%url, "Corretto 下载地址");
        Ok(url)
    }
}
