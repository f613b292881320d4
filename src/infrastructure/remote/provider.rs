use super::adoptium::AdoptiumOptions;
use super::corretto::CorrettoOptions;
use super::zulu::ZuluOptions;
use crate::core::{normalize_version, Architecture, JvmImpl, OperatingSystem, Vendor};
use crate::error::AppResult;
use async_trait::async_trait;

/// 厂商专属选项
#[derive(Debug, Clone, Default)]
pub enum VendorOptions {
    #[default]
    Default,
    Adoptium(AdoptiumOptions),
    Corretto(CorrettoOptions),
    Zulu(ZuluOptions),
}

impl VendorOptions {
    pub fn as_adoptium(&self) -> Option<&AdoptiumOptions> {
        match self {
            VendorOptions::Adoptium(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_corretto(&self) -> Option<&CorrettoOptions> {
        match self {
            VendorOptions::Corretto(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_zulu(&self) -> Option<&ZuluOptions> {
        match self {
            VendorOptions::Zulu(o) => Some(o),
            _ => None,
        }
    }
}

/// 规范化后的下载请求
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub version: String,
    pub operating_system: Option<OperatingSystem>,
    pub architecture: Option<Architecture>,
    pub implementation: JvmImpl,
    pub is_jre: bool,
    pub options: VendorOptions,
}

impl DownloadRequest {
    /// 版本号在这里规范化一次
    pub fn new(version: &str) -> Self {
        Self {
            version: normalize_version(version),
            operating_system: None,
            architecture: None,
            implementation: JvmImpl::default(),
            is_jre: false,
            options: VendorOptions::Default,
        }
    }

    pub fn os(mut self, os: OperatingSystem) -> Self {
        self.operating_system = Some(os);
        self
    }

    pub fn arch(mut self, arch: Architecture) -> Self {
        self.architecture = Some(arch);
        self
    }

    pub fn implementation(mut self, implementation: JvmImpl) -> Self {
        self.implementation = implementation;
        self
    }

    pub fn jre(mut self, is_jre: bool) -> Self {
        self.is_jre = is_jre;
        self
    }

    pub fn options(mut self, options: VendorOptions) -> Self {
        self.options = options;
        self
    }
}

/// 厂商下载地址解析器
///
/// `get_download_url` 可能发起网络请求（索引或查询接口），调用方按可失败的阻塞操作对待。
#[async_trait]
pub trait JdkProvider: Send + Sync {
    fn vendor(&self) -> Vendor;

    async fn get_download_url(&self, request: &DownloadRequest) -> AppResult<String>;
}

/// 取出与厂商匹配的选项，不匹配时记录警告并使用默认值
pub(crate) fn options_for<T, F>(vendor: &Vendor, options: &VendorOptions, pick: F) -> T
where
    T: Default + Clone,
    F: FnOnce(&VendorOptions) -> Option<&T>,
{
    match options {
        VendorOptions::Default => T::default(),
        other => pick(other).cloned().unwrap_or_else(|| {
            tracing::warn!(%vendor, "选项与厂商不匹配，已忽略");
            T::default()
        }),
    }
}
