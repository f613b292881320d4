use super::provider::{options_for, DownloadRequest, JdkProvider, VendorOptions};
use crate::core::capability::capability;
use crate::core::constants::endpoints;
use crate::core::{
    resolve_arch, resolve_os, Architecture, HeapSize, ImageType, OperatingSystem, ReleaseType,
    Vendor,
};
use crate::error::AppResult;
use async_trait::async_trait;

capability! {
    /// Adoptium 支持的 CPU 架构（通用架构加上厂商专属架构）
    AdoptiumArchitecture {
        X64 => "x64",
        X86 => "x86",
        Ppc64 => "ppc64",
        Aarch64 => "aarch64",
        Arm => "arm",
        X32 => "x32",
        Ppc64le => "ppc64le",
        S390x => "s390x",
        Sparcv9 => "sparcv9",
        Riscv64 => "riscv64",
    }
}

impl From<Architecture> for AdoptiumArchitecture {
    fn from(arch: Architecture) -> Self {
        match arch {
            Architecture::X64 => AdoptiumArchitecture::X64,
            Architecture::X86 => AdoptiumArchitecture::X86,
            Architecture::Ppc64 => AdoptiumArchitecture::Ppc64,
            Architecture::Aarch64 => AdoptiumArchitecture::Aarch64,
            Architecture::Arm => AdoptiumArchitecture::Arm,
        }
    }
}

capability! {
    AdoptiumImageType {
        Jdk => "jdk",
        Jre => "jre",
        TestImage => "testimage",
        DebugImage => "debugimage",
        StaticLibs => "staticlibs",
        Sources => "sources",
        Sbom => "sbom",
    }
}

impl From<ImageType> for AdoptiumImageType {
    fn from(image_type: ImageType) -> Self {
        match image_type {
            ImageType::Jdk => AdoptiumImageType::Jdk,
            ImageType::Jre => AdoptiumImageType::Jre,
        }
    }
}

capability! {
    /// C 运行库
    CLib {
        Musl => "musl",
        Glibc => "glibc",
    }
}

capability! {
    Project {
        Jdk => "jdk",
        Valhalla => "valhalla",
        Metropolis => "metropolis",
        Jfr => "jfr",
        Shenandoah => "shenandoah",
    }
}

/// Adoptium API 环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdoptiumEnvironment {
    #[default]
    Production,
    Staging,
}

impl AdoptiumEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            AdoptiumEnvironment::Production => endpoints::ADOPTIUM_PRODUCTION,
            AdoptiumEnvironment::Staging => endpoints::ADOPTIUM_STAGING,
        }
    }
}

/// Adoptium 专属选项
#[derive(Debug, Clone)]
pub struct AdoptiumOptions {
    pub heap_size: HeapSize,
    pub image_type: Option<AdoptiumImageType>,
    pub release_type: ReleaseType,
    /// URL 中的 vendor 路径段
    pub vendor: String,
    pub c_lib: Option<CLib>,
    pub project: Option<Project>,
    /// 覆盖通用架构，用于只有 Adoptium 提供的架构
    pub architecture: Option<AdoptiumArchitecture>,
}

impl Default for AdoptiumOptions {
    fn default() -> Self {
        Self {
            heap_size: HeapSize::default(),
            image_type: None,
            release_type: ReleaseType::default(),
            vendor: "eclipse".to_string(),
            c_lib: None,
            project: None,
            architecture: None,
        }
    }
}

/// Adoptium 下载地址生成器，纯模板拼接，不访问网络
pub struct AdoptiumProvider {
    base_url: String,
}

impl AdoptiumProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_environment(environment: AdoptiumEnvironment) -> Self {
        Self::new(environment.base_url())
    }

    pub fn build_url(&self, request: &DownloadRequest) -> AppResult<String> {
        let options = options_for(&Vendor::Adoptium, &request.options, VendorOptions::as_adoptium);
        let version = &request.version;

        let os = resolve_os(request.operating_system)?;
        let mut arch = match options.architecture {
            Some(arch) => arch,
            None => AdoptiumArchitecture::from(resolve_arch(request.architecture)?),
        };

        // Apple Silicon 可能被识别为 arm
        if os == OperatingSystem::Mac && arch == AdoptiumArchitecture::Arm {
            arch = AdoptiumArchitecture::Aarch64;
        }

        let image_type = if request.is_jre {
            AdoptiumImageType::Jre
        } else if options.c_lib.is_some() {
            AdoptiumImageType::StaticLibs
        } else {
            options.image_type.unwrap_or(AdoptiumImageType::Jdk)
        };

        let mut url = format!(
            "{}/v3/binary/latest/{}/{}/{}/{}/{}/{}/{}/{}",
            self.base_url,
            version,
            options.release_type,
            os,
            arch,
            image_type,
            request.implementation,
            options.heap_size,
            options.vendor,
        );

        let mut query = Vec::new();
        if let Some(c_lib) = options.c_lib {
            query.push(format!("c_lib={}", c_lib));
        }
        if let Some(project) = options.project {
            query.push(format!("project={}", project));
        }
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }

        tracing::debug!(%url, "Adoptium 下载地址");
        Ok(url)
    }
}

impl Default for AdoptiumProvider {
    fn default() -> Self {
        Self::with_environment(AdoptiumEnvironment::Production)
    }
}

#[async_trait]
impl JdkProvider for AdoptiumProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Adoptium
    }

    async fn get_download_url(&self, request: &DownloadRequest) -> AppResult<String> {
        self.build_url(request)
    }
}
