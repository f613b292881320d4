use super::http_client::HttpClient;
use super::provider::{options_for, DownloadRequest, JdkProvider, VendorOptions};
use crate::core::capability::capability;
use crate::core::{resolve_arch, Architecture, OperatingSystem, Vendor};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Deserialize;

capability! {
    ZuluOperatingSystem {
        Linux => "linux",
        LinuxMusl => "linux_musl",
        Windows => "windows",
        Macos => "macos",
        Solaris => "solaris",
        Aix => "aix",
        Qnx => "qnx",
    }
}

impl From<OperatingSystem> for ZuluOperatingSystem {
    fn from(os: OperatingSystem) -> Self {
        match os {
            OperatingSystem::Linux => ZuluOperatingSystem::Linux,
            OperatingSystem::AlpineLinux => ZuluOperatingSystem::LinuxMusl,
            OperatingSystem::Windows => ZuluOperatingSystem::Windows,
            OperatingSystem::Mac => ZuluOperatingSystem::Macos,
            OperatingSystem::Solaris => ZuluOperatingSystem::Solaris,
            OperatingSystem::Aix => ZuluOperatingSystem::Aix,
        }
    }
}

impl ZuluOperatingSystem {
    pub fn detect() -> Option<Self> {
        OperatingSystem::detect().map(Self::from)
    }

    pub fn archive_ext(&self) -> &'static str {
        match self {
            ZuluOperatingSystem::Windows => "zip",
            _ => "tar.gz",
        }
    }
}

capability! {
    /// Zulu 架构不区分位数，位数由 hw_bitness 单独给出
    ZuluArchitecture {
        X86 => "x86",
        Arm => "arm",
        Ppc => "ppc",
        Mips => "mips",
        Sparcv9 => "sparcv9",
    }
}

impl From<Architecture> for ZuluArchitecture {
    fn from(arch: Architecture) -> Self {
        match arch {
            Architecture::X64 | Architecture::X86 => ZuluArchitecture::X86,
            Architecture::Aarch64 | Architecture::Arm => ZuluArchitecture::Arm,
            Architecture::Ppc64 => ZuluArchitecture::Ppc,
        }
    }
}

capability! {
    ZuluBitness {
        Bits64 => "64",
        Bits32 => "32",
    }
}

impl From<Architecture> for ZuluBitness {
    fn from(arch: Architecture) -> Self {
        if arch.is_64_bit() {
            ZuluBitness::Bits64
        } else {
            ZuluBitness::Bits32
        }
    }
}

impl ZuluBitness {
    pub fn detect() -> Self {
        if cfg!(target_pointer_width = "64") {
            ZuluBitness::Bits64
        } else {
            ZuluBitness::Bits32
        }
    }
}

capability! {
    /// 浮点 ABI，仅对 32 位 ARM 有意义
    ZuluFloatingPointAbi {
        SoftFloat => "soft_float",
        HardFloat => "hard_float",
    }
}

capability! {
    ZuluReleaseType {
        Ga => "ga",
        Ea => "ea",
        Both => "both",
    }
}

capability! {
    ZuluSupportTerm {
        Lts => "lts",
        Mts => "mts",
        Sts => "sts",
    }
}

capability! {
    ZuluFeature {
        Cp3 => "cp3",
        Fx => "fx",
        Headful => "headful",
        Headfull => "headfull",
        Headless => "headless",
        Jdk => "jdk",
    }
}

capability! {
    ZuluImageType {
        Jdk => "jdk",
        Jre => "jre",
    }
}

/// Zulu 专属选项
#[derive(Debug, Clone)]
pub struct ZuluOptions {
    pub zulu_version: Option<String>,
    /// 未指定时由架构推断
    pub hw_bitness: Option<ZuluBitness>,
    pub abi: Option<ZuluFloatingPointAbi>,
    pub javafx: bool,
    pub release_type: ZuluReleaseType,
    pub support_term: ZuluSupportTerm,
    pub features: Vec<ZuluFeature>,
    pub image_type: Option<ZuluImageType>,
}

impl Default for ZuluOptions {
    fn default() -> Self {
        Self {
            zulu_version: None,
            hw_bitness: None,
            abi: None,
            javafx: false,
            release_type: ZuluReleaseType::Ga,
            support_term: ZuluSupportTerm::Lts,
            features: vec![ZuluFeature::Jdk],
            image_type: None,
        }
    }
}

/// bundles 接口的响应
#[derive(Debug, Deserialize)]
struct BundleResponse {
    #[serde(default)]
    url: Option<String>,
}

/// 通过 Azul 查询接口解析下载地址
pub struct ZuluProvider {
    base_url: String,
    http: HttpClient,
}

impl ZuluProvider {
    pub fn new(base_url: &str, http: HttpClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// 组装查询参数，顺序固定
    pub fn build_query(&self, request: &DownloadRequest) -> AppResult<Vec<(&'static str, String)>> {
        let options = options_for(&Vendor::Zulu, &request.options, VendorOptions::as_zulu);
        let version = &request.version;

        let os = match request.operating_system {
            Some(os) => ZuluOperatingSystem::from(os),
            None => ZuluOperatingSystem::detect()
                .ok_or_else(|| AppError::not_detected("operating_system"))?,
        };
        let generic_arch = resolve_arch(request.architecture)?;
        let arch = ZuluArchitecture::from(generic_arch);
        let bitness = options
            .hw_bitness
            .unwrap_or_else(|| ZuluBitness::from(generic_arch));

        let image_type = if request.is_jre {
            ZuluImageType::Jre
        } else {
            options.image_type.unwrap_or(ZuluImageType::Jdk)
        };

        let jdk_version = if version.contains(".0") {
            version.to_string()
        } else {
            format!("{}.0", version)
        };

        let mut params = vec![("jdk_version", jdk_version)];
        if let Some(zulu_version) = options.zulu_version {
            params.push(("zulu_version", zulu_version));
        }
        params.push(("os", os.to_string()));
        params.push(("arch", arch.to_string()));
        params.push(("hw_bitness", bitness.to_string()));
        if let Some(abi) = options.abi {
            if arch == ZuluArchitecture::Arm && bitness == ZuluBitness::Bits32 {
                params.push(("abi", abi.to_string()));
            }
        }
        params.push(("ext", os.archive_ext().to_string()));
        params.push(("bundle_type", image_type.to_string()));
        params.push(("javafx", options.javafx.to_string()));
        params.push(("release_status", options.release_type.to_string()));
        params.push(("support_term", options.support_term.to_string()));
        let features = options
            .features
            .iter()
            .map(|f| f.as_str().to_lowercase())
            .collect::<Vec<_>>()
            .join(",");
        params.push(("features", features));

        Ok(params)
    }

    pub fn build_query_url(&self, request: &DownloadRequest) -> AppResult<String> {
        let params = self.build_query(request)?;
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        Ok(format!("{}/bundles/latest/?{}", self.base_url, query))
    }
}

#[async_trait]
impl JdkProvider for ZuluProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Zulu
    }

    async fn get_download_url(&self, request: &DownloadRequest) -> AppResult<String> {
        let query_url = self.build_query_url(request)?;
        tracing::debug!(url = %query_url, "查询 Zulu bundle");

        let response = self.http.get_raw(&query_url).await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::Resolution {
                vendor: Vendor::Zulu.name().to_string(),
                message: format!("没有匹配的 bundle (Java {})", request.version),
            });
        }
        if !status.is_success() {
            return Err(AppError::Network {
                message: format!("服务器返回状态码: {} (URL: {})", status, query_url),
            });
        }

        let bytes = response.bytes().await?;
        let bundle: BundleResponse = serde_json::from_slice(&bytes)?;
        bundle.url.ok_or_else(|| AppError::Resolution {
            vendor: Vendor::Zulu.name().to_string(),
            message: "响应中缺少 url 字段".to_string(),
        })
    }
}
