use std::fmt;
use std::io;
use thiserror::Error;

/// 厂商目录中缺失的维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    OperatingSystem,
    Architecture,
    ImageType,
    Version,
    FileFormat,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::OperatingSystem => "operating_system",
            Dimension::Architecture => "architecture",
            Dimension::ImageType => "image_type",
            Dimension::Version => "version",
            Dimension::FileFormat => "file_format",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("无法检测当前主机的 {capability}")]
    CapabilityNotDetected { capability: &'static str },

    #[error("未找到厂商: {vendor}")]
    VendorNotFound { vendor: String },

    #[error("{vendor} 不提供 {dimension} = {value}")]
    CapabilityNotOffered {
        vendor: String,
        dimension: Dimension,
        value: String,
    },

    #[error("压缩包条目试图越出解压目录: {entry}")]
    PathTraversal { entry: String },

    #[error("无效的下载地址: {url}")]
    InvalidDownloadUrl { url: String },

    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("网络错误: {message}")]
    Network { message: String },

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{vendor} 无法解析下载地址: {message}")]
    Resolution { vendor: String, message: String },

    #[error("解压失败: {message}")]
    Extraction { message: String },

    #[error("配置错误: {message}")]
    Config { message: String },

    #[error("验证错误: {field} - {reason}")]
    Validation { field: String, reason: String },
}

/// 应用程序 Result 类型
pub type AppResult<T> = Result<T, AppError>;

/// 便捷的错误创建函数
impl AppError {
    pub fn not_detected(capability: &'static str) -> Self {
        Self::CapabilityNotDetected { capability }
    }

    pub fn vendor_not_found(vendor: &str) -> Self {
        Self::VendorNotFound {
            vendor: vendor.to_string(),
        }
    }

    pub fn not_offered(vendor: &str, dimension: Dimension, value: impl Into<String>) -> Self {
        Self::CapabilityNotOffered {
            vendor: vendor.to_string(),
            dimension,
            value: value.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn invalid_value(field: &str, value: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: format!("不支持的取值 '{}'", value),
        }
    }

    /// 为错误添加上下文信息
    pub fn with_context(self, operation: &str) -> super::ContextualError {
        super::ContextualError::new(self, operation)
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => AppError::Io(e),
            other => AppError::extraction(other.to_string()),
        }
    }
}
