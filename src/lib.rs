// 核心模块
pub mod cli;
pub mod core;
pub mod environments;
pub mod error;
pub mod infrastructure;

// 重新导出常用类型
pub use crate::core::{
    normalize_version, Architecture, HeapSize, ImageType, JvmImpl, OperatingSystem, ReleaseType,
    Vendor,
};
pub use environments::JavaInstaller;
pub use error::{AppError, AppResult, ContextualError};
pub use infrastructure::config::Config;
pub use infrastructure::installer::{extract, ArchiveFormat};
pub use infrastructure::remote::{
    DownloadRequest, Downloader, JdkProvider, VendorOptions, VendorRegistry,
};
