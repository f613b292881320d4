//! 应用程序常量定义

/// 厂商服务地址
pub mod endpoints {
    pub const ADOPTIUM_PRODUCTION: &str = "https://api.adoptium.net";
    pub const ADOPTIUM_STAGING: &str = "https://staging-api.adoptium.net";
    pub const CORRETTO_PRODUCTION: &str = "https://corretto.aws";
    pub const CORRETTO_INDEX_MAP: &str = "https://raw.githubusercontent.com/corretto/corretto-downloads/main/latest_links/indexmap_with_checksum.json";
    pub const ZULU_PRODUCTION: &str = "https://api.azul.com/zulu/download/community/v1.0";
}

/// 网络相关常量
pub mod network {
    /// 部分厂商拒绝没有浏览器标识的请求
    pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
}

/// 安装目录相关常量
pub mod install {
    pub const JDK_DIR_NAME: &str = ".jdk";
    pub const JRE_DIR_NAME: &str = ".jre";
    pub const CONFIG_DIR_NAME: &str = ".install-jdk";
    pub const CONFIG_FILE_NAME: &str = "config.toml";
    pub const CONFIG_PATH_ENV: &str = "INSTALL_JDK_CONFIG";
    pub const LOG_FILTER_ENV: &str = "INSTALL_JDK_LOG";
    pub const DEFAULT_VENDOR: &str = "Adoptium";
}
