use crate::core::constants::{endpoints, install, network};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// 配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JDK 默认安装目录
    #[serde(default = "default_jdk_dir")]
    pub jdk_dir: PathBuf,
    /// JRE 默认安装目录
    #[serde(default = "default_jre_dir")]
    pub jre_dir: PathBuf,
    /// 未指定厂商时使用的厂商
    #[serde(default = "default_vendor")]
    pub default_vendor: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub endpoints: Endpoints,
}

/// 厂商服务地址
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_adoptium")]
    pub adoptium: String,
    #[serde(default = "default_corretto")]
    pub corretto: String,
    #[serde(default = "default_corretto_index")]
    pub corretto_index: String,
    #[serde(default = "default_zulu")]
    pub zulu: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            adoptium: default_adoptium(),
            corretto: default_corretto(),
            corretto_index: default_corretto_index(),
            zulu: default_zulu(),
        }
    }
}

impl Endpoints {
    /// 所有地址都以 `${VAR}` 形式支持环境变量
    fn resolved(&self) -> Self {
        Self {
            adoptium: resolve_env_var(&self.adoptium),
            corretto: resolve_env_var(&self.corretto),
            corretto_index: resolve_env_var(&self.corretto_index),
            zulu: resolve_env_var(&self.zulu),
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_jdk_dir() -> PathBuf {
    home_dir().join(install::JDK_DIR_NAME)
}

fn default_jre_dir() -> PathBuf {
    home_dir().join(install::JRE_DIR_NAME)
}

fn default_vendor() -> String {
    install::DEFAULT_VENDOR.to_string()
}

fn default_user_agent() -> String {
    network::DEFAULT_USER_AGENT.to_string()
}

fn default_adoptium() -> String {
    endpoints::ADOPTIUM_PRODUCTION.to_string()
}

fn default_corretto() -> String {
    endpoints::CORRETTO_PRODUCTION.to_string()
}

fn default_corretto_index() -> String {
    endpoints::CORRETTO_INDEX_MAP.to_string()
}

fn default_zulu() -> String {
    endpoints::ZULU_PRODUCTION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// 创建默认配置
    pub fn new() -> Self {
        Config {
            jdk_dir: default_jdk_dir(),
            jre_dir: default_jre_dir(),
            default_vendor: default_vendor(),
            user_agent: default_user_agent(),
            endpoints: Endpoints::default(),
        }
    }

    /// 从文件加载配置，文件不存在时使用默认配置
    pub fn load() -> AppResult<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Config::new());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| AppError::Config {
            message: format!("无法读取配置文件 {}: {}", config_path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let mut config: Config = toml::from_str(content).map_err(|e| AppError::Config {
            message: format!("解析配置文件失败: {}", e),
        })?;
        config.endpoints = config.endpoints.resolved();
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self) -> AppResult<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_content = toml::to_string_pretty(self).map_err(|e| AppError::Config {
            message: format!("序列化配置失败: {}", e),
        })?;
        fs::write(&config_path, toml_content)?;

        Ok(())
    }

    /// 根据镜像类型选择安装目录
    pub fn install_dir(&self, jre: bool) -> &PathBuf {
        if jre {
            &self.jre_dir
        } else {
            &self.jdk_dir
        }
    }
}

/// 解析环境变量引用（如 ${VAR_NAME}）
pub fn resolve_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        env::var(var_name).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}

/// 获取配置文件路径
pub fn get_config_path() -> AppResult<PathBuf> {
    if let Ok(path) = env::var(install::CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let home_dir = dirs::home_dir().ok_or_else(|| AppError::Config {
        message: "无法获取用户主目录".to_string(),
    })?;

    Ok(home_dir
        .join(install::CONFIG_DIR_NAME)
        .join(install::CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_env_var() {
        env::set_var("INSTALL_JDK_TEST_VAR", "https://mirror.example.com");

        let resolved = resolve_env_var("${INSTALL_JDK_TEST_VAR}");
        assert_eq!(resolved, "https://mirror.example.com");

        let not_resolved = resolve_env_var("normal_value");
        assert_eq!(not_resolved, "normal_value");

        env::remove_var("INSTALL_JDK_TEST_VAR");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            jdk_dir = "/opt/jdk"

            [endpoints]
            zulu = "http://localhost:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.jdk_dir, PathBuf::from("/opt/jdk"));
        assert_eq!(config.default_vendor, "Adoptium");
        assert_eq!(config.endpoints.zulu, "http://localhost:9000");
        assert_eq!(config.endpoints.adoptium, endpoints::ADOPTIUM_PRODUCTION);
    }

    #[test]
    fn test_install_dir_follows_jre_flag() {
        let config = Config::new();
        assert!(config.install_dir(true).ends_with(".jre"));
        assert!(config.install_dir(false).ends_with(".jdk"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("jdk_dir = [").unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
