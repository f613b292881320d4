use super::adoptium::AdoptiumProvider;
use super::corretto::CorrettoProvider;
use super::http_client::HttpClient;
use super::provider::JdkProvider;
use super::zulu::ZuluProvider;
use crate::core::Vendor;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use std::collections::HashMap;
use std::sync::Arc;

/// 厂商注册表：别名（大小写不敏感）到下载地址解析器的映射
///
/// 启动时注册一次，之后只读。同一别名重复注册时保留第一次注册。
pub struct VendorRegistry {
    providers: HashMap<String, Arc<dyn JdkProvider>>,
    /// 保持注册顺序，便于列出
    aliases: Vec<String>,
    default_vendor: String,
}

impl VendorRegistry {
    pub fn new(default_vendor: &str) -> Self {
        Self {
            providers: HashMap::new(),
            aliases: Vec::new(),
            default_vendor: default_vendor.to_string(),
        }
    }

    /// 按配置注册全部内置厂商
    pub fn with_defaults(config: &Config) -> AppResult<Self> {
        let http = HttpClient::with_user_agent(&config.user_agent)?;
        let mut registry = Self::new(&config.default_vendor);
        registry.register_all(config, &http);
        Ok(registry)
    }

    /// 依次注册 Adoptium、Corretto、Zulu
    pub fn register_all(&mut self, config: &Config, http: &HttpClient) {
        let endpoints = &config.endpoints;
        for vendor in Vendor::KNOWN {
            let provider: Arc<dyn JdkProvider> = match vendor {
                Vendor::Adoptium => Arc::new(AdoptiumProvider::new(&endpoints.adoptium)),
                Vendor::Corretto => Arc::new(CorrettoProvider::new(
                    &endpoints.corretto,
                    &endpoints.corretto_index,
                    http.clone(),
                )),
                Vendor::Zulu => Arc::new(ZuluProvider::new(&endpoints.zulu, http.clone())),
                Vendor::Unknown(_) => continue,
            };
            self.register(vendor.aliases(), provider);
        }
    }

    /// 以一个或多个别名注册，已被占用的别名保持原有注册
    pub fn register(&mut self, aliases: &[&str], provider: Arc<dyn JdkProvider>) {
        for alias in aliases {
            let key = alias.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            if self.providers.contains_key(&key) {
                tracing::warn!(alias = %alias, "厂商别名已注册，忽略重复注册");
                continue;
            }
            self.providers.insert(key, Arc::clone(&provider));
            self.aliases.push(alias.to_string());
        }
    }

    /// 查找厂商，`None` 或空字符串使用默认厂商
    pub fn resolve(&self, vendor: Option<&str>) -> AppResult<Arc<dyn JdkProvider>> {
        let requested = vendor.map(str::trim).filter(|v| !v.is_empty());
        let name = requested.unwrap_or(&self.default_vendor);

        self.providers
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| AppError::vendor_not_found(name))
    }

    pub fn resolve_vendor(&self, vendor: &Vendor) -> AppResult<Arc<dyn JdkProvider>> {
        self.resolve(Some(vendor.name()))
    }

    /// 已注册的别名，按注册顺序
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }
}
