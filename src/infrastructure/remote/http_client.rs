use crate::core::constants::network::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult};
use reqwest::{Client, Response};

/// HTTP 客户端包装器
///
/// 不设置超时，需要超时的调用方自行包装。
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// 创建新的 HTTP 客户端
    pub fn new() -> AppResult<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// 创建带自定义 User-Agent 的 HTTP 客户端
    pub fn with_user_agent(user_agent: &str) -> AppResult<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// GET 请求，非 2xx 状态视为网络错误
    pub async fn get(&self, url: &str) -> AppResult<Response> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network {
                message: format!("服务器返回状态码: {} (URL: {})", status, url),
            });
        }
        Ok(response)
    }

    /// GET 请求并返回 JSON
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// 不检查状态码的 GET，用于需要读取错误响应体的接口
    pub async fn get_raw(&self, url: &str) -> AppResult<Response> {
        tracing::debug!(%url, "GET");
        Ok(self.client.get(url).send().await?)
    }
}
