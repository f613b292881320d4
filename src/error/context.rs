use crate::error::AppError;
use thiserror::Error;

/// 用于提供错误上下文和用户友好建议
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub suggestions: Vec<String>,
}

/// 带有上下文的错误
#[derive(Error, Debug)]
pub struct ContextualError {
    #[source]
    pub error: AppError,
    pub context: ErrorContext,
}

impl std::fmt::Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "操作失败: {}\n错误: {}", self.context.operation, self.error)
    }
}

impl ContextualError {
    pub fn new(error: AppError, operation: &str) -> Self {
        let suggestions = default_suggestions(&error)
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            error,
            context: ErrorContext {
                operation: operation.to_string(),
                suggestions,
            },
        }
    }

    /// 追加建议
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.context.suggestions.push(suggestion.to_string());
        self
    }

    /// 获取用户友好的错误消息
    pub fn user_message(&self) -> String {
        let mut msg = format!("❌ {}\n", self.context.operation);
        msg.push_str(&format!("原因: {}\n", self.error));

        if !self.context.suggestions.is_empty() {
            msg.push_str("💡 建议:\n");
            for suggestion in &self.context.suggestions {
                msg.push_str(&format!("  • {}\n", suggestion));
            }
        }

        msg
    }
}

fn default_suggestions(error: &AppError) -> &'static [&'static str] {
    match error {
        AppError::CapabilityNotDetected { .. } => &["使用 --os / --arch 显式指定平台"],
        AppError::VendorNotFound { .. } => &["运行 `install-jdk vendors` 查看可用厂商"],
        AppError::CapabilityNotOffered { .. } => &["换一个版本或厂商重试"],
        AppError::PathTraversal { .. } => &["压缩包可能已被篡改，请勿使用该文件"],
        AppError::Http(_) | AppError::Network { .. } => &["检查网络连接后重试"],
        _ => &[],
    }
}

/// 为Result添加上下文信息的辅助函数
pub fn with_context<T, E: Into<AppError>>(
    result: Result<T, E>,
    operation: &str,
) -> Result<T, ContextualError> {
    result.map_err(|e| ContextualError::new(e.into(), operation))
}
