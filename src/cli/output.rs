use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::path::PathBuf;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Serialize)]
struct UrlOutput<'a> {
    vendor: &'a str,
    version: &'a str,
    url: &'a str,
}

/// 输出格式化器
pub struct OutputFormatter;

impl OutputFormatter {
    /// 格式化解析出的下载地址
    pub fn format_url(
        &self,
        vendor: &str,
        version: &str,
        url: &str,
        format: OutputFormat,
    ) -> AppResult<String> {
        match format {
            OutputFormat::Text => Ok(format!("{}\n", url)),
            OutputFormat::Json => to_json(&UrlOutput {
                vendor,
                version,
                url,
            }),
        }
    }

    /// 格式化厂商别名列表
    pub fn format_vendors(
        &self,
        aliases: &[String],
        default_vendor: &str,
        format: OutputFormat,
    ) -> AppResult<String> {
        match format {
            OutputFormat::Text => {
                let mut output = String::from("可用厂商:\n");
                for alias in aliases {
                    let marker = if alias.eq_ignore_ascii_case(default_vendor) {
                        " (默认)"
                    } else {
                        ""
                    };
                    output.push_str(&format!("  {}{}\n", alias, marker));
                }
                Ok(output)
            }
            OutputFormat::Json => to_json(&serde_json::json!({
                "default": default_vendor,
                "vendors": aliases,
            })),
        }
    }

    /// 格式化卸载结果
    pub fn format_removed(&self, version: &str, removed: &[PathBuf]) -> String {
        if removed.is_empty() {
            return format!("未找到匹配版本 {} 的安装\n", version);
        }
        let mut output = format!("✅ 已卸载 {} 个目录\n", removed.len());
        for path in removed {
            output.push_str(&format!("  {}\n", path.display()));
        }
        output
    }
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(AppError::from)
}

/// 默认输出格式化器实例
pub static FORMATTER: OutputFormatter = OutputFormatter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_url_json() {
        let output = FORMATTER
            .format_url("zulu", "17", "https://example.com/a.tar.gz", OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["vendor"], "zulu");
        assert_eq!(value["url"], "https://example.com/a.tar.gz");
    }

    #[test]
    fn test_format_vendors_marks_default() {
        let aliases = vec!["Adoptium".to_string(), "zulu".to_string()];
        let output = FORMATTER
            .format_vendors(&aliases, "adoptium", OutputFormat::Text)
            .unwrap();
        assert!(output.contains("Adoptium (默认)"));
        assert!(output.contains("  zulu\n"));
    }

    #[test]
    fn test_format_removed_empty() {
        assert!(FORMATTER.format_removed("8", &[]).contains("未找到匹配版本 8"));
    }
}
