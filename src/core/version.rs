/// 规范化 Java 版本号
///
/// 唯一的规则是旧式 `1.8` 写作 `8`，其余版本原样返回，格式错误留给厂商接口报告。
pub fn normalize_version(version: &str) -> String {
    if version == "1.8" {
        "8".to_string()
    } else {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_eight() {
        assert_eq!(normalize_version("1.8"), "8");
        assert_eq!(normalize_version("17"), "17");
        assert_eq!(normalize_version("11.0.2"), "11.0.2");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for v in ["1.8", "8", "17", "21.0.1", "", "1.8.0"] {
            let once = normalize_version(v);
            assert_eq!(normalize_version(&once), once);
        }
    }
}
