use crate::error::AppResult;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

fn tool_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "unpack200.exe"
    } else {
        "unpack200"
    }
}

fn tool_args() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &["-r", "-v", "-l", ""]
    } else {
        &[]
    }
}

/// 查找需要转换的 pack200 文件（扩展名以 `pack` 结尾）
pub fn find_packed_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.to_string_lossy().ends_with("pack"))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

/// 用 JDK 自带的 unpack200 把 `.pack` 文件还原为 `.jar`
///
/// 新版 JDK 已不再携带该工具，此时直接跳过。返回成功转换的文件数。
pub fn unpack_jars(jdk_dir: &Path) -> AppResult<usize> {
    let tool = jdk_dir.join("bin").join(tool_name());
    let packed = find_packed_files(jdk_dir);
    if packed.is_empty() {
        return Ok(0);
    }
    if !tool.is_file() {
        tracing::debug!(tool = %tool.display(), "未找到 unpack200，跳过 pack200 转换");
        return Ok(0);
    }

    let mut converted = 0;
    for pack in packed {
        let jar = pack.with_extension("jar");
        let status = Command::new(&tool)
            .args(tool_args())
            .arg(&pack)
            .arg(&jar)
            .status()?;
        if status.success() {
            converted += 1;
        } else {
            tracing::warn!(file = %pack.display(), %status, "unpack200 转换失败");
        }
    }
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_packed_files() {
        let dir = TempDir::new().unwrap();
        let lib = dir.path().join("jre").join("lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("rt.pack"), b"").unwrap();
        fs::write(lib.join("tools.jar"), b"").unwrap();
        fs::write(dir.path().join("release"), b"").unwrap();

        let found = find_packed_files(dir.path());
        assert_eq!(found, vec![lib.join("rt.pack")]);
    }

    #[test]
    fn test_missing_tool_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("rt.pack"), b"").unwrap();
        assert_eq!(unpack_jars(dir.path()).unwrap(), 0);
    }
}
