//! 压缩包解压
//!
//! 支持 tar、tar.gz、zip，无法识别的后缀一律按 LZMA/XZ 压缩的 tar 处理。
//! 所有格式使用同一套路径检查：条目解析后的路径必须位于目标目录之内，
//! 否则立即中止解压，之前已写出的安全条目不会回滚。路径先按文本规范化检查，
//! 写入前再沿已写出的符号链接在真实文件系统上解析一次。
//!
//! 解压结果通过比较解压前后目标目录的顶层条目确定：必须恰好新增一个条目，
//! 没有新增或新增多个都视为错误。

use crate::error::{AppError, AppResult};
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// 压缩格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Tar,
    TarGz,
    Zip,
    /// 兜底格式
    Lzma,
}

impl ArchiveFormat {
    /// 仅按后缀判断，`.tar.gz` 必须先于 `.tar` 检查
    pub fn classify(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") {
            ArchiveFormat::TarGz
        } else if lower.ends_with(".tar") {
            ArchiveFormat::Tar
        } else if lower.ends_with(".zip") {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::Lzma
        }
    }

    pub fn classify_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::classify(&name)
    }
}

/// 解压 `file` 到 `destination`，返回新出现的顶层条目路径
pub fn extract(file: &Path, format: ArchiveFormat, destination: &Path) -> AppResult<PathBuf> {
    fs::create_dir_all(destination)?;
    let before = top_level_entries(destination)?;

    tracing::info!(
        file = %file.display(),
        destination = %destination.display(),
        ?format,
        "开始解压"
    );

    match format {
        ArchiveFormat::Tar => extract_tar(BufReader::new(File::open(file)?), destination)?,
        ArchiveFormat::TarGz => {
            extract_tar(GzDecoder::new(BufReader::new(File::open(file)?)), destination)?
        }
        ArchiveFormat::Zip => extract_zip(file, destination)?,
        ArchiveFormat::Lzma => {
            // 自动识别 .xz 与旧式 .lzma 流
            let stream = xz2::stream::Stream::new_auto_decoder(u64::MAX, 0)
                .map_err(|e| AppError::extraction(format!("初始化 LZMA 解码器失败: {}", e)))?;
            let reader =
                xz2::read::XzDecoder::new_stream(BufReader::new(File::open(file)?), stream);
            extract_tar(reader, destination)?
        }
    }

    let after = top_level_entries(destination)?;
    new_top_level_entry(&before, &after, destination)
}

/// 计算条目在目标目录下的路径，越界时返回 `PathTraversal`
fn safe_member_path(destination: &Path, name: &Path) -> AppResult<PathBuf> {
    let mut relative = PathBuf::new();
    for component in name.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return Err(traversal(name));
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(traversal(name)),
        }
    }
    Ok(destination.join(relative))
}

fn extract_tar<R: Read>(reader: R, destination: &Path) -> AppResult<()> {
    let root = fs::canonicalize(destination)?;
    let mut archive = tar::Archive::new(reader);
    archive.set_overwrite(true);
    let mut symlinks = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.into_owned();
        safe_member_path(destination, &name)?;
        let target = destination.join(&name);
        // 经过已写出的链接后，写入位置仍须在目录之内
        ensure_resolves_inside(&root, &target, &name)?;

        let entry_type = entry.header().entry_type();
        if let Some(link) = entry.link_name()? {
            let resolved = if entry_type.is_hard_link() {
                link.into_owned()
            } else {
                name.parent().unwrap_or(Path::new("")).join(link)
            };
            safe_member_path(destination, &resolved).map_err(|_| traversal(&name))?;
            if entry_type.is_hard_link() {
                ensure_resolves_inside(&root, &destination.join(&resolved), &name)?;
            }
        }

        let unpacked = entry.unpack_in(destination).map_err(|e| {
            match ensure_resolves_inside(&root, &target, &name) {
                Err(err) => err,
                Ok(()) => AppError::Io(e),
            }
        })?;
        if !unpacked {
            return Err(traversal(&name));
        }

        if entry_type.is_symlink() {
            check_symlink(&root, &target, &name)?;
            symlinks.push((target, name));
        }
    }

    // 后写出的链接可能让之前悬空的链接指向目录之外
    for (link, name) in &symlinks {
        check_symlink(&root, link, name)?;
    }
    Ok(())
}

fn traversal(name: &Path) -> AppError {
    AppError::PathTraversal {
        entry: name.display().to_string(),
    }
}

/// 沿真实文件系统解析 `path` 最近的已存在祖先（含自身），结果必须位于 `root` 之内
fn ensure_resolves_inside(root: &Path, path: &Path, name: &Path) -> AppResult<()> {
    if let Some(existing) = path.ancestors().find(|p| p.exists()) {
        if !fs::canonicalize(existing)?.starts_with(root) {
            return Err(traversal(name));
        }
    }
    Ok(())
}

/// 已写出的符号链接若解析到目录之外则删除并报错，悬空链接留到最后复查
fn check_symlink(root: &Path, link: &Path, name: &Path) -> AppResult<()> {
    if !link.exists() {
        return Ok(());
    }
    if !fs::canonicalize(link)?.starts_with(root) {
        fs::remove_file(link)?;
        return Err(traversal(name));
    }
    Ok(())
}

/// zip 条目经过库自身的 `enclosed_name` 检查后，再做一次与 tar 相同的检查
fn extract_zip(zip_path: &Path, destination: &Path) -> AppResult<()> {
    let root = fs::canonicalize(destination)?;
    let file = File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    for i in 0..archive.len() {
        let mut member = archive.by_index(i)?;
        let name = member.name().to_string();
        if member.enclosed_name().is_none() {
            return Err(AppError::PathTraversal { entry: name });
        }
        let outpath = safe_member_path(destination, Path::new(&name))?;
        ensure_resolves_inside(&root, &outpath, Path::new(&name))?;

        if member.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            io::copy(&mut member, &mut outfile)?;
        }

        #[cfg(unix)]
        if let Some(mode) = member.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&outpath, fs::Permissions::from_mode(mode & 0o7777))?;
        }
    }
    Ok(())
}

fn top_level_entries(dir: &Path) -> AppResult<BTreeSet<OsString>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        names.insert(entry?.file_name());
    }
    Ok(names)
}

fn new_top_level_entry(
    before: &BTreeSet<OsString>,
    after: &BTreeSet<OsString>,
    destination: &Path,
) -> AppResult<PathBuf> {
    let added: Vec<&OsString> = after.difference(before).collect();
    match added.as_slice() {
        [single] => Ok(destination.join(single)),
        [] => Err(AppError::extraction(format!(
            "{} 中没有新增的顶层目录，目标目录可能已包含同名安装",
            destination.display()
        ))),
        many => Err(AppError::extraction(format!(
            "解压产生了多个顶层条目: {}",
            many.iter()
                .map(|n| n.to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    const CONTENT: &[u8] = b"JAVA_VERSION=\"17.0.9\"\n";

    fn append_file(builder: &mut tar::Builder<Vec<u8>>, path: &str, data: &[u8]) {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, path, data).unwrap();
    }

    /// 直接写入头部名称，绕过 tar 库对 `..` 的拒绝
    fn append_raw(builder: &mut tar::Builder<Vec<u8>>, path: &str, data: &[u8]) {
        let mut header = tar::Header::new_gnu();
        {
            let gnu = header.as_gnu_mut().unwrap();
            gnu.name[..path.len()].copy_from_slice(path.as_bytes());
        }
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append(&header, data).unwrap();
    }

    fn append_dir(builder: &mut tar::Builder<Vec<u8>>, path: &str) {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_mode(0o755);
        header.set_size(0);
        builder.append_data(&mut header, path, io::empty()).unwrap();
    }

    fn append_symlink(builder: &mut tar::Builder<Vec<u8>>, path: &str, target: &str) {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_size(0);
        header.set_mode(0o777);
        builder.append_link(&mut header, path, target).unwrap();
    }

    fn jdk_tar() -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        append_dir(&mut builder, "jdk-17/");
        append_file(&mut builder, "jdk-17/release", CONTENT);
        builder.into_inner().unwrap()
    }

    fn write_archive(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn assert_jdk_extracted(result: PathBuf, destination: &Path) {
        assert_eq!(result, destination.join("jdk-17"));
        assert_eq!(fs::read(result.join("release")).unwrap(), CONTENT);
    }

    #[test]
    fn test_classify() {
        assert_eq!(ArchiveFormat::classify("x.tar.gz"), ArchiveFormat::TarGz);
        assert_eq!(ArchiveFormat::classify("x.tar"), ArchiveFormat::Tar);
        assert_eq!(ArchiveFormat::classify("OpenJDK.ZIP"), ArchiveFormat::Zip);
        assert_eq!(ArchiveFormat::classify("x.unknownext"), ArchiveFormat::Lzma);
        assert_eq!(ArchiveFormat::classify("x.tar.xz"), ArchiveFormat::Lzma);
        assert_eq!(
            ArchiveFormat::classify_path(Path::new("/tmp/jdk.tar.gz")),
            ArchiveFormat::TarGz
        );
    }

    #[test]
    fn test_tar_round_trip() {
        let work = TempDir::new().unwrap();
        let archive = write_archive(&work, "jdk.tar", &jdk_tar());
        let destination = work.path().join("dest");

        let result = extract(&archive, ArchiveFormat::Tar, &destination).unwrap();
        assert_jdk_extracted(result, &destination);
    }

    #[test]
    fn test_tar_gz_round_trip() {
        let work = TempDir::new().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&jdk_tar()).unwrap();
        let archive = write_archive(&work, "jdk.tar.gz", &encoder.finish().unwrap());
        let destination = work.path().join("dest");

        let result = extract(&archive, ArchiveFormat::TarGz, &destination).unwrap();
        assert_jdk_extracted(result, &destination);
    }

    #[test]
    fn test_xz_fallback_round_trip() {
        let work = TempDir::new().unwrap();
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(&jdk_tar()).unwrap();
        let archive = write_archive(&work, "jdk.tar.xz", &encoder.finish().unwrap());
        let destination = work.path().join("dest");

        let format = ArchiveFormat::classify_path(&archive);
        let result = extract(&archive, format, &destination).unwrap();
        assert_jdk_extracted(result, &destination);
    }

    #[test]
    fn test_zip_round_trip() {
        let work = TempDir::new().unwrap();
        let mut writer = zip::ZipWriter::new(io::Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default().unix_permissions(0o755);
        writer.add_directory("jdk-17/", options).unwrap();
        writer.start_file("jdk-17/release", options).unwrap();
        writer.write_all(CONTENT).unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        let archive = write_archive(&work, "jdk.zip", &bytes);
        let destination = work.path().join("dest");

        let result = extract(&archive, ArchiveFormat::Zip, &destination).unwrap();
        assert_jdk_extracted(result, &destination);
    }

    #[test]
    fn test_tar_traversal_is_rejected() {
        let work = TempDir::new().unwrap();
        let mut builder = tar::Builder::new(Vec::new());
        append_file(&mut builder, "jdk-17/release", CONTENT);
        append_raw(&mut builder, "../../evil", b"owned");
        append_file(&mut builder, "jdk-17/after", CONTENT);
        let archive = write_archive(&work, "evil.tar", &builder.into_inner().unwrap());
        let destination = work.path().join("a").join("dest");

        let err = extract(&archive, ArchiveFormat::Tar, &destination).unwrap_err();
        assert!(matches!(err, AppError::PathTraversal { ref entry } if entry == "../../evil"));
        assert!(!work.path().join("evil").exists());
        assert!(!work.path().join("a").join("evil").exists());
        // 之前的安全条目保留，之后的条目未写出
        assert!(destination.join("jdk-17").join("release").exists());
        assert!(!destination.join("jdk-17").join("after").exists());
    }

    #[test]
    fn test_tar_symlink_escape_is_rejected() {
        let work = TempDir::new().unwrap();
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_size(0);
        header.set_mode(0o777);
        builder
            .append_link(&mut header, "jdk-17/escape", "../../outside")
            .unwrap();
        let archive = write_archive(&work, "link.tar", &builder.into_inner().unwrap());
        let destination = work.path().join("dest");

        let err = extract(&archive, ArchiveFormat::Tar, &destination).unwrap_err();
        assert!(matches!(err, AppError::PathTraversal { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_chained_symlink_escape_is_rejected() {
        let work = TempDir::new().unwrap();
        let mut builder = tar::Builder::new(Vec::new());
        append_dir(&mut builder, "jdk-17/");
        append_symlink(&mut builder, "jdk-17/x", ".");
        append_symlink(&mut builder, "jdk-17/a", "x/../..");
        let archive = write_archive(&work, "chain.tar", &builder.into_inner().unwrap());
        let destination = work.path().join("dest");

        let err = extract(&archive, ArchiveFormat::Tar, &destination).unwrap_err();
        assert!(matches!(err, AppError::PathTraversal { ref entry } if entry == "jdk-17/a"));
        assert!(fs::symlink_metadata(destination.join("jdk-17").join("a")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_through_late_resolving_symlink_is_rejected() {
        let work = TempDir::new().unwrap();
        let mut builder = tar::Builder::new(Vec::new());
        append_dir(&mut builder, "jdk-17/");
        // 写出时悬空，y 出现后才指向目录之外
        append_symlink(&mut builder, "jdk-17/a", "y/../..");
        append_symlink(&mut builder, "jdk-17/y", ".");
        append_file(&mut builder, "jdk-17/a/evil", b"owned");
        let archive = write_archive(&work, "late.tar", &builder.into_inner().unwrap());
        let destination = work.path().join("dest");

        let err = extract(&archive, ArchiveFormat::Tar, &destination).unwrap_err();
        assert!(matches!(err, AppError::PathTraversal { ref entry } if entry == "jdk-17/a/evil"));
        assert!(!work.path().join("evil").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_rechecked_after_extraction() {
        let work = TempDir::new().unwrap();
        let mut builder = tar::Builder::new(Vec::new());
        append_dir(&mut builder, "jdk-17/");
        append_symlink(&mut builder, "jdk-17/a", "y/../..");
        append_symlink(&mut builder, "jdk-17/y", ".");
        let archive = write_archive(&work, "dangling.tar", &builder.into_inner().unwrap());
        let destination = work.path().join("dest");

        let err = extract(&archive, ArchiveFormat::Tar, &destination).unwrap_err();
        assert!(matches!(err, AppError::PathTraversal { ref entry } if entry == "jdk-17/a"));
        assert!(fs::symlink_metadata(destination.join("jdk-17").join("a")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_internal_symlinks_are_kept() {
        let work = TempDir::new().unwrap();
        let mut builder = tar::Builder::new(Vec::new());
        append_dir(&mut builder, "jdk-17/");
        append_file(&mut builder, "jdk-17/release", CONTENT);
        append_symlink(&mut builder, "jdk-17/bin/release", "../release");
        let archive = write_archive(&work, "links.tar", &builder.into_inner().unwrap());
        let destination = work.path().join("dest");

        let result = extract(&archive, ArchiveFormat::Tar, &destination).unwrap();
        assert_eq!(fs::read(result.join("bin").join("release")).unwrap(), CONTENT);
    }

    #[test]
    fn test_zip_traversal_is_rejected() {
        let work = TempDir::new().unwrap();
        let mut writer = zip::ZipWriter::new(io::Cursor::new(Vec::new()));
        writer
            .start_file("../evil", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(b"owned").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        let archive = write_archive(&work, "evil.zip", &bytes);
        let destination = work.path().join("dest");

        let err = extract(&archive, ArchiveFormat::Zip, &destination).unwrap_err();
        assert!(matches!(err, AppError::PathTraversal { .. }));
        assert!(!work.path().join("evil").exists());
    }

    #[test]
    fn test_unrelated_existing_entries_are_ignored() {
        let work = TempDir::new().unwrap();
        let archive = write_archive(&work, "jdk.tar", &jdk_tar());
        let destination = work.path().join("dest");
        fs::create_dir_all(destination.join("jdk-11")).unwrap();
        fs::write(destination.join("notes.txt"), b"x").unwrap();

        let result = extract(&archive, ArchiveFormat::Tar, &destination).unwrap();
        assert_jdk_extracted(result, &destination);
    }

    #[test]
    fn test_re_extracting_same_archive_is_ambiguous() {
        let work = TempDir::new().unwrap();
        let archive = write_archive(&work, "jdk.tar", &jdk_tar());
        let destination = work.path().join("dest");

        extract(&archive, ArchiveFormat::Tar, &destination).unwrap();
        let err = extract(&archive, ArchiveFormat::Tar, &destination).unwrap_err();
        assert!(matches!(err, AppError::Extraction { .. }));
    }

    #[test]
    fn test_multiple_top_level_entries_is_error() {
        let work = TempDir::new().unwrap();
        let mut builder = tar::Builder::new(Vec::new());
        append_file(&mut builder, "jdk-17/release", CONTENT);
        append_file(&mut builder, "README", CONTENT);
        let archive = write_archive(&work, "two.tar", &builder.into_inner().unwrap());
        let destination = work.path().join("dest");

        let err = extract(&archive, ArchiveFormat::Tar, &destination).unwrap_err();
        assert!(matches!(err, AppError::Extraction { ref message } if message.contains("README")));
    }

    #[test]
    fn test_safe_member_path() {
        let dest = Path::new("/opt/jdk");
        assert_eq!(
            safe_member_path(dest, Path::new("./jdk-17/bin/../lib")).unwrap(),
            PathBuf::from("/opt/jdk/jdk-17/lib")
        );
        assert!(safe_member_path(dest, Path::new("jdk-17/../../x")).is_err());
        assert!(safe_member_path(dest, Path::new("/etc/passwd")).is_err());
    }
}
