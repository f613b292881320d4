//! 平台能力模型
//!
//! 操作系统、CPU 架构、镜像类型等封闭枚举。每个取值都有唯一的字符串标识，
//! 既用于比较，也直接拼接进下载地址或查询参数。厂商专属的取值集合在各自的
//! provider 模块中用同一个宏声明，并通过 `From` 实现完成映射。

use crate::error::AppError;
use std::fmt;

/// 声明一个能力枚举：生成 `ALL`、`as_str`、`Display` 与大小写不敏感的 `FromStr`。
macro_rules! capability {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $token:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| $crate::error::AppError::invalid_value(stringify!($name), s))
            }
        }
    };
}

pub(crate) use capability;

capability! {
    /// 操作系统
    OperatingSystem {
        Linux => "linux",
        Windows => "windows",
        Mac => "mac",
        Solaris => "solaris",
        Aix => "aix",
        AlpineLinux => "alpine-linux",
    }
}

capability! {
    /// CPU 架构
    Architecture {
        X64 => "x64",
        X86 => "x86",
        Ppc64 => "ppc64",
        Aarch64 => "aarch64",
        Arm => "arm",
    }
}

capability! {
    /// 镜像类型
    ImageType {
        Jdk => "jdk",
        Jre => "jre",
    }
}

capability! {
    /// JVM 实现
    JvmImpl {
        Hotspot => "hotspot",
    }
}

capability! {
    /// 发布类型
    ReleaseType {
        Ga => "ga",
        Ea => "ea",
    }
}

capability! {
    /// 堆大小
    HeapSize {
        Normal => "normal",
        Large => "large",
    }
}

impl Default for JvmImpl {
    fn default() -> Self {
        JvmImpl::Hotspot
    }
}

impl Default for ImageType {
    fn default() -> Self {
        ImageType::Jdk
    }
}

impl Default for ReleaseType {
    fn default() -> Self {
        ReleaseType::Ga
    }
}

impl Default for HeapSize {
    fn default() -> Self {
        HeapSize::Normal
    }
}

impl OperatingSystem {
    /// 检测当前运行平台，不支持的平台返回 `None`
    pub fn detect() -> Option<Self> {
        Self::from_target(std::env::consts::OS)
    }

    /// 从 Rust 目标平台名称映射
    pub fn from_target(target_os: &str) -> Option<Self> {
        match target_os {
            "linux" => Some(OperatingSystem::Linux),
            "windows" => Some(OperatingSystem::Windows),
            "macos" => Some(OperatingSystem::Mac),
            "solaris" | "illumos" => Some(OperatingSystem::Solaris),
            "aix" => Some(OperatingSystem::Aix),
            _ => None,
        }
    }
}

impl Architecture {
    /// 检测当前 CPU 架构，不支持的架构返回 `None`
    pub fn detect() -> Option<Self> {
        Self::from_target(std::env::consts::ARCH)
    }

    pub fn from_target(target_arch: &str) -> Option<Self> {
        match target_arch {
            "x86_64" => Some(Architecture::X64),
            "x86" => Some(Architecture::X86),
            "aarch64" => Some(Architecture::Aarch64),
            "arm" => Some(Architecture::Arm),
            "powerpc64" => Some(Architecture::Ppc64),
            _ => None,
        }
    }

    pub fn is_64_bit(&self) -> bool {
        matches!(
            self,
            Architecture::X64 | Architecture::Aarch64 | Architecture::Ppc64
        )
    }
}

/// 填充缺省的操作系统，检测失败时报错而不是静默回退
pub fn resolve_os(os: Option<OperatingSystem>) -> Result<OperatingSystem, AppError> {
    os.or_else(OperatingSystem::detect)
        .ok_or_else(|| AppError::not_detected("operating_system"))
}

/// 填充缺省的 CPU 架构
pub fn resolve_arch(arch: Option<Architecture>) -> Result<Architecture, AppError> {
    arch.or_else(Architecture::detect)
        .ok_or_else(|| AppError::not_detected("architecture"))
}

/// JDK 厂商
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vendor {
    Adoptium,
    Corretto,
    Zulu,
    Unknown(String),
}

impl Vendor {
    /// 已知厂商，按注册顺序排列
    pub const KNOWN: [Vendor; 3] = [Vendor::Adoptium, Vendor::Corretto, Vendor::Zulu];

    /// 厂商接受的全部别名，第一个为规范名称
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Vendor::Adoptium => &["Adoptium", "Temurin", "AdoptOpenJDK", "eclipse"],
            Vendor::Corretto => &["Corretto", "Amazon", "AWS"],
            Vendor::Zulu => &["zulu", "azul"],
            Vendor::Unknown(_) => &[],
        }
    }

    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        Self::KNOWN
            .into_iter()
            .find(|v| v.aliases().iter().any(|a| a.eq_ignore_ascii_case(name)))
            .unwrap_or_else(|| Vendor::Unknown(name.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            Vendor::Unknown(name) => name,
            known => known.aliases()[0],
        }
    }
}

impl Default for Vendor {
    fn default() -> Self {
        Vendor::Adoptium
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip_through_from_str() {
        for os in OperatingSystem::ALL {
            assert_eq!(os.as_str().parse::<OperatingSystem>().unwrap(), *os);
        }
        assert_eq!("X64".parse::<Architecture>().unwrap(), Architecture::X64);
        assert_eq!(
            "Alpine-Linux".parse::<OperatingSystem>().unwrap(),
            OperatingSystem::AlpineLinux
        );
    }

    #[test]
    fn test_unknown_token_is_validation_error() {
        let err = "sparc".parse::<Architecture>().unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_detect_from_target() {
        assert_eq!(OperatingSystem::from_target("macos"), Some(OperatingSystem::Mac));
        assert_eq!(OperatingSystem::from_target("freebsd"), None);
        assert_eq!(Architecture::from_target("x86_64"), Some(Architecture::X64));
        assert_eq!(Architecture::from_target("riscv64"), None);
    }

    #[test]
    fn test_explicit_values_skip_detection() {
        assert_eq!(
            resolve_os(Some(OperatingSystem::Aix)).unwrap(),
            OperatingSystem::Aix
        );
        assert_eq!(
            resolve_arch(Some(Architecture::Arm)).unwrap(),
            Architecture::Arm
        );
    }

    #[test]
    fn test_vendor_aliases() {
        assert_eq!(Vendor::parse("temurin"), Vendor::Adoptium);
        assert_eq!(Vendor::parse("AWS"), Vendor::Corretto);
        assert_eq!(Vendor::parse("Azul"), Vendor::Zulu);
        assert_eq!(Vendor::parse("acme"), Vendor::Unknown("acme".to_string()));
        assert_eq!(Vendor::Corretto.to_string(), "Corretto");
    }
}
