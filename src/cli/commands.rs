use crate::core::{Architecture, JvmImpl, OperatingSystem};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// install-jdk CLI 应用程序
#[derive(Parser)]
#[command(name = "install-jdk")]
#[command(about = "从 Adoptium、Corretto、Zulu 下载并安装 JDK", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 目标平台与厂商
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Java 版本，例如 17、1.8
    pub version: String,
    /// 厂商或别名（adoptium、temurin、corretto、zulu ...）
    #[arg(short, long)]
    pub vendor: Option<String>,
    /// 操作系统，默认检测当前平台
    #[arg(long)]
    pub os: Option<OperatingSystem>,
    /// CPU 架构，默认检测当前平台
    #[arg(long)]
    pub arch: Option<Architecture>,
    /// 安装 JRE 而不是 JDK
    #[arg(long)]
    pub jre: bool,
}

/// 顶级命令
#[derive(Subcommand)]
pub enum Commands {
    /// 下载并安装 JDK
    Install {
        #[command(flatten)]
        target: TargetArgs,
        /// JVM 实现
        #[arg(long = "impl", default_value = "hotspot")]
        implementation: JvmImpl,
        /// 安装目录，默认使用配置中的 jdk_dir / jre_dir
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// 只输出下载地址
    Url {
        #[command(flatten)]
        target: TargetArgs,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 卸载已安装的版本
    Uninstall {
        /// Java 版本
        version: String,
        /// 卸载 JRE
        #[arg(long)]
        jre: bool,
    },
    /// 列出可用厂商
    Vendors {
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
}
