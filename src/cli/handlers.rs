use crate::cli::commands::*;
use crate::cli::output::{OutputFormat, FORMATTER};
use crate::environments::java::JavaInstaller;
use crate::error::{with_context, ContextualError};
use crate::infrastructure::config::Config;
use crate::infrastructure::remote::DownloadRequest;

/// 命令处理器
pub struct CommandHandler {
    installer: JavaInstaller,
}

impl CommandHandler {
    /// 读取配置并注册厂商
    pub fn new() -> Result<Self, ContextualError> {
        let config = with_context(Config::load(), "加载配置")?;
        let installer = with_context(JavaInstaller::new(config), "初始化下载客户端")?;
        Ok(Self { installer })
    }

    pub fn with_installer(installer: JavaInstaller) -> Self {
        Self { installer }
    }

    /// 处理命令
    pub async fn handle_command(&self, command: Commands) -> Result<(), ContextualError> {
        match command {
            Commands::Install {
                target,
                implementation,
                path,
            } => {
                println!("🚀 正在准备安装 Java {}...", target.version);
                let request = build_request(&target).implementation(implementation);
                with_context(
                    self.installer
                        .install(target.vendor.as_deref(), &request, path.as_deref())
                        .await,
                    &format!("安装 Java {}", target.version),
                )?;
            }
            Commands::Url { target, json } => {
                let request = build_request(&target);
                let operation = format!("解析 Java {} 下载地址", target.version);
                let url = with_context(
                    self.installer
                        .resolve_url(target.vendor.as_deref(), &request)
                        .await,
                    &operation,
                )?;
                let vendor = target
                    .vendor
                    .as_deref()
                    .unwrap_or(&self.installer.config().default_vendor);
                let output = with_context(
                    FORMATTER.format_url(
                        vendor,
                        &request.version,
                        &url,
                        OutputFormat::from_flag(json),
                    ),
                    &operation,
                )?;
                print!("{}", output);
            }
            Commands::Uninstall { version, jre } => {
                println!("🗑️  正在卸载 Java {}...", version);
                let removed = with_context(
                    self.installer.uninstall(&version, jre),
                    &format!("卸载 Java {}", version),
                )?;
                print!("{}", FORMATTER.format_removed(&version, &removed));
            }
            Commands::Vendors { json } => {
                let output = with_context(
                    FORMATTER.format_vendors(
                        self.installer.registry().aliases(),
                        &self.installer.config().default_vendor,
                        OutputFormat::from_flag(json),
                    ),
                    "列出厂商",
                )?;
                print!("{}", output);
            }
        }
        Ok(())
    }
}

fn build_request(target: &TargetArgs) -> DownloadRequest {
    let mut request = DownloadRequest::new(&target.version).jre(target.jre);
    if let Some(os) = target.os {
        request = request.os(os);
    }
    if let Some(arch) = target.arch {
        request = request.arch(arch);
    }
    request
}
