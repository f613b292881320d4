pub mod adoptium;
pub mod corretto;
pub mod download;
pub mod http_client;
pub mod provider;
pub mod registry;
pub mod zulu;

pub use download::Downloader;
pub use http_client::HttpClient;
pub use provider::{DownloadRequest, JdkProvider, VendorOptions};
pub use registry::VendorRegistry;

pub use adoptium::{AdoptiumEnvironment, AdoptiumOptions, AdoptiumProvider};
pub use corretto::{CorrettoIndex, CorrettoOptions, CorrettoProvider};
pub use zulu::{ZuluOptions, ZuluProvider};
