pub mod java;

pub use java::JavaInstaller;
