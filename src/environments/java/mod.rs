pub mod installer;

pub use installer::JavaInstaller;
