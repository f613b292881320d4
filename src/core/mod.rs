pub mod capability;
pub mod constants;
pub mod version;

pub use capability::*;
pub use version::*;
