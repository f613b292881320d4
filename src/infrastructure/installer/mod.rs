pub mod extractor;
pub mod unpack200;

pub use extractor::{extract, ArchiveFormat};
pub use unpack200::unpack_jars;
