//! Writer implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod level_filter;

#[cfg(feature = "console")]
pub use console::{ConsoleTarget, ConsoleWriter};
#[cfg(feature = "file")]
pub use file::FileWriter;
pub use level_filter::LevelFilter;

// Re-export traits so writer implementors need a single import
pub use crate::core::{Encoder, Filter, Writer};
