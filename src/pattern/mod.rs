//! Pattern layouts: parsing, compilation and encoding

pub mod compiler;
pub mod converter;
pub mod encoder;
pub mod parser;
pub mod registry;

pub use compiler::PatternCompiler;
pub use converter::{abbreviate, color_by_name, Converter, ConverterChain, CustomConverter};
pub use encoder::{PatternEncoder, PatternEncoderBuilder, DEFAULT_LAYOUT};
pub use parser::{Pattern, PatternNode, MARKER};
pub use registry::{ConverterFactory, ConverterRegistry};
