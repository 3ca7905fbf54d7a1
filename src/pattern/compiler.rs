//! Turns a parsed [`Pattern`] into an executable [`ConverterChain`]

use super::converter::{Converter, ConverterChain};
use super::parser::{Pattern, PatternNode};
use super::registry::ConverterRegistry;
use crate::core::error::{LoggerError, Result};

/// Compiles patterns against a registry of converter factories
#[derive(Debug, Clone, Copy)]
pub struct PatternCompiler<'a> {
    registry: &'a ConverterRegistry,
}

impl<'a> PatternCompiler<'a> {
    pub fn new(registry: &'a ConverterRegistry) -> Self {
        Self { registry }
    }

    /// Build one converter per node, recursing into children
    ///
    /// Fails with [`LoggerError::UnknownConverter`] on the first name the
    /// registry does not know, or with the converter's own error when its
    /// options are rejected.
    pub fn compile(&self, pattern: &Pattern) -> Result<ConverterChain> {
        self.compile_nodes(pattern.nodes())
    }

    fn compile_nodes(&self, nodes: &[PatternNode]) -> Result<ConverterChain> {
        let mut chain = ConverterChain::new();
        for node in nodes {
            chain.push(self.compile_node(node)?);
        }
        Ok(chain)
    }

    fn compile_node(&self, node: &PatternNode) -> Result<Converter> {
        match node {
            PatternNode::Literal(text) => Ok(Converter::Literal(text.clone())),
            PatternNode::Converter {
                name,
                options,
                children,
            } => {
                let factory = self
                    .registry
                    .get(name)
                    .ok_or_else(|| LoggerError::unknown_converter(name.as_str()))?;

                let mut converter = factory();
                if !options.is_empty() {
                    converter.attach_options(options)?;
                }
                if !children.is_empty() {
                    converter.attach_child(self.compile_nodes(children)?);
                }
                Ok(converter)
            }
        }
    }
}
