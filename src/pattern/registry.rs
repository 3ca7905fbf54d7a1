//! Name to factory mapping used when compiling patterns

use super::converter::Converter;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh converter for every reference in a pattern
pub type ConverterFactory = Arc<dyn Fn() -> Converter + Send + Sync>;

/// Registry of converter factories keyed by the name used after `#`
///
/// `ConverterRegistry::default()` is empty; [`with_builtins`](Self::with_builtins)
/// pre-registers `color`, `level`, `date`, `logger`, `message` and `fields`.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    factories: HashMap<String, ConverterFactory>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        Self::new()
            .with("color", Converter::color)
            .with("level", || Converter::Level)
            .with("date", Converter::date)
            .with("logger", Converter::logger)
            .with("message", || Converter::Message)
            .with("fields", || Converter::Fields)
    }

    /// Register a factory, replacing any previous one under the same name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Converter + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Converter + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ConverterFactory> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("names", &self.names())
            .finish()
    }
}
