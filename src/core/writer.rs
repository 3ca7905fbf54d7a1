//! Capabilities of a downstream sink and the transforms composed with it

use super::error::Result;
use std::sync::Arc;

/// Transforms a raw payload into the bytes handed to a sink
pub trait Encoder: Send + Sync {
    fn encode(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

/// Decides whether a payload is discarded before encoding
pub trait Filter: Send + Sync {
    /// Returns `true` when the payload should be dropped
    fn should_drop(&self, payload: &[u8]) -> bool;
}

/// Destination for log payloads
///
/// A writer may carry its own [`Encoder`] and [`Filter`]; wrappers such as
/// [`AsyncWriter`](super::AsyncWriter) query them once when they take
/// ownership of the writer.
pub trait Writer: Send {
    fn write(&mut self, payload: &[u8]) -> Result<usize>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn encoder(&self) -> Option<Arc<dyn Encoder>> {
        None
    }

    fn filter(&self) -> Option<Arc<dyn Filter>> {
        None
    }

    fn name(&self) -> &str;
}

impl<F> Filter for F
where
    F: Fn(&[u8]) -> bool + Send + Sync,
{
    fn should_drop(&self, payload: &[u8]) -> bool {
        self(payload)
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    fn write(&mut self, payload: &[u8]) -> Result<usize> {
        (**self).write(payload)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn encoder(&self) -> Option<Arc<dyn Encoder>> {
        (**self).encoder()
    }

    fn filter(&self) -> Option<Arc<dyn Filter>> {
        (**self).filter()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
