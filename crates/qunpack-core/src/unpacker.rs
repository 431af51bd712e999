use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::UnpackError;
use crate::format::Format;
use crate::options::Options;
use crate::value::Value;

/// Default number of compiled formats an [`Unpacker`] keeps.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Decoder that compiles each distinct format string once.
///
/// Compiled formats are cached by their text, up to a fixed capacity; once
/// full, new formats are compiled per call and not cached. Only formats that
/// compiled successfully are cached. An `Unpacker` can be shared across
/// threads.
///
/// # Examples
/// ```
/// use qunpack_core::{Options, Unpacker, Value};
///
/// let unpacker = Unpacker::new(Options::default());
/// for record in [[0u8, 1], [0, 2]] {
///     let values = unpacker.unpack("n", &record, 0)?;
///     assert_eq!(values.len(), 1);
/// }
/// assert_eq!(unpacker.cached_formats(), 1);
/// # Ok::<(), qunpack_core::UnpackError>(())
/// ```
#[derive(Debug)]
pub struct Unpacker {
    options: Options,
    capacity: usize,
    cache: RwLock<HashMap<String, Arc<Format>>>,
}

impl Default for Unpacker {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Unpacker {
    pub fn new(options: Options) -> Self {
        Self::with_capacity(options, DEFAULT_CACHE_CAPACITY)
    }

    /// Like [`Unpacker::new`], caching at most `capacity` formats.
    pub fn with_capacity(options: Options, capacity: usize) -> Self {
        Self {
            options,
            capacity,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the compiled form of `text`, compiling it on first use.
    pub fn format(&self, text: &str) -> Result<Arc<Format>, UnpackError> {
        if let Some(format) = self.read_cache().get(text) {
            tracing::trace!(format = text, "format cache hit");
            return Ok(Arc::clone(format));
        }

        tracing::trace!(format = text, "format cache miss");
        let compiled = Arc::new(Format::compile_with(text, &self.options)?);
        let mut cache = self.cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(format) = cache.get(text) {
            return Ok(Arc::clone(format));
        }
        if cache.len() >= self.capacity {
            tracing::trace!(format = text, capacity = self.capacity, "format cache full");
            return Ok(compiled);
        }
        cache.insert(text.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Same as [`crate::unpack`], reusing the cached compiled format.
    pub fn unpack(&self, format: &str, bytes: &[u8], offset: i64) -> Result<Vec<Value>, UnpackError> {
        Ok(self.format(format)?.unpack(bytes, offset))
    }

    /// Number of formats currently cached.
    pub fn cached_formats(&self) -> usize {
        self.read_cache().len()
    }

    /// Drops every cached format.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Format>>> {
        self.cache.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
