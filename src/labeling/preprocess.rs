//! Preprocessors map data points to new data points
//! before a labeling function sees them.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::record::Record;


/// A pure transform from one record to another,
/// possibly with an extended schema.
///
/// Returning `None` signals a preprocessing failure and aborts
/// the application run with a preprocessor error.
pub trait Preprocessor: Send + Sync {
    /// Name of this preprocessor, used in error reports.
    fn name(&self) -> &str;

    /// Transform the given record.
    fn preprocess(&self, x: &Record) -> Option<Record>;
}


/// A preprocessor wrapping a plain closure.
///
/// # Example
/// ```
/// use weaklabel::prelude::*;
///
/// let lower = LambdaPreprocessor::new("lowercase", |x: &Record| {
///     let text = x.text("text").ok()?.to_lowercase();
///     Some(x.with("text", text))
/// });
/// ```
pub struct LambdaPreprocessor<F> {
    name: String,
    f: F,
}


impl<F> LambdaPreprocessor<F>
    where F: Fn(&Record) -> Option<Record> + Send + Sync,
{
    /// Wraps `f` as a preprocessor of the given name.
    pub fn new<S: ToString>(name: S, f: F) -> Self {
        Self { name: name.to_string(), f }
    }
}


impl<F> Preprocessor for LambdaPreprocessor<F>
    where F: Fn(&Record) -> Option<Record> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn preprocess(&self, x: &Record) -> Option<Record> {
        (self.f)(x)
    }
}


/// A shared memoization cache for expensive preprocessors.
///
/// The cache is an explicitly constructed handle:
/// every labeling function holding a clone of the same handle
/// shares its entries.
/// Its lifetime is the handle's lifetime,
/// so dropping all clones after an application run discards the entries,
/// while keeping a clone opts into cross-run reuse.
#[derive(Clone, Default)]
pub struct PreprocessCache {
    entries: Arc<Mutex<HashMap<(String, Record), Record>>>,
}


impl PreprocessCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }


    /// Number of memoized records.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }


    /// Returns `true` if nothing is memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Drops all memoized records.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }


    fn get(&self, key: &(String, Record)) -> Option<Record> {
        self.entries.lock().unwrap().get(key).cloned()
    }


    fn insert(&self, key: (String, Record), value: Record) {
        self.entries.lock().unwrap().insert(key, value);
    }
}


/// Wraps a preprocessor with memoization over a shared
/// [`PreprocessCache`](PreprocessCache).
///
/// The cache key is the inner preprocessor's name together with the
/// full incoming record, compared by equality, so two equal-hashing
/// records can never serve each other's results.
/// The name stands in for the transform's identity:
/// preprocessors sharing one cache handle must carry distinct names
/// unless they compute the same transform.
pub struct MemoizedPreprocessor {
    inner: Arc<dyn Preprocessor>,
    cache: PreprocessCache,
}


impl MemoizedPreprocessor {
    /// Memoizes `inner` over the given cache handle.
    pub fn new<P>(inner: P, cache: PreprocessCache) -> Self
        where P: Preprocessor + 'static,
    {
        Self { inner: Arc::new(inner), cache }
    }
}


impl Preprocessor for MemoizedPreprocessor {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn preprocess(&self, x: &Record) -> Option<Record> {
        let key = (self.inner.name().to_string(), x.clone());
        if let Some(hit) = self.cache.get(&key) {
            return Some(hit);
        }

        let mapped = self.inner.preprocess(x)?;
        self.cache.insert(key, mapped.clone());
        Some(mapped)
    }
}
