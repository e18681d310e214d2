//! Memoizing Decorator
//!
//! Wraps a callable so repeated calls inside a timeout window reuse the
//! cached result.
//!
//! The cache key is the callable's identity, never its arguments. For a
//! method item such as `Report::summary` that identity is its full path,
//! owning type and name included. Only wrap functions whose result does not
//! depend on their arguments (or that take none): two calls with different
//! arguments inside the window return the same value.

use std::any::type_name;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::cache::{CacheBackend, CacheExt};
use crate::error::Result;

// == Cache Decorator ==
/// Produces [`Memoized`] callables bound to one cache and timeout.
///
/// Obtained from [`CacheExt::cached`].
#[derive(Debug)]
pub struct CacheDecorator<'c, C: ?Sized> {
    cache: &'c C,
    timeout: Duration,
}

impl<'c, C: CacheBackend + ?Sized> CacheDecorator<'c, C> {
    pub fn new(cache: &'c C, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    /// Memoizes `func` under its type name.
    ///
    /// Closures defined in the same function share a type name; give those
    /// an explicit identity with [`CacheDecorator::wrap_named`].
    pub fn wrap<F>(&self, func: F) -> Memoized<'c, C, F> {
        self.wrap_named(type_name::<F>(), func)
    }

    /// Memoizes `func` under an explicit identity.
    pub fn wrap_named<F>(&self, identity: impl Into<String>, func: F) -> Memoized<'c, C, F> {
        Memoized {
            cache: self.cache,
            identity: identity.into(),
            timeout: self.timeout,
            func,
        }
    }
}

// == Memoized ==
/// A callable whose result is cached for `timeout` under its identity.
pub struct Memoized<'c, C: ?Sized, F> {
    cache: &'c C,
    identity: String,
    timeout: Duration,
    func: F,
}

impl<'c, C: CacheBackend + ?Sized, F> Memoized<'c, C, F> {
    /// The cache key this callable is memoized under.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Calls a zero-argument function through the cache.
    pub fn call<V>(&self) -> Result<V>
    where
        F: Fn() -> V,
        V: Serialize + DeserializeOwned,
    {
        self.cache
            .get_or_put(&self.identity, || (self.func)(), Some(self.timeout))
    }

    /// Calls the function with `args` through the cache.
    ///
    /// `args` does not take part in the key.
    pub fn call_with<A, V>(&self, args: A) -> Result<V>
    where
        F: Fn(A) -> V,
        V: Serialize + DeserializeOwned,
    {
        self.cache
            .get_or_put(&self.identity, move || (self.func)(args), Some(self.timeout))
    }
}
