//! In-memory container

use std::collections::HashMap;
use std::hash::Hash;

use log::trace;

use crate::container::{Container, Deleter, Getter, Modifier, Putter, Update};
use crate::{Context, Error, Result};

/// Container backed by a [`HashMap`], for prototyping and tests.
///
/// Operations ignore the context and are not synchronized.
///
/// # Example
///
/// ```rust
/// use kvc::{Container, Context, Error, Getter, Putter};
///
/// let ctx = Context::background();
/// let mut container = kvc::new::<u32, u32>();
/// container.put(&ctx, 1, 1).unwrap();
/// assert_eq!(container.get(&ctx, 1), Ok(1));
/// assert_eq!(container.get(&ctx, 2), Err(Error::Get));
/// assert_eq!(container.len(&ctx), Ok(1));
/// ```
#[derive(Debug, Clone)]
pub struct MapContainer<K, V> {
    inner: HashMap<K, V>,
}

impl<K, V> MapContainer<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty container.
    pub fn new() -> Self {
        MapContainer {
            inner: HashMap::new(),
        }
    }

    /// Give back the underlying map.
    pub fn into_inner(self) -> HashMap<K, V> {
        self.inner
    }
}

impl<K, V> Default for MapContainer<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        MapContainer::new()
    }
}

impl<K, V> From<HashMap<K, V>> for MapContainer<K, V> {
    fn from(inner: HashMap<K, V>) -> Self {
        MapContainer { inner }
    }
}

impl<K, V> Putter<K, V> for MapContainer<K, V>
where
    K: Eq + Hash,
{
    fn put(&mut self, _ctx: &Context, key: K, val: V) -> Result<()> {
        self.inner.insert(key, val);
        Ok(())
    }
}

impl<K, V> Getter<K, V> for MapContainer<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn get(&self, _ctx: &Context, key: K) -> Result<V> {
        match self.inner.get(&key) {
            Some(val) => Ok(val.clone()),
            None => {
                trace!("get: key not found");
                Err(Error::Get)
            }
        }
    }
}

impl<K, V> Modifier<K, V> for MapContainer<K, V>
where
    K: Eq + Hash,
    V: Clone + Default,
{
    /// Note, still writes `f(V::default())` when `key` is not found, then
    /// reports `Error::Mod`. The stored value is left as it was if `f` panics.
    fn modify(&mut self, _ctx: &Context, key: K, f: Option<Update<'_, V>>) -> Result<()> {
        let f = match f {
            Some(f) => f,
            None => return Ok(()),
        };

        match self.inner.get_mut(&key) {
            Some(slot) => {
                *slot = f(slot.clone());
                Ok(())
            }
            None => {
                trace!("mod: key not found, inserting");
                let val = f(V::default());
                self.inner.insert(key, val);
                Err(Error::Mod)
            }
        }
    }
}

impl<K, V> Deleter<K, V> for MapContainer<K, V>
where
    K: Eq + Hash,
{
    fn del(&mut self, _ctx: &Context, key: K) -> Result<V> {
        self.inner.remove(&key).ok_or_else(|| {
            trace!("del: key not found");
            Error::Del
        })
    }
}

impl<K, V> Container<K, V> for MapContainer<K, V>
where
    K: Eq + Hash,
    V: Clone + Default,
{
    fn len(&self, _ctx: &Context) -> Result<usize> {
        Ok(self.inner.len())
    }

    /// A map has no fixed capacity, so this reports double the length to
    /// signal there is always room left.
    fn cap(&self, _ctx: &Context) -> Result<usize> {
        Ok(self.inner.len() * 2)
    }
}
