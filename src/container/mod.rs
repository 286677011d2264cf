//! Capability traits for key-value containers

pub mod fn_adapter;
pub mod map_container;

pub use fn_adapter::{
    ContainerFn, DeleterFn, GetterFn, ModifierFn, PutterFn, SearchDeleterFn, SearchUpdaterFn,
    SearcherFn,
};
pub use map_container::MapContainer;

use crate::{Context, Result};

/// Update function handed to [`Modifier::modify`].
pub type Update<'a, V> = &'a dyn Fn(V) -> V;

/// Something which stores a value.
pub trait Putter<K, V> {
    /// Store `val` at `key`, overwriting any previous value.
    fn put(&mut self, ctx: &Context, key: K, val: V) -> Result<()>;
}

/// Something which retrieves a value.
pub trait Getter<K, V> {
    /// Get the value stored at `key`.
    ///
    /// Returns `Error::Get` if the key is absent.
    fn get(&self, ctx: &Context, key: K) -> Result<V>;
}

/// Something which modifies a value in place.
pub trait Modifier<K, V> {
    /// Apply `f` to the value at `key` and store the result.
    ///
    /// A `None` update function leaves the container untouched.
    fn modify(&mut self, ctx: &Context, key: K, f: Option<Update<'_, V>>) -> Result<()>;
}

/// Something which deletes a value.
pub trait Deleter<K, V> {
    /// Remove `key` and return the value it held.
    ///
    /// Returns `Error::Del` if the key is absent.
    fn del(&mut self, ctx: &Context, key: K) -> Result<V>;
}

/// Something which looks up results matching a query.
pub trait Searcher<Q, R> {
    /// Run the `filter` query.
    fn search(&self, ctx: &Context, filter: Q) -> Result<R>;
}

/// Something which updates every entry matching a query.
pub trait SearchUpdater<Q, U, R> {
    /// Apply `update` to every entry matched by `filter`.
    fn search_update(&mut self, ctx: &Context, filter: Q, update: U) -> Result<R>;
}

/// Something which deletes every entry matching a query.
pub trait SearchDeleter<Q, R> {
    /// Delete every entry matched by `filter`.
    fn search_delete(&mut self, ctx: &Context, filter: Q) -> Result<R>;
}

/// A complete key-value container.
pub trait Container<K, V>: Putter<K, V> + Getter<K, V> + Modifier<K, V> + Deleter<K, V> {
    /// Number of entries currently held.
    fn len(&self, ctx: &Context) -> Result<usize>;

    /// How many entries the container can hold without growing.
    fn cap(&self, ctx: &Context) -> Result<usize>;
}
