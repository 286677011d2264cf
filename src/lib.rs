#![deny(missing_docs)]

//! Key-value container library
//!
//! Capability traits ([`Putter`], [`Getter`], [`Modifier`], [`Deleter`],
//! [`Searcher`], [`SearchUpdater`], [`SearchDeleter`] and the aggregate
//! [`Container`]), function adapters implementing each of them, and an
//! in-memory [`MapContainer`].

use std::hash::Hash;

pub mod container;
mod context;
mod error;

pub use container::{
    Container, ContainerFn, Deleter, DeleterFn, Getter, GetterFn, MapContainer, Modifier,
    ModifierFn, Putter, PutterFn, SearchDeleter, SearchDeleterFn, SearchUpdater, SearchUpdaterFn,
    Searcher, SearcherFn, Update,
};
pub use context::{CancelHandle, Context};
pub use error::{Error, Result};

/// Returns an empty in-memory container, intended for prototyping and
/// testing.
pub fn new<K, V>() -> MapContainer<K, V>
where
    K: Eq + Hash,
{
    MapContainer::new()
}
