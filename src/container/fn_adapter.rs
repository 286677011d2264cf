//! Function adapters
//!
//! Each adapter implements one capability by forwarding to a function it
//! holds. An adapter without a function fails every call with
//! `Error::Unimplemented` and does nothing else.

use std::fmt;

use log::debug;

use crate::container::{
    Container, Deleter, Getter, Modifier, Putter, SearchDeleter, SearchUpdater, Searcher, Update,
};
use crate::{Context, Error, Result};

type PutFn<K, V> = Box<dyn FnMut(&Context, K, V) -> Result<()>>;
type GetFn<K, V> = Box<dyn Fn(&Context, K) -> Result<V>>;
type ModFn<K, V> = Box<dyn FnMut(&Context, K, Option<&dyn Fn(V) -> V>) -> Result<()>>;
type DelFn<K, V> = Box<dyn FnMut(&Context, K) -> Result<V>>;
type SizeFn = Box<dyn Fn(&Context) -> Result<usize>>;
type SearchFn<Q, R> = Box<dyn Fn(&Context, Q) -> Result<R>>;
type SearchUpdateFn<Q, U, R> = Box<dyn FnMut(&Context, Q, U) -> Result<R>>;
type SearchDeleteFn<Q, R> = Box<dyn FnMut(&Context, Q) -> Result<R>>;

fn unset<T>(op: &str) -> Result<T> {
    debug!("{}: no function set", op);
    Err(Error::Unimplemented)
}

/// Implements [`Putter`] with a function.
///
/// # Example
///
/// ```rust
/// use kvc::{Context, Error, Putter, PutterFn};
///
/// let ctx = Context::background();
/// let mut putter = PutterFn::new(|_: &Context, _key: u32, _val: u32| Ok(()));
/// assert_eq!(putter.put(&ctx, 1, 1), Ok(()));
///
/// let mut unset = PutterFn::<u32, u32>::default();
/// assert_eq!(unset.put(&ctx, 1, 1), Err(Error::Unimplemented));
/// ```
pub struct PutterFn<K, V> {
    func: Option<PutFn<K, V>>,
}

impl<K, V> PutterFn<K, V> {
    /// Create an adapter forwarding to `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&Context, K, V) -> Result<()> + 'static,
    {
        PutterFn {
            func: Some(Box::new(f)),
        }
    }

    /// Whether a function is held.
    pub fn is_set(&self) -> bool {
        self.func.is_some()
    }
}

impl<K, V> Default for PutterFn<K, V> {
    fn default() -> Self {
        PutterFn { func: None }
    }
}

impl<K, V> fmt::Debug for PutterFn<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutterFn").field("set", &self.is_set()).finish()
    }
}

impl<K, V> Putter<K, V> for PutterFn<K, V> {
    fn put(&mut self, ctx: &Context, key: K, val: V) -> Result<()> {
        match self.func.as_mut() {
            Some(f) => f(ctx, key, val),
            None => unset("put"),
        }
    }
}

/// Implements [`Getter`] with a function.
pub struct GetterFn<K, V> {
    func: Option<GetFn<K, V>>,
}

impl<K, V> GetterFn<K, V> {
    /// Create an adapter forwarding to `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context, K) -> Result<V> + 'static,
    {
        GetterFn {
            func: Some(Box::new(f)),
        }
    }

    /// Whether a function is held.
    pub fn is_set(&self) -> bool {
        self.func.is_some()
    }
}

impl<K, V> Default for GetterFn<K, V> {
    fn default() -> Self {
        GetterFn { func: None }
    }
}

impl<K, V> fmt::Debug for GetterFn<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterFn").field("set", &self.is_set()).finish()
    }
}

impl<K, V> Getter<K, V> for GetterFn<K, V> {
    fn get(&self, ctx: &Context, key: K) -> Result<V> {
        match self.func.as_ref() {
            Some(f) => f(ctx, key),
            None => unset("get"),
        }
    }
}

/// Implements [`Modifier`] with a function.
///
/// The update function, present or not, is passed through untouched; it is
/// up to the held function to decide what `None` means.
pub struct ModifierFn<K, V> {
    func: Option<ModFn<K, V>>,
}

impl<K, V> ModifierFn<K, V> {
    /// Create an adapter forwarding to `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&Context, K, Option<&dyn Fn(V) -> V>) -> Result<()> + 'static,
    {
        ModifierFn {
            func: Some(Box::new(f)),
        }
    }

    /// Whether a function is held.
    pub fn is_set(&self) -> bool {
        self.func.is_some()
    }
}

impl<K, V> Default for ModifierFn<K, V> {
    fn default() -> Self {
        ModifierFn { func: None }
    }
}

impl<K, V> fmt::Debug for ModifierFn<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierFn").field("set", &self.is_set()).finish()
    }
}

impl<K, V> Modifier<K, V> for ModifierFn<K, V> {
    fn modify(&mut self, ctx: &Context, key: K, update: Option<Update<'_, V>>) -> Result<()> {
        match self.func.as_mut() {
            Some(f) => f(ctx, key, update),
            None => unset("mod"),
        }
    }
}

/// Implements [`Deleter`] with a function.
pub struct DeleterFn<K, V> {
    func: Option<DelFn<K, V>>,
}

impl<K, V> DeleterFn<K, V> {
    /// Create an adapter forwarding to `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&Context, K) -> Result<V> + 'static,
    {
        DeleterFn {
            func: Some(Box::new(f)),
        }
    }

    /// Whether a function is held.
    pub fn is_set(&self) -> bool {
        self.func.is_some()
    }
}

impl<K, V> Default for DeleterFn<K, V> {
    fn default() -> Self {
        DeleterFn { func: None }
    }
}

impl<K, V> fmt::Debug for DeleterFn<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeleterFn").field("set", &self.is_set()).finish()
    }
}

impl<K, V> Deleter<K, V> for DeleterFn<K, V> {
    fn del(&mut self, ctx: &Context, key: K) -> Result<V> {
        match self.func.as_mut() {
            Some(f) => f(ctx, key),
            None => unset("del"),
        }
    }
}

/// Implements [`Searcher`] with a function.
pub struct SearcherFn<Q, R> {
    func: Option<SearchFn<Q, R>>,
}

impl<Q, R> SearcherFn<Q, R> {
    /// Create an adapter forwarding to `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context, Q) -> Result<R> + 'static,
    {
        SearcherFn {
            func: Some(Box::new(f)),
        }
    }

    /// Whether a function is held.
    pub fn is_set(&self) -> bool {
        self.func.is_some()
    }
}

impl<Q, R> Default for SearcherFn<Q, R> {
    fn default() -> Self {
        SearcherFn { func: None }
    }
}

impl<Q, R> fmt::Debug for SearcherFn<Q, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearcherFn").field("set", &self.is_set()).finish()
    }
}

impl<Q, R> Searcher<Q, R> for SearcherFn<Q, R> {
    fn search(&self, ctx: &Context, filter: Q) -> Result<R> {
        match self.func.as_ref() {
            Some(f) => f(ctx, filter),
            None => unset("search"),
        }
    }
}

/// Implements [`SearchUpdater`] with a function.
pub struct SearchUpdaterFn<Q, U, R> {
    func: Option<SearchUpdateFn<Q, U, R>>,
}

impl<Q, U, R> SearchUpdaterFn<Q, U, R> {
    /// Create an adapter forwarding to `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&Context, Q, U) -> Result<R> + 'static,
    {
        SearchUpdaterFn {
            func: Some(Box::new(f)),
        }
    }

    /// Whether a function is held.
    pub fn is_set(&self) -> bool {
        self.func.is_some()
    }
}

impl<Q, U, R> Default for SearchUpdaterFn<Q, U, R> {
    fn default() -> Self {
        SearchUpdaterFn { func: None }
    }
}

impl<Q, U, R> fmt::Debug for SearchUpdaterFn<Q, U, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchUpdaterFn")
            .field("set", &self.is_set())
            .finish()
    }
}

impl<Q, U, R> SearchUpdater<Q, U, R> for SearchUpdaterFn<Q, U, R> {
    fn search_update(&mut self, ctx: &Context, filter: Q, update: U) -> Result<R> {
        match self.func.as_mut() {
            Some(f) => f(ctx, filter, update),
            None => unset("search update"),
        }
    }
}

/// Implements [`SearchDeleter`] with a function.
pub struct SearchDeleterFn<Q, R> {
    func: Option<SearchDeleteFn<Q, R>>,
}

impl<Q, R> SearchDeleterFn<Q, R> {
    /// Create an adapter forwarding to `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&Context, Q) -> Result<R> + 'static,
    {
        SearchDeleterFn {
            func: Some(Box::new(f)),
        }
    }

    /// Whether a function is held.
    pub fn is_set(&self) -> bool {
        self.func.is_some()
    }
}

impl<Q, R> Default for SearchDeleterFn<Q, R> {
    fn default() -> Self {
        SearchDeleterFn { func: None }
    }
}

impl<Q, R> fmt::Debug for SearchDeleterFn<Q, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchDeleterFn")
            .field("set", &self.is_set())
            .finish()
    }
}

impl<Q, R> SearchDeleter<Q, R> for SearchDeleterFn<Q, R> {
    fn search_delete(&mut self, ctx: &Context, filter: Q) -> Result<R> {
        match self.func.as_mut() {
            Some(f) => f(ctx, filter),
            None => unset("search delete"),
        }
    }
}

/// Implements [`Container`] with one function per operation.
///
/// Every operation resolves on its own: a `ContainerFn` with only `put`
/// set stores values and fails everything else with `Error::Unimplemented`.
///
/// # Example
///
/// ```rust
/// use kvc::{Container, ContainerFn, Context, Error, Getter, Putter};
///
/// let ctx = Context::background();
/// let mut container = ContainerFn::<u32, u32>::new()
///     .with_put(|_: &Context, _, _| Ok(()))
///     .with_len(|_: &Context| Ok(0));
///
/// assert_eq!(container.put(&ctx, 1, 1), Ok(()));
/// assert_eq!(container.len(&ctx), Ok(0));
/// assert_eq!(container.get(&ctx, 1), Err(Error::Unimplemented));
/// assert_eq!(container.cap(&ctx), Err(Error::Unimplemented));
/// ```
pub struct ContainerFn<K, V> {
    putter: PutterFn<K, V>,
    getter: GetterFn<K, V>,
    modifier: ModifierFn<K, V>,
    deleter: DeleterFn<K, V>,
    len: Option<SizeFn>,
    cap: Option<SizeFn>,
}

impl<K, V> ContainerFn<K, V> {
    /// Create a container adapter with no function set.
    pub fn new() -> Self {
        ContainerFn {
            putter: PutterFn::default(),
            getter: GetterFn::default(),
            modifier: ModifierFn::default(),
            deleter: DeleterFn::default(),
            len: None,
            cap: None,
        }
    }

    /// Forward `put` to `f`.
    pub fn with_put<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Context, K, V) -> Result<()> + 'static,
    {
        self.putter = PutterFn::new(f);
        self
    }

    /// Forward `get` to `f`.
    pub fn with_get<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, K) -> Result<V> + 'static,
    {
        self.getter = GetterFn::new(f);
        self
    }

    /// Forward `modify` to `f`.
    pub fn with_modify<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Context, K, Option<&dyn Fn(V) -> V>) -> Result<()> + 'static,
    {
        self.modifier = ModifierFn::new(f);
        self
    }

    /// Forward `del` to `f`.
    pub fn with_del<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Context, K) -> Result<V> + 'static,
    {
        self.deleter = DeleterFn::new(f);
        self
    }

    /// Forward `len` to `f`.
    pub fn with_len<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context) -> Result<usize> + 'static,
    {
        self.len = Some(Box::new(f));
        self
    }

    /// Forward `cap` to `f`.
    pub fn with_cap<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context) -> Result<usize> + 'static,
    {
        self.cap = Some(Box::new(f));
        self
    }
}

impl<K, V> Default for ContainerFn<K, V> {
    fn default() -> Self {
        ContainerFn::new()
    }
}

impl<K, V> fmt::Debug for ContainerFn<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerFn")
            .field("put", &self.putter.is_set())
            .field("get", &self.getter.is_set())
            .field("mod", &self.modifier.is_set())
            .field("del", &self.deleter.is_set())
            .field("len", &self.len.is_some())
            .field("cap", &self.cap.is_some())
            .finish()
    }
}

impl<K, V> Putter<K, V> for ContainerFn<K, V> {
    fn put(&mut self, ctx: &Context, key: K, val: V) -> Result<()> {
        self.putter.put(ctx, key, val)
    }
}

impl<K, V> Getter<K, V> for ContainerFn<K, V> {
    fn get(&self, ctx: &Context, key: K) -> Result<V> {
        self.getter.get(ctx, key)
    }
}

impl<K, V> Modifier<K, V> for ContainerFn<K, V> {
    fn modify(&mut self, ctx: &Context, key: K, update: Option<Update<'_, V>>) -> Result<()> {
        self.modifier.modify(ctx, key, update)
    }
}

impl<K, V> Deleter<K, V> for ContainerFn<K, V> {
    fn del(&mut self, ctx: &Context, key: K) -> Result<V> {
        self.deleter.del(ctx, key)
    }
}

impl<K, V> Container<K, V> for ContainerFn<K, V> {
    fn len(&self, ctx: &Context) -> Result<usize> {
        match self.len.as_ref() {
            Some(f) => f(ctx),
            None => unset("len"),
        }
    }

    fn cap(&self, ctx: &Context) -> Result<usize> {
        match self.cap.as_ref() {
            Some(f) => f(ctx),
            None => unset("cap"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    #[test]
    fn putter_fn_forwards() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut p = PutterFn::new(move |_: &Context, key: i32, val: i32| {
            sink.borrow_mut().push((key, val));
            Ok(())
        });

        assert_eq!(p.put(&Context::background(), 3, 4), Ok(()));
        assert_eq!(*seen.borrow(), vec![(3, 4)]);
    }

    #[test]
    fn putter_fn_unset() {
        let mut p = PutterFn::<i32, i32>::default();
        assert!(!p.is_set());
        assert_eq!(
            p.put(&Context::background(), 1, 1),
            Err(Error::Unimplemented)
        );
    }

    #[test]
    fn getter_fn_returns_result_unchanged() {
        let g = GetterFn::new(|_: &Context, key: i32| {
            if key == 0 {
                Ok(1)
            } else {
                Err(Error::Get)
            }
        });

        assert_eq!(g.get(&Context::background(), 0), Ok(1));
        assert_eq!(g.get(&Context::background(), 5), Err(Error::Get));
    }

    #[test]
    fn getter_fn_unset() {
        let g = GetterFn::<i32, i32>::default();
        assert_eq!(g.get(&Context::background(), 0), Err(Error::Unimplemented));
    }

    #[test]
    fn modifier_fn_passes_update_through() {
        let mut m = ModifierFn::new(|_: &Context, _key: i32, f: Option<&dyn Fn(i32) -> i32>| {
            match f {
                Some(f) if f(1) == 2 => Ok(()),
                Some(_) => Err(Error::Put),
                None => Err(Error::Mod),
            }
        });

        let ctx = Context::background();
        assert_eq!(m.modify(&ctx, 0, Some(&|v| v + 1)), Ok(()));
        assert_eq!(m.modify(&ctx, 0, None), Err(Error::Mod));
    }

    #[test]
    fn modifier_fn_unset_never_calls_update() {
        let called = Cell::new(false);
        let update = |v: i32| {
            called.set(true);
            v
        };

        let mut m = ModifierFn::<i32, i32>::default();
        assert_eq!(
            m.modify(&Context::background(), 0, Some(&update)),
            Err(Error::Unimplemented)
        );
        assert_eq!(
            m.modify(&Context::background(), 0, None),
            Err(Error::Unimplemented)
        );
        assert!(!called.get());
    }

    #[test]
    fn deleter_fn_forwards() {
        let mut d = DeleterFn::new(|_: &Context, _key: i32| Ok(1));
        assert_eq!(d.del(&Context::background(), 0), Ok(1));
        assert_eq!(
            DeleterFn::<i32, i32>::default().del(&Context::background(), 0),
            Err(Error::Unimplemented)
        );
    }

    #[test]
    fn search_adapters() {
        let ctx = Context::background();

        let s = SearcherFn::new(|_: &Context, q: String| Ok(q.len()));
        assert_eq!(s.search(&ctx, "abc".to_owned()), Ok(3));
        assert_eq!(
            SearcherFn::<String, usize>::default().search(&ctx, "abc".to_owned()),
            Err(Error::Unimplemented)
        );

        let mut su = SearchUpdaterFn::new(|_: &Context, q: i32, u: i32| Ok(q * u));
        assert_eq!(su.search_update(&ctx, 2, 3), Ok(6));
        assert_eq!(
            SearchUpdaterFn::<i32, i32, i32>::default().search_update(&ctx, 2, 3),
            Err(Error::Unimplemented)
        );

        let mut sd = SearchDeleterFn::new(|_: &Context, _q: i32| -> Result<usize> {
            Err(Error::SearchDelete)
        });
        assert_eq!(sd.search_delete(&ctx, 2), Err(Error::SearchDelete));
        assert_eq!(
            SearchDeleterFn::<i32, usize>::default().search_delete(&ctx, 2),
            Err(Error::Unimplemented)
        );
    }

    #[test]
    fn held_function_sees_context() {
        let (ctx, handle) = Context::background().with_cancel();
        let g = GetterFn::new(|ctx: &Context, key: i32| {
            ctx.check()?;
            Ok(key)
        });

        assert_eq!(g.get(&ctx, 7), Ok(7));
        handle.cancel();
        assert_eq!(g.get(&ctx, 7), Err(Error::Cancelled));
    }

    #[test]
    fn container_fn_slots_are_independent() {
        let ctx = Context::background();
        let mut c = ContainerFn::<i32, i32>::new().with_put(|_: &Context, _, _| Ok(()));

        assert_eq!(c.put(&ctx, 1, 1), Ok(()));
        assert_eq!(c.get(&ctx, 1), Err(Error::Unimplemented));
        assert_eq!(c.modify(&ctx, 1, None), Err(Error::Unimplemented));
        assert_eq!(c.del(&ctx, 1), Err(Error::Unimplemented));
        assert_eq!(c.len(&ctx), Err(Error::Unimplemented));
        assert_eq!(c.cap(&ctx), Err(Error::Unimplemented));
        assert_eq!(c.put(&ctx, 2, 2), Ok(()));
    }

    #[test]
    fn container_fn_debug_lists_set_slots() {
        let c = ContainerFn::<i32, i32>::new().with_len(|_: &Context| Ok(0));
        assert_eq!(
            format!("{:?}", c),
            "ContainerFn { put: false, get: false, mod: false, del: false, len: true, cap: false }"
        );
    }
}
