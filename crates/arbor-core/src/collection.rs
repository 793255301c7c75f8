//! Keyed container with pluggable backing.
//!
//! A [`KeyedCollection`] presents a uniform get/set/delete/iterate surface
//! over one of two backings:
//!
//! - **stored**: an owned, insertion-ordered map. This is the backing for
//!   tree collections, which exclusively own their member nodes.
//! - **delegated**: up to four user-supplied operations, for keyed data
//!   computed on demand by an external source.
//!
//! Every enumeration call re-invokes the underlying backing. Nothing is
//! cached and no iterator state is shared between calls. A delegated
//! operation that was never supplied fails with
//! [`Error::NotImplemented`], naming the operation and the collection's
//! label; that is a configuration bug in the schema, not a condition to
//! recover from.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Enumeration callback for a delegated collection.
pub type IterFn<V> = Rc<dyn Fn() -> Result<Vec<(String, V)>>>;
/// Get-by-key callback for a delegated collection.
pub type GetFn<V> = Rc<dyn Fn(&str) -> Result<V>>;
/// Set-by-key callback for a delegated collection.
pub type SetFn<V> = Rc<dyn Fn(&str, V) -> Result<()>>;
/// Delete-by-key callback for a delegated collection.
pub type DeleteFn = Rc<dyn Fn(&str) -> Result<()>>;

#[derive(Clone)]
enum Backing<V> {
    Stored(IndexMap<String, V>),
    Delegated {
        iter_fn: Option<IterFn<V>>,
        get_fn: Option<GetFn<V>>,
        set_fn: Option<SetFn<V>>,
        delete_fn: Option<DeleteFn>,
    },
}

/// Dictionary-like container addressed by string keys.
#[derive(Clone)]
pub struct KeyedCollection<V> {
    label: String,
    backing: Backing<V>,
}

impl<V: Clone> KeyedCollection<V> {
    /// A collection backed by owned, insertion-ordered storage.
    pub fn stored(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            backing: Backing::Stored(IndexMap::new()),
        }
    }

    /// A collection that delegates to user-supplied operations.
    ///
    /// Operations are attached with [`on_iter`](Self::on_iter),
    /// [`on_get`](Self::on_get), [`on_set`](Self::on_set), and
    /// [`on_delete`](Self::on_delete); any left unattached fails with a
    /// not-implemented error when invoked.
    pub fn delegated(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            backing: Backing::Delegated {
                iter_fn: None,
                get_fn: None,
                set_fn: None,
                delete_fn: None,
            },
        }
    }

    /// Attach the enumeration operation. No effect on a stored collection.
    pub fn on_iter(mut self, f: impl Fn() -> Result<Vec<(String, V)>> + 'static) -> Self {
        if let Backing::Delegated { iter_fn, .. } = &mut self.backing {
            *iter_fn = Some(Rc::new(f));
        }
        self
    }

    /// Attach the get-by-key operation. No effect on a stored collection.
    pub fn on_get(mut self, f: impl Fn(&str) -> Result<V> + 'static) -> Self {
        if let Backing::Delegated { get_fn, .. } = &mut self.backing {
            *get_fn = Some(Rc::new(f));
        }
        self
    }

    /// Attach the set-by-key operation. No effect on a stored collection.
    pub fn on_set(mut self, f: impl Fn(&str, V) -> Result<()> + 'static) -> Self {
        if let Backing::Delegated { set_fn, .. } = &mut self.backing {
            *set_fn = Some(Rc::new(f));
        }
        self
    }

    /// Attach the delete-by-key operation. No effect on a stored collection.
    pub fn on_delete(mut self, f: impl Fn(&str) -> Result<()> + 'static) -> Self {
        if let Backing::Delegated { delete_fn, .. } = &mut self.backing {
            *delete_fn = Some(Rc::new(f));
        }
        self
    }

    /// Label used in error messages.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Enumerate all entries.
    ///
    /// Re-invokes the backing on every call: the result reflects current
    /// state, and repeated calls are independent.
    pub fn iterate(&self) -> Result<Vec<(String, Cow<'_, V>)>> {
        match &self.backing {
            Backing::Stored(map) => Ok(map
                .iter()
                .map(|(k, v)| (k.clone(), Cow::Borrowed(v)))
                .collect()),
            Backing::Delegated { iter_fn, .. } => {
                let f = iter_fn
                    .as_ref()
                    .ok_or_else(|| self.not_implemented("iterate"))?;
                Ok(f()?.into_iter().map(|(k, v)| (k, Cow::Owned(v))).collect())
            }
        }
    }

    /// All keys, in enumeration order.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.iterate()?.into_iter().map(|(k, _)| k).collect())
    }

    /// All values, in enumeration order.
    pub fn values(&self) -> Result<Vec<Cow<'_, V>>> {
        Ok(self.iterate()?.into_iter().map(|(_, v)| v).collect())
    }

    /// Number of entries, counted through [`iterate`](Self::iterate).
    pub fn len(&self) -> Result<usize> {
        Ok(self.iterate()?.len())
    }

    /// True when the collection has no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Look up one entry by key.
    pub fn get(&self, key: &str) -> Result<Cow<'_, V>> {
        match &self.backing {
            Backing::Stored(map) => map.get(key).map(Cow::Borrowed).ok_or_else(|| {
                Error::NoSuchKey {
                    label: self.label.clone(),
                    key: key.to_string(),
                }
            }),
            Backing::Delegated { get_fn, .. } => {
                let f = get_fn.as_ref().ok_or_else(|| self.not_implemented("get"))?;
                f(key).map(Cow::Owned)
            }
        }
    }

    /// Mutable access to a stored entry.
    ///
    /// Delegated collections have no owned entries to hand out; they
    /// report not-implemented.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut V> {
        match &mut self.backing {
            Backing::Stored(map) => {
                if map.contains_key(key) {
                    return Ok(&mut map[key]);
                }
                Err(Error::NoSuchKey {
                    label: self.label.clone(),
                    key: key.to_string(),
                })
            }
            Backing::Delegated { .. } => Err(Error::NotImplemented {
                label: self.label.clone(),
                operation: "get_mut",
            }),
        }
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, key: &str, value: V) -> Result<()> {
        match &mut self.backing {
            Backing::Stored(map) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            Backing::Delegated { set_fn, .. } => match set_fn {
                Some(f) => f(key, value),
                None => Err(self.not_implemented("set")),
            },
        }
    }

    /// Remove an entry by key.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        match &mut self.backing {
            Backing::Stored(map) => match map.shift_remove(key) {
                Some(_) => Ok(()),
                None => Err(Error::NoSuchKey {
                    label: self.label.clone(),
                    key: key.to_string(),
                }),
            },
            Backing::Delegated { delete_fn, .. } => match delete_fn {
                Some(f) => f(key),
                None => Err(self.not_implemented("delete")),
            },
        }
    }

    /// Key-presence test through [`get`](Self::get).
    ///
    /// Converts only the lookup-error case to `false`; any other failure
    /// from the backing propagates.
    pub fn contains(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_lookup() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn not_implemented(&self, operation: &'static str) -> Error {
        Error::NotImplemented {
            label: self.label.clone(),
            operation,
        }
    }
}

impl<V> fmt::Debug for KeyedCollection<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backing {
            Backing::Stored(map) => {
                write!(f, "KeyedCollection({:?}, stored, {} entries)", self.label, map.len())
            }
            Backing::Delegated { .. } => {
                write!(f, "KeyedCollection({:?}, delegated)", self.label)
            }
        }
    }
}
