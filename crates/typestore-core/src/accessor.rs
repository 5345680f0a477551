//! Accessor binding for fields and properties.
//!
//! An `Accessor` is an optional getter/setter pair captured once, when the
//! member is registered. The closures do the strongly-typed downcast of the
//! owning instance themselves, so reading or writing a member is one direct
//! call with no name lookup.
//!
//! Absence is an ordinary state: members that are not accessible (or that
//! were registered metadata-only) carry `Accessor::none()`, and reads/writes
//! through them are no-ops.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased getter: reads a member from an instance of the owning type.
pub type Getter = Arc<dyn Fn(&dyn Any) -> Option<Box<dyn Any + Send>> + Send + Sync>;

/// Type-erased setter: writes a member on an instance of the owning type.
///
/// Returns `false` when the instance or the value has the wrong type.
pub type Setter = Arc<dyn Fn(&mut dyn Any, Box<dyn Any + Send>) -> bool + Send + Sync>;

/// Optional getter/setter pair bound to a member.
#[derive(Clone, Default)]
pub struct Accessor {
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl Accessor {
    /// No accessors: metadata-only member.
    pub const fn none() -> Self {
        Self {
            getter: None,
            setter: None,
        }
    }

    /// Wrap already type-erased closures.
    pub fn from_parts(getter: Option<Getter>, setter: Option<Setter>) -> Self {
        Self { getter, setter }
    }

    /// Bind a typed getter and setter for member type `V` on owner `T`.
    pub fn read_write<T, V, G, S>(get: G, set: S) -> Self
    where
        T: Any,
        V: Any + Send,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            getter: Some(typed_getter(get)),
            setter: Some(typed_setter(set)),
        }
    }

    /// Bind only a typed getter.
    pub fn read_only<T, V, G>(get: G) -> Self
    where
        T: Any,
        V: Any + Send,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            getter: Some(typed_getter(get)),
            setter: None,
        }
    }

    /// Bind only a typed setter.
    pub fn write_only<T, V, S>(set: S) -> Self
    where
        T: Any,
        V: Any + Send,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            getter: None,
            setter: Some(typed_setter(set)),
        }
    }

    #[inline]
    pub fn can_get(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub fn can_set(&self) -> bool {
        self.setter.is_some()
    }

    /// Whether any half is bound.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.getter.is_some() || self.setter.is_some()
    }

    /// Read through the getter. `None` if unbound or the instance has the
    /// wrong type.
    #[inline]
    pub fn get(&self, instance: &dyn Any) -> Option<Box<dyn Any + Send>> {
        self.getter.as_ref().and_then(|getter| getter(instance))
    }

    /// Write through the setter. `false` if unbound or either side has the
    /// wrong type; the instance is left untouched in that case.
    #[inline]
    pub fn set(&self, instance: &mut dyn Any, value: Box<dyn Any + Send>) -> bool {
        match &self.setter {
            Some(setter) => setter(instance, value),
            None => false,
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("getter", &self.can_get())
            .field("setter", &self.can_set())
            .finish()
    }
}

fn typed_getter<T, V, G>(get: G) -> Getter
where
    T: Any,
    V: Any + Send,
    G: Fn(&T) -> V + Send + Sync + 'static,
{
    Arc::new(move |instance: &dyn Any| {
        instance
            .downcast_ref::<T>()
            .map(|owner| Box::new(get(owner)) as Box<dyn Any + Send>)
    })
}

fn typed_setter<T, V, S>(set: S) -> Setter
where
    T: Any,
    V: Any + Send,
    S: Fn(&mut T, V) + Send + Sync + 'static,
{
    Arc::new(move |instance: &mut dyn Any, value: Box<dyn Any + Send>| {
        let Some(owner) = instance.downcast_mut::<T>() else {
            return false;
        };
        match value.downcast::<V>() {
            Ok(value) => {
                set(owner, *value);
                true
            }
            Err(_) => false,
        }
    })
}

#[cfg(test)]
#[path = "../tests/accessor_tests.rs"]
mod tests;
