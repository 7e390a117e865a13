//! Lazily evaluated attribute slots
//!
//! A `LazyProperty` is a field of its owning type. The owner computes the
//! value on first access through `get_or_init`; later accesses return the
//! cached value, even if the state it was derived from changed, until the
//! slot is explicitly invalidated.
//!
//! ```
//! use yaptools::LazyProperty;
//!
//! struct Foo {
//!     x: i32,
//!     bar: LazyProperty<i32>,
//! }
//!
//! impl Foo {
//!     fn bar(&self) -> i32 {
//!         *self.bar.get_or_init(|| self.x)
//!     }
//! }
//!
//! let mut foo = Foo { x: 0, bar: LazyProperty::new() };
//! assert_eq!(foo.bar(), 0);
//! foo.x = 1;
//! assert_eq!(foo.bar(), 0);
//! foo.bar.invalidate();
//! assert_eq!(foo.bar(), 1);
//! ```

use once_cell::sync::OnceCell;
use std::fmt;

pub struct LazyProperty<T> {
    cell: OnceCell<T>,
}

impl<T> LazyProperty<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the cached value, computing it first if needed
    pub fn get_or_init<F: FnOnce() -> T>(&self, compute: F) -> &T {
        self.cell.get_or_init(compute)
    }

    /// Fallible variant of `get_or_init`; nothing is cached on error
    pub fn get_or_try_init<F, E>(&self, compute: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.cell.get_or_try_init(compute)
    }

    /// Cached value, if evaluated
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_evaluated(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Drop the cached value so the next access recomputes it
    pub fn invalidate(&mut self) -> Option<T> {
        self.cell.take()
    }
}

impl<T> Default for LazyProperty<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Clones carry the cached value along.
impl<T: Clone> Clone for LazyProperty<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("LazyProperty").field(value).finish(),
            None => f.write_str("LazyProperty(<unevaluated>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter {
        base: u32,
        evaluations: Cell<u32>,
        doubled: LazyProperty<u32>,
    }

    impl Counter {
        fn new(base: u32) -> Self {
            Self {
                base,
                evaluations: Cell::new(0),
                doubled: LazyProperty::new(),
            }
        }

        fn doubled(&self) -> u32 {
            *self.doubled.get_or_init(|| {
                self.evaluations.set(self.evaluations.get() + 1);
                self.base * 2
            })
        }
    }

    #[test]
    fn test_computes_once() {
        let counter = Counter::new(2);
        assert!(!counter.doubled.is_evaluated());
        assert_eq!(counter.doubled(), 4);
        assert_eq!(counter.doubled(), 4);
        assert_eq!(counter.evaluations.get(), 1);
        assert!(counter.doubled.is_evaluated());
    }

    #[test]
    fn test_cached_value_survives_state_change() {
        let mut counter = Counter::new(2);
        assert_eq!(counter.doubled(), 4);
        counter.base = 10;
        assert_eq!(counter.doubled(), 4);
    }

    #[test]
    fn test_invalidate_forces_recomputation() {
        let mut counter = Counter::new(2);
        assert_eq!(counter.doubled(), 4);
        counter.base = 10;
        assert_eq!(counter.doubled.invalidate(), Some(4));
        assert_eq!(counter.doubled(), 20);
        assert_eq!(counter.doubled(), 20);
        assert_eq!(counter.evaluations.get(), 2);
    }

    #[test]
    fn test_invalidate_unevaluated_is_noop() {
        let mut slot: LazyProperty<String> = LazyProperty::new();
        assert_eq!(slot.invalidate(), None);
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_failed_init_is_not_cached() {
        let slot: LazyProperty<u8> = LazyProperty::new();
        let err: Result<&u8, &str> = slot.get_or_try_init(|| Err("not yet"));
        assert!(err.is_err());
        assert!(!slot.is_evaluated());
        assert_eq!(slot.get_or_try_init::<_, &str>(|| Ok(7)), Ok(&7));
    }

    #[test]
    fn test_debug_output() {
        let slot: LazyProperty<u8> = LazyProperty::new();
        assert_eq!(format!("{:?}", slot), "LazyProperty(<unevaluated>)");
        slot.get_or_init(|| 3);
        assert_eq!(format!("{:?}", slot), "LazyProperty(3)");
    }
}
