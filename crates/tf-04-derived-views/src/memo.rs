//! # Memo
//!
//! Single-slot cache for a pure view. The last input and output are kept;
//! a read with an input that is the [`same`](MemoInput::same) as the last
//! one returns the cached output without recomputing.
//!
//! | Input | "same" means |
//! |-------|--------------|
//! | `EntityState<E>` | both halves share storage (`ptr_eq`) |
//! | `Arc<T>` | pointer equality |
//! | criteria, scalars | `==` |
//! | tuples | every element is the same |

use chrono::NaiveDate;
use parking_lot::Mutex;
use shared_types::{Entity, EntityId, ProjectStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tf_01_entity_store::EntityState;
use tf_03_state::{
    ActiveTimer, FilterValue, Pagination, ProjectListFilters, ProjectSort, TaskFilters, TaskSort,
};

/// Input a memoized view can be keyed on.
pub trait MemoInput: Clone + Send + Sync {
    fn same(&self, other: &Self) -> bool;
}

impl<E: Entity> MemoInput for EntityState<E> {
    fn same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: Send + Sync> MemoInput for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

macro_rules! memo_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MemoInput for $ty {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

memo_by_value!(
    bool,
    u32,
    usize,
    String,
    NaiveDate,
    Vec<EntityId>,
    TaskFilters,
    TaskSort,
    ProjectSort,
    ProjectListFilters,
    Pagination,
    FilterValue<ProjectStatus>,
    Option<ActiveTimer>,
);

macro_rules! memo_tuple {
    ($($name:ident: $idx:tt),+) => {
        impl<$($name: MemoInput),+> MemoInput for ($($name,)+) {
            fn same(&self, other: &Self) -> bool {
                $(self.$idx.same(&other.$idx))&&+
            }
        }
    };
}

memo_tuple!(A: 0, B: 1);
memo_tuple!(A: 0, B: 1, C: 2);
memo_tuple!(A: 0, B: 1, C: 2, D: 3);

/// Memoized pure function of `I`.
pub struct Memo<I: MemoInput, O> {
    name: &'static str,
    compute: fn(&I) -> O,
    last: Mutex<Option<(I, Arc<O>)>>,
    recomputes: AtomicU64,
}

impl<I: MemoInput, O> std::fmt::Debug for Memo<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("name", &self.name)
            .field("recomputes", &self.recomputes())
            .finish()
    }
}

impl<I: MemoInput, O> Memo<I, O> {
    pub fn new(name: &'static str, compute: fn(&I) -> O) -> Self {
        Self {
            name,
            compute,
            last: Mutex::new(None),
            recomputes: AtomicU64::new(0),
        }
    }

    /// Output for `input`, recomputed only if the input changed.
    pub fn get(&self, input: I) -> Arc<O> {
        let mut last = self.last.lock();
        if let Some((cached_input, output)) = last.as_ref() {
            if cached_input.same(&input) {
                return Arc::clone(output);
            }
        }
        let output = Arc::new((self.compute)(&input));
        self.recomputes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(view = self.name, "recomputed");
        *last = Some((input, Arc::clone(&output)));
        output
    }

    /// Number of times the function actually ran.
    pub fn recomputes(&self) -> u64 {
        self.recomputes.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn clear(&self) {
        *self.last.lock() = None;
    }
}
