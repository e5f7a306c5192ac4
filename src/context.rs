// ctxlog/src/context.rs
//
// Immutable context tree used to carry request-scoped values

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const CANCEL_KEY: &str = "ctxlog.cancel";

struct Node {
    parent: Option<Arc<Node>>,
    key: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// An immutable carrier of scoped values threaded through a call graph.
///
/// Deriving a context never changes the parent: `with_value` returns a new
/// child that shadows any binding of the same key further up the tree.
/// Cloning is cheap (one `Arc`).
#[derive(Clone, Default)]
pub struct Context {
    node: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context
    pub fn background() -> Self {
        Self { node: None }
    }

    /// Derive a child context binding `key` to `value`
    pub fn with_value<T: Any + Send + Sync>(&self, key: &'static str, value: T) -> Self {
        self.with_arc(key, Arc::new(value))
    }

    /// Derive a child context binding `key` to an already shared value.
    ///
    /// The value keeps its identity: `value::<T>(key)` on the child returns
    /// the same `Arc`.
    pub fn with_arc<T: Any + Send + Sync>(&self, key: &'static str, value: Arc<T>) -> Self {
        Self {
            node: Some(Arc::new(Node {
                parent: self.node.clone(),
                key,
                value,
            })),
        }
    }

    /// Look up the nearest binding of `key` holding a `T`
    pub fn value<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let mut current = self.node.as_ref();
        while let Some(node) = current {
            if node.key == key {
                if let Ok(value) = node.value.clone().downcast::<T>() {
                    return Some(value);
                }
            }
            current = node.parent.as_ref();
        }
        None
    }

    /// Derive a cancellable child context.
    ///
    /// The child reports cancelled once the returned handle, or the handle of
    /// any cancellable ancestor, is cancelled.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let state = Arc::new(CancelState {
            cancelled: AtomicBool::new(false),
            parent: self.value::<CancelState>(CANCEL_KEY),
        });
        let handle = CancelHandle {
            state: state.clone(),
        };
        (self.with_arc(CANCEL_KEY, state), handle)
    }

    pub fn is_cancelled(&self) -> bool {
        self.value::<CancelState>(CANCEL_KEY)
            .map_or(false, |state| state.is_cancelled())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = Vec::new();
        let mut current = self.node.as_ref();
        while let Some(node) = current {
            keys.push(node.key);
            current = node.parent.as_ref();
        }
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

struct CancelState {
    cancelled: AtomicBool,
    parent: Option<Arc<CancelState>>,
}

impl CancelState {
    fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            return true;
        }
        self.parent.as_ref().map_or(false, |p| p.is_cancelled())
    }
}

/// Cancels the context returned alongside it by [`Context::with_cancel`].
#[derive(Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
    }
}
