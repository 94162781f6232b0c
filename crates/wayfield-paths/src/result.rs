//! The lazily-resolving [`SearchResult`].

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use wayfield_core::{Point, Signal};

use crate::overlay::{CellState, Overlay, SearchCell};

pub(crate) struct ResultInner {
    pub(crate) overlay: Overlay,
    pub(crate) target: Point,
    pub(crate) path: Option<Vec<Point>>,
    pub(crate) changed: Signal,
}

/// A clonable handle to one search's live state.
///
/// Returned immediately when a search starts, before any work has been
/// done. The overlay is live — it changes as the search advances — and the
/// path resolves exactly once: to the start→target cell sequence
/// (inclusive), or to an empty sequence when the target is unreachable.
/// Once resolved it never changes again.
#[derive(Clone)]
pub struct SearchResult {
    inner: Rc<RefCell<ResultInner>>,
}

impl SearchResult {
    pub(crate) fn new(overlay: Overlay, target: Point) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ResultInner {
                overlay,
                target,
                path: None,
                changed: Signal::new(),
            })),
        }
    }

    pub(crate) fn inner(&self) -> Rc<RefCell<ResultInner>> {
        Rc::clone(&self.inner)
    }

    /// The target coordinate this search was computed for. Used by the
    /// scheduler to detect results that have gone stale because the agent's
    /// target moved.
    pub fn target(&self) -> Point {
        self.inner.borrow().target
    }

    /// Whether the path has resolved yet.
    pub fn is_resolved(&self) -> bool {
        self.inner.borrow().path.is_some()
    }

    /// The resolved path, cloned, or `None` while the search is running.
    pub fn path(&self) -> Option<Vec<Point>> {
        self.inner.borrow().path.clone()
    }

    /// Borrow the live overlay for rendering.
    pub fn overlay(&self) -> Ref<'_, Overlay> {
        Ref::map(self.inner.borrow(), |inner| &inner.overlay)
    }

    /// Shorthand for `overlay().state_at(p)`.
    pub fn state_at(&self, p: Point) -> CellState {
        self.inner.borrow().overlay.state_at(p)
    }

    /// Shorthand for `overlay().cell_at(p)`.
    pub fn cell_at(&self, p: Point) -> Option<SearchCell> {
        self.inner.borrow().overlay.cell_at(p)
    }

    /// Register a listener fired on every overlay change of an animated
    /// search and, for every search, once on resolution.
    pub fn on_change(&self, listener: impl Fn() + 'static) {
        self.inner.borrow().changed.subscribe(listener);
    }

    /// Whether two handles refer to the same search.
    pub fn same_search(&self, other: &SearchResult) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SearchResult")
            .field("target", &inner.target)
            .field("resolved", &inner.path.is_some())
            .finish()
    }
}
