//! Shared references and their identity
//!
//! `Rc<RefCell<T>>` is the only shape that can alias or form cycles, so it is
//! the only node kind with an [`Identity`].

use std::cell::RefCell;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::record::RecordType;
use crate::value::{type_name_of, Kind, Node, NodeMut, Value};

/// Opaque identity of a shared allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(usize);

impl Identity {
    /// Identity of the allocation `ptr` points into
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A reference node: identity plus scoped access to the pointee
pub trait Pointer {
    /// Identity of the referenced allocation
    fn identity(&self) -> Identity;

    /// Run `f` on the pointee
    ///
    /// Returns `false` without calling `f` when the pointee is exclusively
    /// borrowed elsewhere.
    fn with_pointee(&self, f: &mut dyn FnMut(&dyn Value)) -> bool;

    /// Run `f` on the pointee mutably
    ///
    /// Returns `false` without calling `f` when the pointee is borrowed
    /// elsewhere.
    fn with_pointee_mut(&mut self, f: &mut dyn FnMut(&mut dyn Value)) -> bool;
}

impl<T: Value> Pointer for Rc<RefCell<T>> {
    #[inline]
    fn identity(&self) -> Identity {
        Identity::of(Rc::as_ptr(self))
    }

    fn with_pointee(&self, f: &mut dyn FnMut(&dyn Value)) -> bool {
        if let Ok(pointee) = self.try_borrow() {
            f(&*pointee);
            true
        } else {
            tracing::warn!(
                identity = %self.identity(),
                pointee = %type_name_of::<T>(),
                "pointee is mutably borrowed, skipping"
            );
            false
        }
    }

    fn with_pointee_mut(&mut self, f: &mut dyn FnMut(&mut dyn Value)) -> bool {
        let identity = self.identity();
        if let Ok(mut pointee) = self.try_borrow_mut() {
            f(&mut *pointee);
            true
        } else {
            tracing::warn!(
                identity = %identity,
                pointee = %type_name_of::<T>(),
                "pointee is already borrowed, skipping"
            );
            false
        }
    }
}

impl<T: Value> Value for Rc<RefCell<T>> {
    #[inline]
    fn node(&self) -> Node<'_> {
        Node::Pointer(self)
    }

    #[inline]
    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Pointer(self)
    }

    fn record_type() -> Result<RecordType, Kind> {
        T::record_type()
    }
}
