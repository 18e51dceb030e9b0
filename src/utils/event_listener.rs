use {
    crate::utils::numcell::NumCell,
    std::{
        cell::RefCell,
        rc::{Rc, Weak},
    },
};

/// A notification channel.
///
/// The source only holds weak references to its listeners. A listener is
/// removed from the source when it is detached or dropped.
pub struct EventSource<T: ?Sized> {
    data: Rc<SourceData<T>>,
}

struct SourceData<T: ?Sized> {
    next: NumCell<u64>,
    listeners: RefCell<Vec<(u64, Weak<T>)>>,
}

pub struct EventListener<T: ?Sized> {
    target: Weak<T>,
    link: RefCell<Option<Link<T>>>,
}

struct Link<T: ?Sized> {
    source: Weak<SourceData<T>>,
    id: u64,
}

impl<T: ?Sized> Default for EventSource<T> {
    fn default() -> Self {
        Self {
            data: Rc::new(SourceData {
                next: NumCell::new(1),
                listeners: Default::default(),
            }),
        }
    }
}

impl<T: ?Sized> EventSource<T> {
    /// Returns the live listeners at the time of the call.
    ///
    /// Listeners may attach or detach while the result is being consumed.
    pub fn iter(&self) -> impl Iterator<Item = Rc<T>> + use<T> {
        let listeners: Vec<_> = self
            .data
            .listeners
            .borrow()
            .iter()
            .filter_map(|(_, l)| l.upgrade())
            .collect();
        listeners.into_iter()
    }

    pub fn has_listeners(&self) -> bool {
        self.data
            .listeners
            .borrow()
            .iter()
            .any(|(_, l)| l.strong_count() > 0)
    }

    pub fn clear(&self) {
        self.data.listeners.borrow_mut().clear();
    }
}

impl<T: ?Sized> EventListener<T> {
    pub fn new(target: Weak<T>) -> Self {
        Self {
            target,
            link: Default::default(),
        }
    }

    pub fn attach(&self, source: &EventSource<T>) {
        self.detach();
        let id = source.data.next.fetch_add(1);
        source
            .data
            .listeners
            .borrow_mut()
            .push((id, self.target.clone()));
        *self.link.borrow_mut() = Some(Link {
            source: Rc::downgrade(&source.data),
            id,
        });
    }

    pub fn detach(&self) {
        let Some(link) = self.link.borrow_mut().take() else {
            return;
        };
        if let Some(source) = link.source.upgrade() {
            source
                .listeners
                .borrow_mut()
                .retain(|(id, _)| *id != link.id);
        }
    }

    pub fn is_attached(&self) -> bool {
        match &*self.link.borrow() {
            Some(link) => link.source.strong_count() > 0,
            None => false,
        }
    }
}

impl<T: ?Sized> Drop for EventListener<T> {
    fn drop(&mut self) {
        self.detach();
    }
}
