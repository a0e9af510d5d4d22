//! Global confirmation dialog
//!
//! A single dialog instance serves every feature. A feature opens it with a
//! message tagged by a [`ConfirmationTarget`]; the user's decision is
//! broadcast to all subscribers, each of which filters on its own target.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationTarget {
    Request,
    Repository,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationState {
    NotStarted,
    Confirmed,
    Cancelled,
}

/// What the dialog shows, plus the payload handed back on decision
#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmationMessage<T> {
    pub title: String,
    pub message: String,
    pub param: String,
    pub data: T,
    pub target: ConfirmationTarget,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmationAcknowledgement<T> {
    pub state: ConfirmationState,
    pub data: T,
    pub source: ConfirmationTarget,
}

type Handler<T> = Rc<dyn Fn(&ConfirmationAcknowledgement<T>)>;

struct Registry<T> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(u64, Handler<T>)>>,
    pending: RefCell<Option<ConfirmationMessage<T>>>,
}

/// Registration with a [`ConfirmationDialogService`].
///
/// The handler is removed exactly once: on [`Subscription::unsubscribe`] or
/// when the subscription is dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

pub struct ConfirmationDialogService<T> {
    registry: Rc<Registry<T>>,
}

impl<T> Clone for ConfirmationDialogService<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<T: 'static> Default for ConfirmationDialogService<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ConfirmationDialogService<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(0),
                handlers: RefCell::new(Vec::new()),
                pending: RefCell::new(None),
            }),
        }
    }

    pub fn subscribe(
        &self,
        handler: impl Fn(&ConfirmationAcknowledgement<T>) + 'static,
    ) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));

        let registry: Weak<Registry<T>> = Rc::downgrade(&self.registry);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.handlers.borrow_mut().retain(|(hid, _)| *hid != id);
                    debug!(subscription = id, "confirmation subscription released");
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.handlers.borrow().len()
    }

    /// Shows `message`, replacing any dialog still open.
    pub fn open_confirm_dialog(&self, message: ConfirmationMessage<T>) {
        debug!(dialog = ?message.target, title = %message.title, "opening confirmation dialog");
        *self.registry.pending.borrow_mut() = Some(message);
    }

    pub fn is_open(&self) -> bool {
        self.registry.pending.borrow().is_some()
    }

    /// Closes the dialog with a confirmed decision. Returns false when no
    /// dialog was open.
    pub fn confirm(&self) -> bool {
        self.close_with(ConfirmationState::Confirmed)
    }

    pub fn cancel(&self) -> bool {
        self.close_with(ConfirmationState::Cancelled)
    }

    fn close_with(&self, state: ConfirmationState) -> bool {
        let Some(message) = self.registry.pending.borrow_mut().take() else {
            return false;
        };

        self.acknowledge(&ConfirmationAcknowledgement {
            state,
            data: message.data,
            source: message.target,
        });
        true
    }

    /// Broadcasts `ack` to every subscriber.
    pub fn acknowledge(&self, ack: &ConfirmationAcknowledgement<T>) {
        // handlers may unsubscribe while being notified
        let handlers: Vec<Handler<T>> = self
            .registry
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(ack);
        }
    }
}

impl<T: Clone + 'static> ConfirmationDialogService<T> {
    /// Message currently shown, if any.
    pub fn pending(&self) -> Option<ConfirmationMessage<T>> {
        self.registry.pending.borrow().clone()
    }
}
