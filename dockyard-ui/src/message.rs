//! Global notification messages shown above the page content

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{info, warn};

use crate::error::{ApiError, ErrorSeverity};
use crate::services::MessageHandler;

const MAX_MESSAGES: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct GlobalMessage {
    pub id: u64,
    pub severity: ErrorSeverity,
    pub text: String,
    pub status: Option<u16>,
}

type Watcher = Rc<dyn Fn(&[GlobalMessage])>;

/// Bounded queue of visible messages; oldest entries fall off first
#[derive(Default)]
pub struct MessageQueue {
    messages: RefCell<VecDeque<GlobalMessage>>,
    next_id: Cell<u64>,
    watcher: RefCell<Option<Watcher>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<GlobalMessage> {
        self.messages.borrow().iter().cloned().collect()
    }

    pub fn watch(&self, watcher: impl Fn(&[GlobalMessage]) + 'static) {
        *self.watcher.borrow_mut() = Some(Rc::new(watcher));
    }

    pub fn dismiss(&self, id: u64) {
        self.messages.borrow_mut().retain(|m| m.id != id);
        self.notify();
    }

    fn push(&self, severity: ErrorSeverity, text: String, status: Option<u16>) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        {
            let mut messages = self.messages.borrow_mut();
            messages.push_back(GlobalMessage {
                id,
                severity,
                text,
                status,
            });
            while messages.len() > MAX_MESSAGES {
                messages.pop_front();
            }
        }
        self.notify();
    }

    fn notify(&self) {
        let watcher = self.watcher.borrow().clone();
        if let Some(watcher) = watcher {
            let snapshot = self.messages();
            watcher(&snapshot);
        }
    }
}

impl MessageHandler for MessageQueue {
    fn handle_error(&self, error: &ApiError) {
        warn!(status = error.status, code = %error.error, "{}", error.message);
        self.push(error.severity(), error.user_message(), Some(error.status));
    }

    fn show_success(&self, message: &str) {
        info!("{}", message);
        self.push(ErrorSeverity::Info, message.to_string(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_and_success_are_queued() {
        let queue = MessageQueue::new();
        queue.handle_error(&ApiError::new(403, "FORBIDDEN", "nope"));
        queue.show_success("Deleted successfully");

        let messages = queue.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].severity, ErrorSeverity::Warning);
        assert_eq!(messages[0].status, Some(403));
        assert_eq!(messages[1].text, "Deleted successfully");
    }

    #[test]
    fn test_queue_is_bounded() {
        let queue = MessageQueue::new();
        for i in 0..8 {
            queue.show_success(&format!("message {}", i));
        }

        let messages = queue.messages();
        assert_eq!(messages.len(), MAX_MESSAGES);
        assert_eq!(messages[0].text, "message 3");
    }

    #[test]
    fn test_dismiss_and_watch() {
        let queue = MessageQueue::new();
        let seen = Rc::new(Cell::new(0usize));
        let counter = seen.clone();
        queue.watch(move |messages| counter.set(messages.len()));

        queue.show_success("one");
        queue.show_success("two");
        assert_eq!(seen.get(), 2);

        let first = queue.messages()[0].id;
        queue.dismiss(first);
        assert_eq!(seen.get(), 1);
    }
}
