use std::cell::RefCell;
use std::rc::Rc;

/// Collects the non-fatal problems found while tracking and tokenizing.
///
/// The collector is a handle: clones share the same list, so the caller, the input source map
/// tracker and the tokenizer of one job all see the same warnings. It is deliberately not `Send`,
/// every job owns its own collector.
#[derive(Clone, Debug, Default)]
pub struct Warnings {
    messages: Rc<RefCell<Vec<String>>>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning and logs it
    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.messages.borrow_mut().push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Returns a copy of all warnings collected so far
    pub fn to_vec(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}
