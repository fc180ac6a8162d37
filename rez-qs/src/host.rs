use std::cell::RefCell;
use std::rc::Rc;

/// Where the shareable query string lives: the browser location, a config
/// object, or anything else that can hold one string.
pub trait QueryHost {
    /// The query string as it currently is, without a leading `?`.
    fn current(&self) -> String;

    /// Replace the query string with one the store computed.
    fn publish(&mut self, query: &str);
}

/// In-memory query string that can be shared between the store and
/// whatever stands in for navigation.
///
/// Cheaply cloneable; clones see the same string.
#[derive(Clone, Default, Debug)]
pub struct SharedQuery(Rc<RefCell<String>>);

impl SharedQuery {
    pub fn new(query: &str) -> Self {
        SharedQuery(Rc::new(RefCell::new(query.trim_start_matches('?').to_string())))
    }

    /// Change the string from outside the store, as back/forward navigation
    /// would.
    pub fn navigate(&self, query: &str) {
        *self.0.borrow_mut() = query.trim_start_matches('?').to_string();
    }

    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }
}

impl QueryHost for SharedQuery {
    fn current(&self) -> String {
        self.get()
    }

    fn publish(&mut self, query: &str) {
        *self.0.borrow_mut() = query.to_string();
    }
}
