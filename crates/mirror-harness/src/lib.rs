#![forbid(unsafe_code)]

//! In-memory host for Mirror bindings.
//!
//! [`MockInput`] stands in for a form input: it carries data attributes, a
//! text value and a checked state, keeps change listeners, and dispatches
//! change notifications synchronously when asked. Setting the value does
//! not dispatch on its own, matching how a browser only fires `change`
//! once the user commits an edit.
//!
//! ```
//! use mirror_core::{Record, Value};
//! use mirror_harness::MockInput;
//! use mirror_runtime::Mirror;
//!
//! let mirror = Mirror::new(false);
//! let form = Record::new().with("name", "");
//! mirror.register_object("form", form.clone()).unwrap();
//!
//! let input = MockInput::text().bound_to("form", "name");
//! mirror.bind(&input, None).unwrap();
//!
//! input.commit("sauce");
//! assert_eq!(form.get("name"), Some(Value::from("sauce")));
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use mirror_runtime::{ChangeHandler, DATA_OBJ, DATA_PROPERTY, InputElement};

#[derive(Debug, Default)]
struct InputState {
    tag: String,
    input_type: String,
    dataset: BTreeMap<String, String>,
    value: String,
    checked: bool,
    dispatched: usize,
}

/// A scripted input element.
///
/// Clones share state and listeners, like handles to one DOM node.
#[derive(Clone)]
pub struct MockInput {
    state: Rc<RefCell<InputState>>,
    listeners: Rc<RefCell<Vec<Rc<dyn Fn(&dyn InputElement)>>>>,
}

impl MockInput {
    /// Element with an arbitrary tag and input type.
    #[must_use]
    pub fn new(tag: impl Into<String>, input_type: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(InputState {
                tag: tag.into(),
                input_type: input_type.into(),
                ..InputState::default()
            })),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// `<input type="text">`.
    #[must_use]
    pub fn text() -> Self {
        Self::new("INPUT", "text")
    }

    /// `<input type="number">`.
    #[must_use]
    pub fn number() -> Self {
        Self::new("INPUT", "number")
    }

    /// `<input type="checkbox">`.
    #[must_use]
    pub fn checkbox() -> Self {
        Self::new("INPUT", "checkbox")
    }

    /// Set `data-<key>`.
    #[must_use]
    pub fn with_data(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .dataset
            .insert(key.into(), value.into());
        self
    }

    /// Set both `data-obj` and `data-property`.
    #[must_use]
    pub fn bound_to(self, record: &str, property: &str) -> Self {
        self.with_data(DATA_OBJ, record).with_data(DATA_PROPERTY, property)
    }

    /// Type into the field without committing.
    pub fn type_text(&self, text: &str) {
        self.state.borrow_mut().value = text.to_owned();
    }

    /// Toggle the checked state without committing.
    pub fn set_checked(&self, checked: bool) {
        self.state.borrow_mut().checked = checked;
    }

    /// Fire a change notification to every listener, in registration order.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch_change(&self) -> usize {
        let listeners: Vec<_> = self.listeners.borrow().iter().map(Rc::clone).collect();
        self.state.borrow_mut().dispatched += 1;
        for listener in &listeners {
            listener(self);
        }
        listeners.len()
    }

    /// Type `text` and dispatch a change.
    pub fn commit(&self, text: &str) -> usize {
        self.type_text(text);
        self.dispatch_change()
    }

    /// Set the checked state and dispatch a change.
    pub fn commit_checked(&self, checked: bool) -> usize {
        self.set_checked(checked);
        self.dispatch_change()
    }

    /// Displayed text value.
    #[must_use]
    pub fn displayed(&self) -> String {
        self.state.borrow().value.clone()
    }

    /// Number of registered change listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of change notifications dispatched so far.
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.state.borrow().dispatched
    }
}

impl InputElement for MockInput {
    fn tag_name(&self) -> String {
        self.state.borrow().tag.clone()
    }

    fn input_type(&self) -> String {
        self.state.borrow().input_type.clone()
    }

    fn data_attribute(&self, key: &str) -> Option<String> {
        self.state.borrow().dataset.get(key).cloned()
    }

    fn value(&self) -> String {
        self.state.borrow().value.clone()
    }

    fn checked(&self) -> bool {
        self.state.borrow().checked
    }

    fn set_value(&self, value: &str) {
        tracing::trace!(value, "host display updated");
        self.state.borrow_mut().value = value.to_owned();
    }

    fn add_change_listener(&self, handler: ChangeHandler) {
        self.listeners.borrow_mut().push(Rc::from(handler));
    }
}

impl std::fmt::Debug for MockInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockInput")
            .field("state", &*self.state.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
