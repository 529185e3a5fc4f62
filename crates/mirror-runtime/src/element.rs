//! Host element contract.
//!
//! The binding engine never touches a real DOM. Hosts adapt their input
//! widgets to [`InputElement`]: identifying data attributes, the current
//! value or checked state, a change subscription, and a way to overwrite
//! the displayed value.
//!
//! Methods take `&self`: host elements are handles with interior
//! mutability, and the change handler receives the same element it was
//! registered on.

use mirror_core::Value;

/// Data attribute naming the registered record.
pub const DATA_OBJ: &str = "obj";
/// Data attribute naming the bound property.
pub const DATA_PROPERTY: &str = "property";

/// Callback invoked by the host for every change notification.
pub type ChangeHandler = Box<dyn Fn(&dyn InputElement)>;

/// An input-capable element supplied by the host environment.
pub trait InputElement {
    /// Element tag name (`"INPUT"` for bindable elements).
    fn tag_name(&self) -> String;

    /// Input type attribute (`"text"`, `"number"`, `"checkbox"`, ...).
    fn input_type(&self) -> String;

    /// Value of `data-<key>`, if present.
    fn data_attribute(&self, key: &str) -> Option<String>;

    /// Current textual value.
    fn value(&self) -> String;

    /// Current checked state. Only meaningful for checkboxes.
    fn checked(&self) -> bool;

    /// Overwrite the displayed value.
    fn set_value(&self, value: &str);

    /// Subscribe `handler` to change notifications for the element's
    /// lifetime.
    fn add_change_listener(&self, handler: ChangeHandler);

    /// Whether the element can carry a binding at all.
    fn is_input(&self) -> bool {
        self.tag_name().eq_ignore_ascii_case("input")
    }

    /// Whether the element reports a boolean checked state.
    fn is_checkbox(&self) -> bool {
        self.input_type().eq_ignore_ascii_case("checkbox")
    }

    /// Raw value delivered by a change: `checked` for checkboxes, the text
    /// verbatim for everything else.
    fn raw_value(&self) -> Value {
        if self.is_checkbox() {
            Value::Bool(self.checked())
        } else {
            Value::Str(self.value())
        }
    }
}
