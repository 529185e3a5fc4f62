//! The binding engine.
//!
//! [`Mirror`] owns a registry of named [`Record`]s and a
//! [`ComparatorTable`]. Bindings connect one input element to one property
//! of one registered record; every change notification runs the commit
//! protocol:
//!
//! 1. No constraint, or a constraint that fails validation against the
//!    live record: commit the raw value coerced to the property's kind.
//! 2. Valid constraint whose predicate holds for
//!    `(raw, record[constraint.property])`: commit the coerced raw value.
//! 3. Predicate fails, fallback present: commit the coerced fallback and
//!    write the fallback back into the element.
//! 4. Predicate fails, no fallback: leave the record untouched and warn.
//!
//! # Invariants
//!
//! 1. A property's [`ValueKind`] is fixed at bind time; every commit is
//!    coerced into it.
//! 2. Constraints only reference the bound record. Property names are not
//!    resolved across records.
//! 3. Bindings resolve their record by name on every change, so
//!    re-registering a name retargets existing bindings.
//! 4. No registry borrow is held while a comparator or fallback producer
//!    runs; both may call back into the engine.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Empty name, non-input element, missing data attribute | `InvalidArgument` at the call site |
//! | Unregistered record / absent property at bind time | `InvalidArgument` at bind time |
//! | `read_property` on unknown record or property | `NotFound` |
//! | Duplicate comparator name | `DuplicateName` |
//! | Unknown predicate or reference property at change time | warning, unconstrained commit |
//! | Predicate fails without fallback | warning, no change |
//! | Record unregistered after bind | warning, change dropped |
//! | Removing an unknown record | warning, `false` |

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;
use mirror_core::{
    Comparator, ComparatorTable, Constraint, MirrorError, Record, Result, Value, ValueKind, coerce,
};
use tracing::{debug, info, warn};

use crate::config::MirrorConfig;
use crate::element::{DATA_OBJ, DATA_PROPERTY, InputElement};

/// Tracing target for every diagnostic the engine emits.
pub const TRACE_TARGET: &str = "mirror";

struct EngineState {
    config: MirrorConfig,
    records: RefCell<AHashMap<String, Record>>,
    comparators: RefCell<ComparatorTable>,
}

/// Two-way binding engine between input elements and named records.
///
/// `Mirror` is a cheap handle: clones share registries. It is
/// single-threaded by construction.
///
/// # Example
///
/// ```
/// use mirror_core::{Constraint, Record, Value};
/// use mirror_runtime::{CommitOutcome, Mirror};
///
/// let mirror = Mirror::new(false);
/// let settings = Record::new().with("volume", 5).with("max", 10);
/// mirror.register_object("settings", settings.clone()).unwrap();
///
/// let binding = mirror
///     .resolve_binding(
///         "settings",
///         "volume",
///         Some(Constraint::new("lessOrEqual", "max").with_fallback(10)),
///     )
///     .unwrap();
///
/// assert_eq!(
///     mirror.handle_change(&binding, Value::from("7")),
///     CommitOutcome::Committed(Value::from(7))
/// );
/// assert!(matches!(
///     mirror.handle_change(&binding, Value::from("99")),
///     CommitOutcome::FellBack { .. }
/// ));
/// assert_eq!(settings.get("volume"), Some(Value::from(10)));
/// ```
#[derive(Clone)]
pub struct Mirror {
    state: Rc<EngineState>,
}

/// Resolved target of a binding: record name, property name, fixed kind
/// and optional constraint.
#[derive(Debug, Clone)]
pub struct BindingHandle {
    record: String,
    property: String,
    kind: ValueKind,
    constraint: Option<Constraint>,
}

impl BindingHandle {
    /// Name of the bound record.
    #[must_use]
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Name of the bound property.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Kind inferred at bind time.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Constraint gating commits, if any.
    #[must_use]
    pub const fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }
}

/// What a change notification did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The coerced raw value was written.
    Committed(Value),
    /// The constraint failed and the fallback was written.
    FellBack {
        /// Resolved fallback, as written back to the element.
        fallback: Value,
        /// Fallback coerced to the property's kind, as written to the record.
        committed: Value,
    },
    /// The constraint failed without fallback; nothing was written.
    Rejected,
    /// The bound record is no longer registered; nothing was written.
    Detached,
}

impl CommitOutcome {
    /// Value written to the record, if any.
    #[must_use]
    pub const fn committed_value(&self) -> Option<&Value> {
        match self {
            Self::Committed(v) | Self::FellBack { committed: v, .. } => Some(v),
            Self::Rejected | Self::Detached => None,
        }
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::with_config(MirrorConfig::default())
    }
}

impl Mirror {
    /// Engine with default settings; `debug` enables commit traces.
    #[must_use]
    pub fn new(debug: bool) -> Self {
        Self::with_config(MirrorConfig::default().debug(debug))
    }

    /// Engine with explicit settings.
    #[must_use]
    pub fn with_config(config: MirrorConfig) -> Self {
        Self {
            state: Rc::new(EngineState {
                config,
                records: RefCell::new(AHashMap::new()),
                comparators: RefCell::new(ComparatorTable::with_builtins()),
            }),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> MirrorConfig {
        self.state.config
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register a comparator under a unique name.
    ///
    /// # Errors
    ///
    /// [`MirrorError::DuplicateName`] if `name` is taken,
    /// [`MirrorError::InvalidArgument`] if it is empty.
    pub fn add_comparator(
        &self,
        name: impl Into<String>,
        predicate: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Result<()> {
        let name = name.into();
        self.state
            .comparators
            .borrow_mut()
            .insert(name.clone(), predicate)?;
        debug!(target: TRACE_TARGET, comparator = %name, "registered comparator");
        Ok(())
    }

    /// Whether a comparator is registered under `name`.
    #[must_use]
    pub fn has_comparator(&self, name: &str) -> bool {
        self.state.comparators.borrow().contains(name)
    }

    /// Registered comparator names, sorted.
    #[must_use]
    pub fn comparator_names(&self) -> Vec<String> {
        self.state
            .comparators
            .borrow()
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    fn comparator(&self, name: &str) -> Option<Comparator> {
        self.state.comparators.borrow().get(name)
    }

    /// Cache a record under `name`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// [`MirrorError::InvalidArgument`] if `name` is empty.
    pub fn register_object(&self, name: impl Into<String>, record: Record) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(MirrorError::invalid(
                "record name must be a non-empty string",
            ));
        }
        self.state.records.borrow_mut().insert(name, record);
        Ok(())
    }

    /// Drop the record cached under `name`.
    ///
    /// Returns `false` and warns if nothing was registered under `name`.
    pub fn unregister_object(&self, name: &str) -> bool {
        let removed = self.state.records.borrow_mut().remove(name).is_some();
        if !removed {
            warn!(target: TRACE_TARGET, record = %name, "tried to remove a record that is not registered");
        }
        removed
    }

    /// Record cached under `name`.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<Record> {
        self.state.records.borrow().get(name).cloned()
    }

    /// Current value of `property` on the record cached under `obj_name`.
    ///
    /// # Errors
    ///
    /// [`MirrorError::InvalidArgument`] for empty names,
    /// [`MirrorError::NotFound`] if the record or property is absent.
    pub fn read_property(&self, obj_name: &str, property: &str) -> Result<Value> {
        if obj_name.is_empty() {
            return Err(MirrorError::invalid("record name must be a non-empty string"));
        }
        if property.is_empty() {
            return Err(MirrorError::invalid(
                "property name must be a non-empty string",
            ));
        }
        let record = self
            .object(obj_name)
            .ok_or_else(|| MirrorError::record_not_found(obj_name))?;
        record
            .get(property)
            .ok_or_else(|| MirrorError::property_not_found(property))
    }

    // -----------------------------------------------------------------------
    // Constraints
    // -----------------------------------------------------------------------

    /// Whether `constraint` can be evaluated against `subject`.
    ///
    /// False for `None`, for an unknown predicate, and for a reference
    /// property that `subject` does not hold. The last two warn.
    #[must_use]
    pub fn is_valid_constraint(&self, subject: &Record, constraint: Option<&Constraint>) -> bool {
        constraint.is_some_and(|c| self.prepare(subject, c).is_some())
    }

    /// Validate and fetch the comparator and reference value in one pass.
    fn prepare(&self, subject: &Record, constraint: &Constraint) -> Option<(Comparator, Value)> {
        let Some(comparator) = self.comparator(&constraint.predicate) else {
            warn!(
                target: TRACE_TARGET,
                predicate = %constraint.predicate,
                "invalid predicate requested in constraint"
            );
            return None;
        };
        let Some(reference) = subject.get(&constraint.property) else {
            warn!(
                target: TRACE_TARGET,
                property = %constraint.property,
                "constraint references a property the record does not contain"
            );
            return None;
        };
        Some((comparator, reference))
    }

    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    /// Resolve a binding target without an element.
    ///
    /// The property's kind is inferred from its current value and fixed
    /// for the lifetime of the returned handle.
    ///
    /// # Errors
    ///
    /// [`MirrorError::InvalidArgument`] if a name is empty, the record is
    /// not registered, or the record lacks the property.
    pub fn resolve_binding(
        &self,
        record: impl Into<String>,
        property: impl Into<String>,
        constraint: Option<Constraint>,
    ) -> Result<BindingHandle> {
        let record = record.into();
        let property = property.into();
        if record.is_empty() || property.is_empty() {
            return Err(MirrorError::invalid(
                "record and property names must be non-empty",
            ));
        }
        let target = self
            .object(&record)
            .ok_or_else(|| MirrorError::invalid(format!("record '{record}' is not registered")))?;
        let current = target.get(&property).ok_or_else(|| {
            MirrorError::invalid(format!(
                "registered record '{record}' does not contain property '{property}'"
            ))
        })?;
        Ok(BindingHandle {
            record,
            property,
            kind: current.kind(),
            constraint,
        })
    }

    /// Bind `element` to the record and property named by its `data-obj`
    /// and `data-property` attributes.
    ///
    /// All preconditions are checked here, before any change is
    /// dispatched. The subscription lives as long as the element keeps its
    /// listeners.
    ///
    /// # Errors
    ///
    /// [`MirrorError::InvalidArgument`] if the element is not an input, an
    /// attribute is missing or empty, or the target does not resolve.
    pub fn bind<E: InputElement + ?Sized>(
        &self,
        element: &E,
        constraint: Option<Constraint>,
    ) -> Result<BindingHandle> {
        if !element.is_input() {
            return Err(MirrorError::invalid(format!(
                "element <{}> is not an input element",
                element.tag_name()
            )));
        }
        let record = required_attribute(element, DATA_OBJ)?;
        let property = required_attribute(element, DATA_PROPERTY)?;
        let binding = self.resolve_binding(record, property, constraint)?;

        let engine = self.clone();
        let target = binding.clone();
        element.add_change_listener(Box::new(move |el: &dyn InputElement| {
            if let CommitOutcome::FellBack { fallback, .. } =
                engine.handle_change(&target, el.raw_value())
            {
                el.set_value(&fallback.to_string());
            }
        }));

        debug!(
            target: TRACE_TARGET,
            record = %binding.record,
            property = %binding.property,
            kind = %binding.kind,
            constrained = binding.constraint.is_some(),
            "bound input element"
        );
        Ok(binding)
    }

    /// Run the commit protocol for one change notification.
    ///
    /// This is the entry point the element subscription calls; hosts
    /// without an [`InputElement`] adapter may call it directly and apply
    /// [`CommitOutcome::FellBack`] to their own display.
    pub fn handle_change(&self, binding: &BindingHandle, raw: Value) -> CommitOutcome {
        let Some(record) = self.object(&binding.record) else {
            warn!(
                target: TRACE_TARGET,
                record = %binding.record,
                property = %binding.property,
                "bound record is no longer registered; change dropped"
            );
            return CommitOutcome::Detached;
        };

        let Some(constraint) = binding.constraint.as_ref() else {
            return self.commit(binding, &record, &raw);
        };
        let Some((predicate, reference)) = self.prepare(&record, constraint) else {
            return self.commit(binding, &record, &raw);
        };

        if predicate(&raw, &reference) {
            return self.commit(binding, &record, &raw);
        }

        let Some(fallback) = constraint.fallback.as_ref() else {
            if self.state.config.warn_on_missing_fallback {
                warn!(
                    target: TRACE_TARGET,
                    record = %binding.record,
                    property = %binding.property,
                    "constraint failed and no fallback value is present"
                );
            }
            return CommitOutcome::Rejected;
        };

        let fallback = fallback.resolve();
        let committed = coerce(binding.kind, &fallback);
        if self.state.config.debug {
            info!(
                target: TRACE_TARGET,
                record = %binding.record,
                property = %binding.property,
                value = %committed,
                "constraint failed; applying fallback"
            );
        }
        record.set(binding.property.clone(), committed.clone());
        CommitOutcome::FellBack {
            fallback,
            committed,
        }
    }

    fn commit(&self, binding: &BindingHandle, record: &Record, raw: &Value) -> CommitOutcome {
        let value = coerce(binding.kind, raw);
        if self.state.config.debug {
            info!(
                target: TRACE_TARGET,
                record = %binding.record,
                property = %binding.property,
                value = %value,
                "setting property"
            );
        }
        record.set(binding.property.clone(), value.clone());
        CommitOutcome::Committed(value)
    }
}

fn required_attribute<E: InputElement + ?Sized>(element: &E, key: &str) -> Result<String> {
    element
        .data_attribute(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            MirrorError::invalid(format!(
                "input element does not contain required attribute data-{key}"
            ))
        })
}

impl fmt::Debug for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut records: Vec<String> = self.state.records.borrow().keys().cloned().collect();
        records.sort_unstable();
        f.debug_struct("Mirror")
            .field("config", &self.state.config)
            .field("records", &records)
            .field("comparators", &self.comparator_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use tracing_test::traced_test;

    fn engine_with(record: &Record) -> Mirror {
        let mirror = Mirror::new(false);
        mirror.register_object("obj", record.clone()).unwrap();
        mirror
    }

    fn cool() -> Record {
        Record::new().with("coolFactor", 333).with("score", 0)
    }

    // ---- registration ----

    #[test]
    fn duplicate_comparator_rejected() {
        let mirror = Mirror::new(false);
        assert_eq!(
            mirror.add_comparator("less", |_, _| true),
            Err(MirrorError::DuplicateName("less".into()))
        );
    }

    #[test]
    fn new_comparator_usable() {
        let mirror = Mirror::new(false);
        mirror
            .add_comparator("even", |a, _| a.to_number() % 2.0 == 0.0)
            .unwrap();
        assert!(mirror.has_comparator("even"));

        let record = cool();
        mirror.register_object("obj", record.clone()).unwrap();
        let binding = mirror
            .resolve_binding("obj", "score", Some(Constraint::new("even", "coolFactor")))
            .unwrap();
        assert_eq!(
            mirror.handle_change(&binding, Value::from("4")),
            CommitOutcome::Committed(Value::from(4))
        );
        assert_eq!(mirror.handle_change(&binding, Value::from("5")), CommitOutcome::Rejected);
        assert_eq!(record.get("score"), Some(Value::from(4)));
    }

    #[test]
    fn comparator_tables_are_per_engine() {
        let a = Mirror::new(false);
        let b = Mirror::new(false);
        a.add_comparator("custom", |_, _| true).unwrap();
        assert!(!b.has_comparator("custom"));
        b.add_comparator("custom", |_, _| false).unwrap();
    }

    #[test]
    fn register_empty_name_fails() {
        let mirror = Mirror::new(false);
        assert!(matches!(
            mirror.register_object("", Record::new()),
            Err(MirrorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn register_overwrites() {
        let mirror = Mirror::new(false);
        mirror.register_object("obj", Record::new().with("x", 1)).unwrap();
        mirror.register_object("obj", Record::new().with("x", 2)).unwrap();
        assert_eq!(mirror.read_property("obj", "x"), Ok(Value::from(2)));
    }

    #[test]
    fn unregister_reports_presence() {
        let mirror = engine_with(&cool());
        assert!(mirror.unregister_object("obj"));
        assert!(!mirror.unregister_object("obj"));
        assert!(mirror.object("obj").is_none());
    }

    #[test]
    fn read_property_errors() {
        let mirror = engine_with(&cool());
        assert_eq!(mirror.read_property("obj", "coolFactor"), Ok(Value::from(333)));
        assert!(matches!(
            mirror.read_property("", "coolFactor"),
            Err(MirrorError::InvalidArgument(_))
        ));
        assert!(matches!(
            mirror.read_property("obj", ""),
            Err(MirrorError::InvalidArgument(_))
        ));
        assert_eq!(
            mirror.read_property("nope", "coolFactor"),
            Err(MirrorError::record_not_found("nope"))
        );
        assert_eq!(
            mirror.read_property("obj", "nope"),
            Err(MirrorError::property_not_found("nope"))
        );
    }

    // ---- validation ----

    #[test]
    fn validation_cases() {
        let record = cool();
        let mirror = engine_with(&record);
        assert!(!mirror.is_valid_constraint(&record, None));
        assert!(!mirror.is_valid_constraint(&record, Some(&Constraint::new("lower", "coolFactor"))));
        assert!(!mirror.is_valid_constraint(&record, Some(&Constraint::new("less", "missing"))));
        assert!(mirror.is_valid_constraint(&record, Some(&Constraint::new("less", "coolFactor"))));
    }

    #[test]
    fn cross_record_path_is_not_resolved() {
        let record = cool();
        let mirror = engine_with(&record);
        mirror
            .register_object("other", Record::new().with("limit", 5))
            .unwrap();
        assert!(!mirror.is_valid_constraint(&record, Some(&Constraint::new("less", "other.limit"))));
    }

    // ---- commit protocol ----

    #[test]
    fn fallback_applied_when_predicate_fails() {
        let record = cool();
        let mirror = engine_with(&record);
        let binding = mirror
            .resolve_binding(
                "obj",
                "score",
                Some(Constraint::new("less", "coolFactor").with_fallback(42)),
            )
            .unwrap();
        assert_eq!(
            mirror.handle_change(&binding, Value::from("1000")),
            CommitOutcome::FellBack {
                fallback: Value::from(42),
                committed: Value::from(42),
            }
        );
        assert_eq!(record.get("score"), Some(Value::from(42)));
        assert_eq!(
            mirror.handle_change(&binding, Value::from("1")),
            CommitOutcome::Committed(Value::from(1))
        );
    }

    #[test]
    fn fallback_coerced_to_property_kind() {
        let record = Record::new().with("label", "x").with("limit", 3);
        let mirror = engine_with(&record);
        let binding = mirror
            .resolve_binding(
                "obj",
                "label",
                Some(Constraint::new("less", "limit").with_fallback(0)),
            )
            .unwrap();
        let outcome = mirror.handle_change(&binding, Value::from("9"));
        assert_eq!(outcome.committed_value(), Some(&Value::from("0")));
        assert_eq!(record.get("label"), Some(Value::from("0")));
    }

    #[test]
    fn producer_fallback_runs_once_per_failure() {
        let record = cool();
        let mirror = engine_with(&record);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let binding = mirror
            .resolve_binding(
                "obj",
                "score",
                Some(Constraint::new("less", "coolFactor").with_fallback_fn(move || {
                    counter.set(counter.get() + 1);
                    Value::from(7)
                })),
            )
            .unwrap();
        mirror.handle_change(&binding, Value::from("1"));
        assert_eq!(calls.get(), 0);
        mirror.handle_change(&binding, Value::from("500"));
        assert_eq!(calls.get(), 1);
        assert_eq!(record.get("score"), Some(Value::from(7)));
    }

    #[test]
    fn rejected_without_fallback_leaves_record() {
        let record = cool();
        let mirror = engine_with(&record);
        let binding = mirror
            .resolve_binding("obj", "score", Some(Constraint::new("less", "coolFactor")))
            .unwrap();
        let before = record.version();
        assert_eq!(mirror.handle_change(&binding, Value::from("1000")), CommitOutcome::Rejected);
        assert_eq!(record.get("score"), Some(Value::from(0)));
        assert_eq!(record.version(), before);
    }

    #[test]
    fn invalid_constraint_degrades_to_plain_sync() {
        let record = cool();
        let mirror = engine_with(&record);
        let binding = mirror
            .resolve_binding(
                "obj",
                "score",
                Some(Constraint::new("lower", "coolFactor").with_fallback(42)),
            )
            .unwrap();
        assert_eq!(
            mirror.handle_change(&binding, Value::from("1000")),
            CommitOutcome::Committed(Value::from(1000))
        );
    }

    #[test]
    fn constraint_revalidated_against_live_record() {
        let record = cool();
        let mirror = engine_with(&record);
        let binding = mirror
            .resolve_binding(
                "obj",
                "score",
                Some(Constraint::new("less", "coolFactor").with_fallback(42)),
            )
            .unwrap();
        record.remove("coolFactor");
        assert_eq!(
            mirror.handle_change(&binding, Value::from("1000")),
            CommitOutcome::Committed(Value::from(1000))
        );
    }

    #[test]
    fn detached_after_unregister() {
        let record = cool();
        let mirror = engine_with(&record);
        let binding = mirror.resolve_binding("obj", "score", None).unwrap();
        mirror.unregister_object("obj");
        assert_eq!(mirror.handle_change(&binding, Value::from("5")), CommitOutcome::Detached);
        assert_eq!(record.get("score"), Some(Value::from(0)));
    }

    #[test]
    fn reregister_retargets_binding() {
        let first = cool();
        let mirror = engine_with(&first);
        let binding = mirror.resolve_binding("obj", "score", None).unwrap();
        let second = cool();
        mirror.register_object("obj", second.clone()).unwrap();
        mirror.handle_change(&binding, Value::from("9"));
        assert_eq!(first.get("score"), Some(Value::from(0)));
        assert_eq!(second.get("score"), Some(Value::from(9)));
    }

    #[test]
    fn kind_fixed_at_resolve_time() {
        let record = cool();
        let mirror = engine_with(&record);
        let binding = mirror.resolve_binding("obj", "score", None).unwrap();
        assert_eq!(binding.kind(), ValueKind::Number);
        record.set("score", "now text");
        assert_eq!(
            mirror.handle_change(&binding, Value::from("12")),
            CommitOutcome::Committed(Value::from(12))
        );
    }

    #[test]
    fn resolve_binding_errors() {
        let mirror = engine_with(&cool());
        assert!(matches!(
            mirror.resolve_binding("ghost", "score", None),
            Err(MirrorError::InvalidArgument(_))
        ));
        assert!(matches!(
            mirror.resolve_binding("obj", "ghost", None),
            Err(MirrorError::InvalidArgument(_))
        ));
        assert!(matches!(
            mirror.resolve_binding("", "score", None),
            Err(MirrorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn comparator_may_reenter_engine() {
        let record = cool();
        let mirror = engine_with(&record);
        let inner = mirror.clone();
        mirror
            .add_comparator("registering", move |_, _| {
                inner.has_comparator("less") && inner.object("obj").is_some()
            })
            .unwrap();
        let binding = mirror
            .resolve_binding("obj", "score", Some(Constraint::new("registering", "coolFactor")))
            .unwrap();
        assert_eq!(
            mirror.handle_change(&binding, Value::from("3")),
            CommitOutcome::Committed(Value::from(3))
        );
    }

    #[test]
    fn debug_mode_does_not_change_behavior() {
        let quiet = cool();
        let loud = cool();
        let a = engine_with(&quiet);
        let b = Mirror::new(true);
        b.register_object("obj", loud.clone()).unwrap();
        let c = Some(Constraint::new("less", "coolFactor").with_fallback(42));
        let ba = a.resolve_binding("obj", "score", c.clone()).unwrap();
        let bb = b.resolve_binding("obj", "score", c).unwrap();
        for raw in ["1", "1000", "x"] {
            assert_eq!(
                a.handle_change(&ba, Value::from(raw)),
                b.handle_change(&bb, Value::from(raw))
            );
        }
        assert_eq!(quiet.snapshot(), loud.snapshot());
    }

    #[test]
    fn with_config_is_reported() {
        let config = MirrorConfig::new().debug(true).warn_on_missing_fallback(false);
        let mirror = Mirror::with_config(config);
        assert_eq!(mirror.config(), config);
        assert_eq!(Mirror::new(true).config(), MirrorConfig::new().debug(true));
        assert!(Mirror::default().config().warn_on_missing_fallback);
    }

    // ---- warnings ----

    #[test]
    #[traced_test]
    fn warns_on_unknown_unregister() {
        let mirror = engine_with(&cool());
        assert!(!mirror.unregister_object("ghost"));
        assert!(logs_contain("tried to remove a record that is not registered"));
    }

    #[test]
    #[traced_test]
    fn warns_on_unknown_predicate() {
        let record = cool();
        let mirror = engine_with(&record);
        assert!(!mirror.is_valid_constraint(&record, Some(&Constraint::new("lower", "coolFactor"))));
        assert!(logs_contain("invalid predicate requested in constraint"));
        assert!(!logs_contain("constraint references a property"));
    }

    #[test]
    #[traced_test]
    fn warns_on_missing_reference_property() {
        let record = cool();
        let mirror = engine_with(&record);
        let binding = mirror
            .resolve_binding("obj", "score", Some(Constraint::new("less", "missing")))
            .unwrap();
        assert_eq!(
            mirror.handle_change(&binding, Value::from("5")),
            CommitOutcome::Committed(Value::from(5))
        );
        assert!(logs_contain(
            "constraint references a property the record does not contain"
        ));
    }

    #[test]
    #[traced_test]
    fn warns_on_detached_binding() {
        let mirror = engine_with(&cool());
        let binding = mirror.resolve_binding("obj", "score", None).unwrap();
        mirror.unregister_object("obj");
        assert_eq!(mirror.handle_change(&binding, Value::from("1")), CommitOutcome::Detached);
        assert!(logs_contain("bound record is no longer registered; change dropped"));
    }

    #[test]
    #[traced_test]
    fn warns_on_missing_fallback_by_default() {
        let mirror = engine_with(&cool());
        let binding = mirror
            .resolve_binding("obj", "score", Some(Constraint::new("less", "coolFactor")))
            .unwrap();
        assert_eq!(mirror.handle_change(&binding, Value::from("999")), CommitOutcome::Rejected);
        assert!(logs_contain("constraint failed and no fallback value is present"));
    }

    #[test]
    #[traced_test]
    fn missing_fallback_warning_can_be_silenced() {
        let record = cool();
        let mirror = Mirror::with_config(MirrorConfig::new().warn_on_missing_fallback(false));
        mirror.register_object("obj", record.clone()).unwrap();
        let binding = mirror
            .resolve_binding("obj", "score", Some(Constraint::new("less", "coolFactor")))
            .unwrap();
        assert_eq!(mirror.handle_change(&binding, Value::from("999")), CommitOutcome::Rejected);
        assert_eq!(record.get("score"), Some(Value::from(0)));
        assert!(!logs_contain("constraint failed and no fallback value is present"));
    }

    #[test]
    #[traced_test]
    fn debug_mode_traces_commits() {
        let record = cool();
        let mirror = Mirror::new(true);
        mirror.register_object("obj", record).unwrap();
        let binding = mirror
            .resolve_binding(
                "obj",
                "score",
                Some(Constraint::new("less", "coolFactor").with_fallback(1)),
            )
            .unwrap();
        mirror.handle_change(&binding, Value::from("2"));
        assert!(logs_contain("setting property"));
        assert!(!logs_contain("applying fallback"));
        mirror.handle_change(&binding, Value::from("2000"));
        assert!(logs_contain("constraint failed; applying fallback"));
    }

    #[test]
    #[traced_test]
    fn quiet_mode_skips_commit_traces() {
        let mirror = engine_with(&cool());
        let binding = mirror.resolve_binding("obj", "score", None).unwrap();
        mirror.handle_change(&binding, Value::from("2"));
        assert!(!logs_contain("setting property"));
    }

    #[test]
    fn debug_format_lists_names() {
        let mirror = engine_with(&cool());
        let debug = format!("{mirror:?}");
        assert!(debug.contains("records: [\"obj\"]"));
        assert!(debug.contains("greaterOrEqual"));
    }

    proptest! {
        #[test]
        fn fallback_binding_never_rejects(raw in ".{0,12}") {
            let record = cool();
            let mirror = engine_with(&record);
            let binding = mirror
                .resolve_binding(
                    "obj",
                    "score",
                    Some(Constraint::new("less", "coolFactor").with_fallback(42)),
                )
                .unwrap();
            let outcome = mirror.handle_change(&binding, Value::from(raw.as_str()));
            let committed = match &outcome {
                CommitOutcome::Committed(v) => v.clone(),
                CommitOutcome::FellBack { committed, .. } => {
                    prop_assert_eq!(committed, &Value::from(42));
                    committed.clone()
                }
                other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
            };
            prop_assert!(committed.as_number().is_some());
            prop_assert_eq!(record.get("coolFactor"), Some(Value::from(333)));
        }

        #[test]
        fn numeric_commits_match_less_than(n in -1000i32..1000) {
            let record = cool();
            let mirror = engine_with(&record);
            let binding = mirror
                .resolve_binding("obj", "score", Some(Constraint::new("less", "coolFactor")))
                .unwrap();
            let outcome = mirror.handle_change(&binding, Value::from(n.to_string()));
            if n < 333 {
                prop_assert_eq!(outcome, CommitOutcome::Committed(Value::from(n)));
                prop_assert_eq!(record.get("score"), Some(Value::from(n)));
            } else {
                prop_assert_eq!(outcome, CommitOutcome::Rejected);
                prop_assert_eq!(record.get("score"), Some(Value::from(0)));
            }
        }
    }
}
