//! Kind tag -> widget constructor dispatch.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::array::ArrayWidget;
use super::collection::CollectionWidget;
use super::error::{Result, WidgetError};
use super::naming::FieldPrefix;
use super::scalar::{BooleanWidget, ChoiceWidget, TextWidget};
use super::testcase::TestcaseWidget;
use super::Widget;
use crate::domain::param_info::{kinds, ParamInfo};

/// Constructor registered for one kind tag.
pub type WidgetFactory =
    fn(&FormContext, &ParamInfo, FieldPrefix, Option<&Value>) -> Result<Box<dyn Widget>>;

/// Mapping from kind tag to constructor, built once and then shared read-only.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    factories: HashMap<String, WidgetFactory>,
}

impl WidgetRegistry {
    /// Registry with no constructors at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(kinds::STRING, TextWidget::build);
        registry.register(kinds::INT, TextWidget::build);
        registry.register(kinds::FLOAT, TextWidget::build);
        registry.register(kinds::BOOLEAN, BooleanWidget::build);
        registry.register(kinds::CHOICE, ChoiceWidget::build);
        registry.register(kinds::COLLECTION, CollectionWidget::build);
        registry.register(kinds::ARRAY, ArrayWidget::build);
        registry.register(kinds::TESTCASE, TestcaseWidget::build);
        registry
    }

    /// Register (or replace) the constructor for `kind`.
    pub fn register(&mut self, kind: &str, factory: WidgetFactory) -> Option<WidgetFactory> {
        self.factories.insert(kind.to_string(), factory)
    }

    pub fn lookup(&self, kind: &str) -> Option<WidgetFactory> {
        self.factories.get(kind).copied()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Per-page construction context: the shared registry plus the page-wide
/// testcase count consumed by fixed-count arrays.
#[derive(Clone, Debug)]
pub struct FormContext {
    registry: Arc<WidgetRegistry>,
    testcases: usize,
}

impl FormContext {
    pub fn new(registry: Arc<WidgetRegistry>, testcases: usize) -> Self {
        Self {
            registry,
            testcases,
        }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn testcases(&self) -> usize {
        self.testcases
    }

    /// Build the widget for `info` under `prefix`, seeded from `value`.
    ///
    /// Fails with [`WidgetError::UnknownKind`] when no constructor is
    /// registered for `info.kind`; composites propagate that failure so no
    /// partially built subtree escapes.
    pub fn instantiate(
        &self,
        info: &ParamInfo,
        prefix: FieldPrefix,
        value: Option<&Value>,
    ) -> Result<Box<dyn Widget>> {
        let factory = self
            .registry
            .lookup(&info.kind)
            .ok_or_else(|| WidgetError::UnknownKind {
                kind: info.kind.clone(),
                field: prefix.field_name(&info.short_name),
            })?;
        tracing::trace!(kind = %info.kind, field = %prefix.field_name(&info.short_name), "instantiating widget");
        factory(self, info, prefix, value)
    }
}

impl Default for FormContext {
    fn default() -> Self {
        Self::new(Arc::new(WidgetRegistry::with_defaults()), 0)
    }
}
