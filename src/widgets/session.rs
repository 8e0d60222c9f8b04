//! Owner of one rendered form and the event dispatch into it.
//!
//! The session holds the root widget and routes user events: add/remove go to
//! the array addressed by its key, a form reset is forwarded to every array in
//! the tree. Events naming rows or arrays that no longer exist are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::array::ArrayWidget;
use super::error::{Result, WidgetError};
use super::markup::{Fragment, Node};
use super::naming::{self, FieldPrefix};
use super::registry::FormContext;
use super::Widget;
use crate::domain::param_info::ParamInfo;

/// User-triggered event on a rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FormEvent {
    Add { array: String },
    Remove { array: String, index: usize },
    Reset,
}

/// What happened to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// Added element index for `Add`, otherwise `None`
    Applied { index: Option<usize> },
    /// Stale event: target not found
    Ignored,
}

/// The part of the page an applied event touched. Only the addressed row or
/// table changes; every other control keeps whatever the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormChange {
    pub outcome: EventOutcome,
    /// Table holding the added or removed row
    pub table_id: Option<String>,
    pub row_id: Option<String>,
    /// Markup of the appended row
    pub row: Option<Node>,
    /// Tables emptied by a reset
    pub cleared: Vec<String>,
}

impl FormChange {
    fn unchanged(outcome: EventOutcome) -> Self {
        Self {
            outcome,
            table_id: None,
            row_id: None,
            row: None,
            cleared: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct FormSession {
    ctx: FormContext,
    root: Box<dyn Widget>,
}

impl FormSession {
    /// Build the whole widget tree for one form render.
    pub fn new(
        ctx: FormContext,
        schema: &ParamInfo,
        prefix: &str,
        value: Option<&Value>,
    ) -> Result<Self> {
        let root = ctx.instantiate(schema, FieldPrefix::root(prefix), value)?;
        tracing::debug!(root = %root.field_name(), "form session created");
        Ok(Self { ctx, root })
    }

    pub fn root(&self) -> &dyn Widget {
        self.root.as_ref()
    }

    pub fn context(&self) -> &FormContext {
        &self.ctx
    }

    pub fn render(&self) -> Fragment {
        self.root.render()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.render().field_names()
    }

    /// Every live array, outermost first.
    pub fn arrays(&self) -> Vec<&ArrayWidget> {
        let mut out = Vec::new();
        self.root.collect_arrays(&mut out);
        out
    }

    pub fn array(&self, key: &str) -> Option<&ArrayWidget> {
        self.arrays().into_iter().find(|a| a.key() == key)
    }

    pub fn array_mut(&mut self, key: &str) -> Option<&mut ArrayWidget> {
        self.root.array_mut(key)
    }

    pub fn add_element(&mut self, key: &str) -> Result<usize> {
        let ctx = &self.ctx;
        match self.root.array_mut(key) {
            Some(array) => array.add_element(ctx),
            None => Err(WidgetError::MissingTarget {
                target: key.to_string(),
            }),
        }
    }

    pub fn remove_element(&mut self, key: &str, index: usize) -> Result<()> {
        match self.root.array_mut(key) {
            Some(array) => array.remove_element(index),
            None => Err(WidgetError::MissingTarget {
                target: key.to_string(),
            }),
        }
    }

    /// Form reset: every array in the tree returns to its empty state.
    pub fn reset(&mut self) {
        self.root.reset();
    }

    /// Apply an event. Missing targets are swallowed; construction failures
    /// while adding an element propagate.
    pub fn dispatch(&mut self, event: FormEvent) -> Result<EventOutcome> {
        let result = match &event {
            FormEvent::Add { array } => self.add_element(array).map(Some),
            FormEvent::Remove { array, index } => self.remove_element(array, *index).map(|_| None),
            FormEvent::Reset => {
                self.reset();
                Ok(None)
            }
        };

        match result {
            Ok(index) => Ok(EventOutcome::Applied { index }),
            Err(WidgetError::MissingTarget { target }) => {
                tracing::debug!(?event, %target, "ignoring event for missing target");
                Ok(EventOutcome::Ignored)
            }
            Err(e) => Err(e),
        }
    }

    /// Dispatch `event` and describe the resulting markup change.
    pub fn apply(&mut self, event: FormEvent) -> Result<FormChange> {
        let outcome = self.dispatch(event.clone())?;
        let mut change = FormChange::unchanged(outcome);
        if outcome == EventOutcome::Ignored {
            return Ok(change);
        }

        match event {
            FormEvent::Add { array } => {
                if let EventOutcome::Applied { index: Some(index) } = outcome {
                    change.row = self.array(&array).and_then(|a| a.row(index));
                    change.row_id = Some(naming::row_id(&array, index));
                }
                change.table_id = Some(naming::table_id(&array));
            }
            FormEvent::Remove { array, index } => {
                change.table_id = Some(naming::table_id(&array));
                change.row_id = Some(naming::row_id(&array, index));
            }
            FormEvent::Reset => {
                change.cleared = self
                    .arrays()
                    .iter()
                    .map(|a| naming::table_id(&a.key()))
                    .collect();
            }
        }
        Ok(change)
    }
}
