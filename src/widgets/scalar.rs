//! Leaf widgets: text-like inputs, checkboxes and selects.

use serde_json::Value;

use super::error::Result;
use super::markup::{Element, Fragment, Node};
use super::naming::FieldPrefix;
use super::registry::FormContext;
use super::Widget;
use crate::domain::param_info::ParamInfo;
use crate::domain::value;

// ============================================================================
// Text input (string, int, float)
// ============================================================================

/// Single text input pre-filled with the stored value.
#[derive(Debug, Clone)]
pub struct TextWidget {
    info: ParamInfo,
    prefix: FieldPrefix,
    original_value: Option<Value>,
}

impl TextWidget {
    pub fn new(info: &ParamInfo, prefix: FieldPrefix, original_value: Option<&Value>) -> Self {
        Self {
            info: info.clone(),
            prefix,
            original_value: value::present(original_value).cloned(),
        }
    }

    pub fn build(
        _ctx: &FormContext,
        info: &ParamInfo,
        prefix: FieldPrefix,
        original_value: Option<&Value>,
    ) -> Result<Box<dyn Widget>> {
        Ok(Box::new(Self::new(info, prefix, original_value)))
    }

    pub fn original_value(&self) -> Option<&Value> {
        self.original_value.as_ref()
    }
}

impl Widget for TextWidget {
    fn info(&self) -> &ParamInfo {
        &self.info
    }

    fn prefix(&self) -> &FieldPrefix {
        &self.prefix
    }

    fn render(&self) -> Fragment {
        let input = Element::new("input")
            .attr("type", "text")
            .attr("name", self.field_name())
            .attr("value", value::display_text(self.original_value.as_ref()));
        Fragment(vec![input.into()])
    }
}

// ============================================================================
// Checkbox
// ============================================================================

/// Checkbox whose state comes from this instance's own stored value.
#[derive(Debug, Clone)]
pub struct BooleanWidget {
    info: ParamInfo,
    prefix: FieldPrefix,
    original_value: Option<Value>,
}

impl BooleanWidget {
    pub fn new(info: &ParamInfo, prefix: FieldPrefix, original_value: Option<&Value>) -> Self {
        Self {
            info: info.clone(),
            prefix,
            original_value: value::present(original_value).cloned(),
        }
    }

    pub fn build(
        _ctx: &FormContext,
        info: &ParamInfo,
        prefix: FieldPrefix,
        original_value: Option<&Value>,
    ) -> Result<Box<dyn Widget>> {
        Ok(Box::new(Self::new(info, prefix, original_value)))
    }

    pub fn is_checked(&self) -> bool {
        value::is_truthy(self.original_value.as_ref())
    }
}

impl Widget for BooleanWidget {
    fn info(&self) -> &ParamInfo {
        &self.info
    }

    fn prefix(&self) -> &FieldPrefix {
        &self.prefix
    }

    fn render(&self) -> Fragment {
        let input = Element::new("input")
            .attr("type", "checkbox")
            .attr("name", self.field_name())
            .flag("checked", self.is_checked());
        Fragment(vec![input.into()])
    }
}

// ============================================================================
// Select
// ============================================================================

/// Select listing the schema's choices in order.
#[derive(Debug, Clone)]
pub struct ChoiceWidget {
    info: ParamInfo,
    prefix: FieldPrefix,
    original_value: Option<Value>,
}

impl ChoiceWidget {
    pub fn new(info: &ParamInfo, prefix: FieldPrefix, original_value: Option<&Value>) -> Self {
        Self {
            info: info.clone(),
            prefix,
            original_value: value::present(original_value).cloned(),
        }
    }

    pub fn build(
        _ctx: &FormContext,
        info: &ParamInfo,
        prefix: FieldPrefix,
        original_value: Option<&Value>,
    ) -> Result<Box<dyn Widget>> {
        Ok(Box::new(Self::new(info, prefix, original_value)))
    }

    /// Key of the option matching the stored value, if any.
    pub fn selected_key(&self) -> Option<&str> {
        let current = self.original_value.as_ref()?;
        let text = value::display_text(Some(current));
        self.info
            .choices
            .iter()
            .find(|c| c.key == text)
            .map(|c| c.key.as_str())
    }
}

impl Widget for ChoiceWidget {
    fn info(&self) -> &ParamInfo {
        &self.info
    }

    fn prefix(&self) -> &FieldPrefix {
        &self.prefix
    }

    fn render(&self) -> Fragment {
        let selected = self.selected_key();
        let options = self.info.choices.iter().map(|choice| -> Node {
            Element::new("option")
                .attr("value", choice.key.clone())
                .flag("selected", selected == Some(choice.key.as_str()))
                .text(choice.label.clone())
                .into()
        });
        let select = Element::new("select")
            .attr("name", self.field_name())
            .children(options);
        Fragment(vec![select.into()])
    }
}
