//! Homogeneous list whose length is the page-wide testcase count.

use serde_json::Value;

use super::array::ArrayWidget;
use super::error::{Result, WidgetError};
use super::markup::{Element, Fragment, Node};
use super::naming::{self, FieldPrefix};
use super::registry::FormContext;
use super::Widget;
use crate::domain::param_info::ParamInfo;
use crate::domain::value;

/// Exactly [`FormContext::testcases`] elements. Stored entries past the count
/// are ignored; missing ones are seeded from `default_value`. The count never
/// changes after construction, so no add or remove controls are rendered.
#[derive(Debug)]
pub struct TestcaseWidget {
    info: ParamInfo,
    subparameter: ParamInfo,
    prefix: FieldPrefix,
    elements: Vec<Box<dyn Widget>>,
}

impl TestcaseWidget {
    pub fn new(
        ctx: &FormContext,
        info: &ParamInfo,
        prefix: FieldPrefix,
        values: Option<&Value>,
    ) -> Result<Self> {
        let subparameter = info
            .subparameter
            .as_deref()
            .cloned()
            .ok_or_else(|| WidgetError::MissingSubparameter {
                field: prefix.field_name(&info.short_name),
            })?;
        let default_value = value::present(info.default_value.as_ref());

        let elements = (0..ctx.testcases())
            .map(|index| {
                let seed = value::element(values, index).or(default_value);
                ctx.instantiate(&subparameter, prefix.child(&info.short_name, index), seed)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            info: info.clone(),
            subparameter,
            prefix,
            elements,
        })
    }

    pub fn build(
        ctx: &FormContext,
        info: &ParamInfo,
        prefix: FieldPrefix,
        values: Option<&Value>,
    ) -> Result<Box<dyn Widget>> {
        Ok(Box::new(Self::new(ctx, info, prefix, values)?))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Box<dyn Widget>] {
        &self.elements
    }
}

impl Widget for TestcaseWidget {
    fn info(&self) -> &ParamInfo {
        &self.info
    }

    fn prefix(&self) -> &FieldPrefix {
        &self.prefix
    }

    fn render(&self) -> Fragment {
        let key = self.field_name();
        let rows = self.elements.iter().enumerate().map(|(index, element)| -> Node {
            Element::new("tr")
                .attr("id", naming::row_id(&key, index))
                .child(Element::new("td").text(format!("{} {}", self.subparameter.name, index)))
                .child(Element::new("td").children(element.render().0))
                .into()
        });
        let table = Element::new("table")
            .attr("id", naming::table_id(&key))
            .children(rows);
        Fragment(vec![table.into()])
    }

    fn reset(&mut self) {
        for element in &mut self.elements {
            element.reset();
        }
    }

    fn array_mut(&mut self, key: &str) -> Option<&mut ArrayWidget> {
        self.elements
            .iter_mut()
            .find_map(|element| element.array_mut(key))
    }

    fn collect_arrays<'a>(&'a self, out: &mut Vec<&'a ArrayWidget>) {
        for element in &self.elements {
            element.collect_arrays(out);
        }
    }
}
