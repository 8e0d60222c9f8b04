//! Fixed, heterogeneous record of sub-widgets.

use serde_json::Value;

use super::array::ArrayWidget;
use super::error::Result;
use super::markup::{Element, Fragment, Node};
use super::naming::FieldPrefix;
use super::registry::FormContext;
use super::Widget;
use crate::domain::param_info::ParamInfo;
use crate::domain::value;

/// One child per schema subparameter, in schema order. The stored value only
/// seeds children; it never changes how many there are.
#[derive(Debug)]
pub struct CollectionWidget {
    info: ParamInfo,
    prefix: FieldPrefix,
    children: Vec<Box<dyn Widget>>,
}

impl CollectionWidget {
    pub fn new(
        ctx: &FormContext,
        info: &ParamInfo,
        prefix: FieldPrefix,
        values: Option<&Value>,
    ) -> Result<Self> {
        let children = info
            .subparameters
            .iter()
            .enumerate()
            .map(|(position, sub)| {
                ctx.instantiate(
                    sub,
                    prefix.child(&info.short_name, position),
                    value::element(values, position),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            info: info.clone(),
            prefix,
            children,
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

    pub fn children(&self) -> &[Box<dyn Widget>] {
        &self.children
    }
}

impl Widget for CollectionWidget {
    fn info(&self) -> &ParamInfo {
        &self.info
    }

    fn prefix(&self) -> &FieldPrefix {
        &self.prefix
    }

    fn render(&self) -> Fragment {
        let rows = self.children.iter().map(|child| -> Node {
            Element::new("tr")
                .child(Element::new("td").text(child.info().name.clone()))
                .child(Element::new("td").children(child.render().0))
                .into()
        });
        Fragment(vec![Element::new("table").children(rows).into()])
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }

    fn array_mut(&mut self, key: &str) -> Option<&mut ArrayWidget> {
        self.children
            .iter_mut()
            .find_map(|child| child.array_mut(key))
    }

    fn collect_arrays<'a>(&'a self, out: &mut Vec<&'a ArrayWidget>) {
        for child in &self.children {
            child.collect_arrays(out);
        }
    }
}
