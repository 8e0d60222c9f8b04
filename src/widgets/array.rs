//! Dynamic, homogeneous list of sub-widgets.
//!
//! Elements are named by an index minted from `next_index`. Indices are never
//! handed out twice in a session: removing an element leaves a gap and the
//! next added element takes a fresh, larger index. The hidden `<key>_has_row`
//! marker rendered in every row tells the receiving side which indices are
//! live.

use serde_json::Value;

use super::error::{Result, WidgetError};
use super::markup::{Element, Fragment, Node};
use super::naming::{self, FieldPrefix};
use super::registry::FormContext;
use super::Widget;
use crate::domain::param_info::ParamInfo;
use crate::domain::value;

/// One live element and the index its names were minted with.
#[derive(Debug)]
pub struct ArrayElement {
    pub index: usize,
    pub widget: Box<dyn Widget>,
}

#[derive(Debug)]
pub struct ArrayWidget {
    info: ParamInfo,
    subparameter: ParamInfo,
    prefix: FieldPrefix,
    elements: Vec<ArrayElement>,
    next_index: usize,
}

impl ArrayWidget {
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

        let elements = (0..value::sequence_len(values))
            .map(|index| {
                let widget = ctx.instantiate(
                    &subparameter,
                    prefix.child(&info.short_name, index),
                    value::element(values, index),
                )?;
                Ok(ArrayElement { index, widget })
            })
            .collect::<Result<Vec<_>>>()?;

        let next_index = elements.len();
        Ok(Self {
            info: info.clone(),
            subparameter,
            prefix,
            elements,
            next_index,
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

    /// Identifier shared by every control this array mints: `prefix + short_name`.
    pub fn key(&self) -> String {
        self.field_name()
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Live element indices in row order.
    pub fn indices(&self) -> Vec<usize> {
        self.elements.iter().map(|e| e.index).collect()
    }

    pub fn elements(&self) -> &[ArrayElement] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&dyn Widget> {
        self.elements
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.widget.as_ref())
    }

    /// Markup of the single row for `index`, as it appears in [`Widget::render`].
    pub fn row(&self, index: usize) -> Option<Node> {
        let key = self.key();
        self.elements
            .iter()
            .find(|e| e.index == index)
            .map(|e| self.render_row(&key, e))
    }

    /// Append a fresh element under the next unused index and return it.
    pub fn add_element(&mut self, ctx: &FormContext) -> Result<usize> {
        let index = self.next_index;
        let widget = ctx.instantiate(
            &self.subparameter,
            self.prefix.child(&self.info.short_name, index),
            None,
        )?;
        self.elements.push(ArrayElement { index, widget });
        self.next_index += 1;
        tracing::debug!(array = %self.key(), index, "added array element");
        Ok(index)
    }

    /// Drop the row for `index`. Remaining indices are left untouched.
    pub fn remove_element(&mut self, index: usize) -> Result<()> {
        let position = self
            .elements
            .iter()
            .position(|e| e.index == index)
            .ok_or_else(|| WidgetError::MissingTarget {
                target: naming::row_id(&self.key(), index),
            })?;
        self.elements.remove(position);
        tracing::debug!(array = %self.key(), index, "removed array element");
        Ok(())
    }

    fn render_row(&self, key: &str, element: &ArrayElement) -> Node {
        let index = element.index;
        let marker = Element::new("input")
            .attr("type", "hidden")
            .attr("name", naming::has_row_name(key))
            .attr("value", index.to_string());
        let remove = Element::new("a")
            .attr("href", "#")
            .attr("id", naming::remove_control_id(key, index))
            .text("Remove");

        Element::new("tr")
            .attr("id", naming::row_id(key, index))
            .child(Element::new("td").text(format!("{} {}", self.subparameter.name, index)))
            .child(Element::new("td").children(element.widget.render().0))
            .child(Element::new("td").child(marker).child(remove))
            .into()
    }
}

impl Widget for ArrayWidget {
    fn info(&self) -> &ParamInfo {
        &self.info
    }

    fn prefix(&self) -> &FieldPrefix {
        &self.prefix
    }

    fn render(&self) -> Fragment {
        let key = self.key();
        let add = Element::new("a")
            .attr("href", "#")
            .attr("id", naming::add_control_id(&key))
            .text("Add an element");
        let table = Element::new("table")
            .attr("id", naming::table_id(&key))
            .children(self.elements.iter().map(|e| self.render_row(&key, e)));
        Fragment(vec![add.into(), table.into()])
    }

    /// Back to the freshly instantiated, empty state. The originally stored
    /// value is not restored.
    fn reset(&mut self) {
        tracing::debug!(array = %self.key(), dropped = self.elements.len(), "resetting array");
        self.elements.clear();
        self.next_index = 0;
    }

    fn array_mut(&mut self, key: &str) -> Option<&mut ArrayWidget> {
        if self.key() == key {
            return Some(self);
        }
        self.elements
            .iter_mut()
            .find_map(|e| e.widget.array_mut(key))
    }

    fn collect_arrays<'a>(&'a self, out: &mut Vec<&'a ArrayWidget>) {
        out.push(self);
        for element in &self.elements {
            element.widget.collect_arrays(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tc_schema() -> ParamInfo {
        ParamInfo::array("Testcases", "tc", ParamInfo::string("Value", "v"))
    }

    fn build(values: Value) -> (FormContext, ArrayWidget) {
        let ctx = FormContext::default();
        let widget = ArrayWidget::new(&ctx, &tc_schema(), FieldPrefix::root("p_"), Some(&values))
            .unwrap();
        (ctx, widget)
    }

    fn text_value(widget: &ArrayWidget, index: usize) -> String {
        widget
            .element(index)
            .unwrap()
            .render()
            .0[0]
            .elements()[0]
            .get_attr("value")
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_construction_from_stored_value() {
        let (_, widget) = build(json!(["a", "b"]));
        assert_eq!(widget.indices(), vec![0, 1]);
        assert_eq!(widget.next_index(), 2);
        assert_eq!(
            widget.render().field_names(),
            vec!["p_tc_0_v", "p_tc_has_row", "p_tc_1_v", "p_tc_has_row"]
        );
        assert_eq!(text_value(&widget, 0), "a");
        assert_eq!(text_value(&widget, 1), "b");
    }

    #[test]
    fn test_remove_then_add_mints_fresh_index() {
        let (ctx, mut widget) = build(json!(["a", "b"]));
        widget.remove_element(0).unwrap();
        let added = widget.add_element(&ctx).unwrap();

        assert_eq!(added, 2);
        assert_eq!(widget.indices(), vec![1, 2]);
        assert_eq!(text_value(&widget, 1), "b");
        assert_eq!(text_value(&widget, 2), "");

        let fragment = widget.render();
        let names: Vec<String> = fragment
            .field_names()
            .into_iter()
            .filter(|n| n != "p_tc_has_row")
            .collect();
        assert_eq!(names, vec!["p_tc_1_v", "p_tc_2_v"]);
    }

    #[test]
    fn test_removing_missing_row_is_reported() {
        let (_, mut widget) = build(json!(["a"]));
        widget.remove_element(0).unwrap();
        let err = widget.remove_element(0).unwrap_err();
        assert_eq!(
            err,
            WidgetError::MissingTarget {
                target: "p_tc_row_0".to_string()
            }
        );
        assert!(!err.is_fatal());
        assert_eq!(widget.next_index(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (ctx, mut widget) = build(json!(["a", "b", "c"]));
        widget.add_element(&ctx).unwrap();
        widget.reset();
        assert!(widget.is_empty());
        assert_eq!(widget.next_index(), 0);
        assert_eq!(widget.add_element(&ctx).unwrap(), 0);
    }

    #[test]
    fn test_row_markup() {
        let (_, widget) = build(json!(["a"]));
        let fragment = widget.render();

        assert!(fragment.find_by_id("add_element_p_tc").is_some());
        assert!(fragment.find_by_id("element_table_p_tc").is_some());
        let row = fragment.find_by_id("p_tc_row_0").unwrap();
        assert_eq!(row.tag, "tr");
        assert!(fragment.find_by_id("remove_element_p_tc_0").is_some());
        assert!(fragment.to_html().contains("<td>Value 0</td>"));
        assert!(fragment
            .to_html()
            .contains("<input type=\"hidden\" name=\"p_tc_has_row\" value=\"0\" />"));
    }

    #[test]
    fn test_single_row_matches_full_render() {
        let (ctx, mut widget) = build(json!(["a"]));
        let added = widget.add_element(&ctx).unwrap();

        let row = widget.row(added).unwrap();
        let table = widget.render();
        let in_table = table.find_by_id("p_tc_row_1").unwrap();
        assert_eq!(row, Node::Element(in_table.clone()));
        assert_eq!(row.field_names(), vec!["p_tc_1_v", "p_tc_has_row"]);
        assert!(widget.row(5).is_none());
    }

    #[test]
    fn test_missing_subparameter() {
        let ctx = FormContext::default();
        let info = ParamInfo::new("array", "Broken", "b");
        let err = ArrayWidget::new(&ctx, &info, FieldPrefix::root(""), None).unwrap_err();
        assert_eq!(err, WidgetError::MissingSubparameter { field: "b".to_string() });
    }

    #[test]
    fn test_nested_array_lookup() {
        let ctx = FormContext::default();
        let info = ParamInfo::array(
            "Groups",
            "g",
            ParamInfo::array("Items", "i", ParamInfo::string("V", "v")),
        );
        let mut outer = ArrayWidget::new(&ctx, &info, FieldPrefix::root(""), Some(&json!([["x"], []])))
            .unwrap();

        let inner = outer.array_mut("g_1_i").unwrap();
        assert!(inner.is_empty());
        inner.add_element(&ctx).unwrap();

        let mut arrays = Vec::new();
        outer.collect_arrays(&mut arrays);
        let keys: Vec<String> = arrays.iter().map(|a| a.key()).collect();
        assert_eq!(keys, vec!["g", "g_0_i", "g_1_i"]);
        assert!(outer.render().field_names().contains(&"g_1_i_0_v".to_string()));
    }
}
