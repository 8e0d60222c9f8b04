//! Owned markup tree produced by widget rendering.
//!
//! Widgets build [`Node`] values instead of raw strings so that escaping
//! happens in exactly one place (serialisation) and so callers can inspect
//! the rendered tree, e.g. to list every submitted field name.

use std::fmt::{self, Write};

/// A rendered node: an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Boolean attribute such as `checked` or `selected`, emitted only when set.
    pub fn flag(self, name: &'static str, set: bool) -> Self {
        if set {
            self.attr(name, "")
        } else {
            self
        }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| *n == name)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    /// Depth-first, document-order walk over every element.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_elements(self, &mut out);
        out
    }

    /// First element carrying `id == id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.elements()
            .into_iter()
            .find(|e| e.get_attr("id") == Some(id))
    }

    /// `name` attributes of every form control, in document order.
    pub fn field_names(&self) -> Vec<String> {
        self.elements()
            .into_iter()
            .filter(|e| matches!(e.tag, "input" | "select" | "textarea"))
            .filter_map(|e| e.get_attr("name").map(str::to_string))
            .collect()
    }

    /// Serialise to HTML.
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

fn collect_elements<'a>(node: &'a Node, out: &mut Vec<&'a Element>) {
    if let Node::Element(element) = node {
        out.push(element);
        for child in &element.children {
            collect_elements(child, out);
        }
    }
}

/// A sequence of sibling nodes rendered without a wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment(pub Vec<Node>);

impl Fragment {
    pub fn field_names(&self) -> Vec<String> {
        self.0.iter().flat_map(Node::field_names).collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.0.iter().find_map(|n| n.find_by_id(id))
    }

    pub fn to_html(&self) -> String {
        self.0.iter().map(Node::to_html).collect()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => write_escaped(f, text),
            Node::Element(element) => {
                write!(f, "<{}", element.tag)?;
                for (name, value) in &element.attrs {
                    if value.is_empty() && matches!(*name, "checked" | "selected" | "disabled") {
                        write!(f, " {}", name)?;
                    } else {
                        write!(f, " {}=\"", name)?;
                        write_escaped(f, value)?;
                        f.write_char('"')?;
                    }
                }
                if VOID_TAGS.contains(&element.tag) {
                    return f.write_str(" />");
                }
                f.write_char('>')?;
                for child in &element.children {
                    write!(f, "{}", child)?;
                }
                write!(f, "</{}>", element.tag)
            }
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, raw: &str) -> fmt::Result {
    for ch in raw.chars() {
        match ch {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            '\'' => f.write_str("&#39;")?,
            _ => f.write_char(ch)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialise_escapes_text_and_attributes() {
        let node: Node = Element::new("td")
            .attr("title", "a \"quoted\" <b>")
            .text("x & y")
            .into();
        assert_eq!(
            node.to_html(),
            "<td title=\"a &quot;quoted&quot; &lt;b&gt;\">x &amp; y</td>"
        );
    }

    #[test]
    fn test_void_and_flag_attributes() {
        let node: Node = Element::new("input")
            .attr("type", "checkbox")
            .attr("name", "p_b")
            .flag("checked", true)
            .into();
        assert_eq!(node.to_html(), "<input type=\"checkbox\" name=\"p_b\" checked />");

        let unchecked: Node = Element::new("input").flag("checked", false).into();
        assert_eq!(unchecked.to_html(), "<input />");
    }

    #[test]
    fn test_field_names_in_document_order() {
        let node: Node = Element::new("table")
            .child(Element::new("input").attr("name", "a"))
            .child(
                Element::new("tr")
                    .child(Element::new("select").attr("name", "b"))
                    .child(Element::new("a").attr("name", "not_a_field")),
            )
            .into();
        assert_eq!(node.field_names(), vec!["a", "b"]);
        assert!(node.find_by_id("missing").is_none());
    }
}
