//! Recursive parameter widgets
//!
//! A widget tree is built from a [`ParamInfo`] schema, a name prefix and an
//! optional stored value. Composite widgets instantiate their children through
//! the [`WidgetRegistry`], extending the prefix at every level so generated
//! field names stay unique. Arrays can grow and shrink after construction;
//! see [`ArrayWidget`].

pub mod array;
pub mod collection;
pub mod error;
pub mod markup;
pub mod naming;
pub mod registry;
pub mod scalar;
pub mod session;
pub mod testcase;

pub use array::ArrayWidget;
pub use collection::CollectionWidget;
pub use error::WidgetError;
pub use markup::{Element, Fragment, Node};
pub use naming::FieldPrefix;
pub use registry::{FormContext, WidgetFactory, WidgetRegistry};
pub use scalar::{BooleanWidget, ChoiceWidget, TextWidget};
pub use session::{EventOutcome, FormChange, FormEvent, FormSession};
pub use testcase::TestcaseWidget;

use crate::domain::param_info::ParamInfo;
use std::fmt;

/// Common capability of every widget kind.
pub trait Widget: fmt::Debug + Send + Sync {
    /// Schema node this widget was built from
    fn info(&self) -> &ParamInfo;

    /// Prefix this widget was instantiated under
    fn prefix(&self) -> &FieldPrefix;

    /// Fully qualified name of this widget's own control
    fn field_name(&self) -> String {
        self.prefix().field_name(&self.info().short_name)
    }

    /// Produce the markup for this widget and its subtree.
    fn render(&self) -> Fragment;

    /// Form reset: arrays drop back to the empty state, composites forward.
    fn reset(&mut self) {}

    /// Locate the array whose key is `key` inside this subtree.
    fn array_mut(&mut self, _key: &str) -> Option<&mut ArrayWidget> {
        None
    }

    /// Collect every live array in this subtree, outermost first.
    fn collect_arrays<'a>(&'a self, _out: &mut Vec<&'a ArrayWidget>) {}
}
