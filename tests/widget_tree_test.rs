use paramform::domain::ParamInfo;
use paramform::widgets::{
    EventOutcome, FormContext, FormEvent, FormSession, Widget, WidgetError, WidgetRegistry,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

fn ctx(testcases: usize) -> FormContext {
    FormContext::new(Arc::new(WidgetRegistry::with_defaults()), testcases)
}

/// Every control name except the per-array row markers, which repeat by design.
fn value_fields(session: &FormSession) -> Vec<String> {
    session
        .field_names()
        .into_iter()
        .filter(|n| !n.ends_with("_has_row"))
        .collect()
}

fn input_value(session: &FormSession, name: &str) -> Option<String> {
    let fragment = session.render();
    fragment
        .0
        .iter()
        .flat_map(|n| n.elements())
        .find(|e| e.get_attr("name") == Some(name))
        .and_then(|e| e.get_attr("value").map(str::to_string))
}

fn task_schema() -> ParamInfo {
    ParamInfo::collection(
        "Task parameters",
        "task",
        vec![
            ParamInfo::choice("Aggregation", "agg", [("sum", "Sum"), ("min", "Minimum")]),
            ParamInfo::array(
                "Subtasks",
                "st",
                ParamInfo::collection(
                    "Subtask",
                    "s",
                    vec![
                        ParamInfo::new("int", "Weight", "w"),
                        ParamInfo::array("Cases", "c", ParamInfo::new("int", "Case", "i")),
                        ParamInfo::boolean("Public", "p"),
                    ],
                ),
            ),
            ParamInfo::testcase("Points", "pt", ParamInfo::new("float", "Testcase", "v"), json!(1)),
        ],
    )
}

fn task_value() -> Value {
    json!([
        "min",
        [
            [40, [0, 1, 2], true],
            [60, [3, 4], false]
        ],
        [0.5]
    ])
}

#[test]
fn test_generated_names_are_unique() {
    let session = FormSession::new(ctx(3), &task_schema(), "p_", Some(&task_value())).unwrap();
    let names = value_fields(&session);
    let unique: HashSet<&String> = names.iter().collect();

    assert_eq!(names.len(), unique.len());
    assert!(names.contains(&"p_task_1_st_0_s_1_c_2_i".to_string()));
    assert!(names.contains(&"p_task_2_pt_2_v".to_string()));
}

#[test]
fn test_names_stay_unique_after_mutation() {
    let mut session = FormSession::new(ctx(2), &task_schema(), "", Some(&task_value())).unwrap();

    session.remove_element("task_1_st", 0).unwrap();
    session.add_element("task_1_st").unwrap();
    session.add_element("task_1_st_2_s_1_c").unwrap();
    session.remove_element("task_1_st_1_s_1_c", 1).unwrap();
    session.add_element("task_1_st_1_s_1_c").unwrap();

    let names = value_fields(&session);
    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(names.len(), unique.len());
}

#[test]
fn test_rendering_is_deterministic() {
    let first = FormSession::new(ctx(3), &task_schema(), "p_", Some(&task_value())).unwrap();
    let second = FormSession::new(ctx(3), &task_schema(), "p_", Some(&task_value())).unwrap();

    assert_eq!(first.field_names(), second.field_names());
    assert_eq!(first.render().to_html(), second.render().to_html());
}

#[test]
fn test_adds_mint_increasing_fresh_indices() {
    let schema = ParamInfo::array("Items", "it", ParamInfo::string("Item", "v"));
    let mut session =
        FormSession::new(ctx(0), &schema, "", Some(&json!(["a", "b", "c"]))).unwrap();

    let names_before: Vec<String> = value_fields(&session);
    let added: Vec<usize> = (0..4).map(|_| session.add_element("it").unwrap()).collect();
    assert_eq!(added, vec![3, 4, 5, 6]);
    assert_eq!(session.array("it").unwrap().len(), 7);

    session.remove_element("it", 4).unwrap();
    let names_after = value_fields(&session);
    for name in &names_before {
        assert!(names_after.contains(name));
    }
    assert!(!names_after.contains(&"it_4_v".to_string()));
    assert_eq!(session.array("it").unwrap().indices(), vec![0, 1, 2, 3, 5, 6]);
}

#[test]
fn test_removed_index_is_never_reused() {
    let schema = ParamInfo::array("Items", "it", ParamInfo::string("Item", "v"));
    let mut session = FormSession::new(ctx(0), &schema, "", Some(&json!(["a", "b"]))).unwrap();

    session.remove_element("it", 1).unwrap();
    let next = session.array("it").unwrap().next_index();
    let added = session.add_element("it").unwrap();

    assert_eq!(added, next);
    assert_ne!(added, 1);
    assert_eq!(session.array("it").unwrap().indices(), vec![0, 2]);
}

#[test]
fn test_reset_yields_empty_arrays() {
    let schema = ParamInfo::array("Items", "it", ParamInfo::string("Item", "v"));
    let mut session =
        FormSession::new(ctx(0), &schema, "", Some(&json!(["a", "b", "c"]))).unwrap();
    session.add_element("it").unwrap();

    let outcome = session.dispatch(FormEvent::Reset).unwrap();
    assert_eq!(outcome, EventOutcome::Applied { index: None });

    let array = session.array("it").unwrap();
    assert!(array.is_empty());
    assert_eq!(array.next_index(), 0);
    assert!(session.field_names().is_empty());
}

#[test]
fn test_reset_does_not_touch_fixed_count_rows() {
    let mut session = FormSession::new(ctx(3), &task_schema(), "", Some(&task_value())).unwrap();
    session.reset();

    let names = value_fields(&session);
    assert!(names.contains(&"task_2_pt_0_v".to_string()));
    assert!(names.contains(&"task_2_pt_2_v".to_string()));
    assert!(!names.iter().any(|n| n.starts_with("task_1_st_0")));
    assert_eq!(input_value(&session, "task_2_pt_0_v").as_deref(), Some("0.5"));
}

#[test]
fn test_fixed_count_seeds_from_default() {
    let schema = ParamInfo::testcase("Points", "pt", ParamInfo::new("float", "T", "v"), json!(7));
    let session = FormSession::new(ctx(3), &schema, "", Some(&json!([2]))).unwrap();

    assert_eq!(value_fields(&session), vec!["pt_0_v", "pt_1_v", "pt_2_v"]);
    assert_eq!(input_value(&session, "pt_0_v").as_deref(), Some("2"));
    assert_eq!(input_value(&session, "pt_1_v").as_deref(), Some("7"));
    assert_eq!(input_value(&session, "pt_2_v").as_deref(), Some("7"));
}

#[test]
fn test_remove_then_add_scenario() {
    let schema = ParamInfo::array("Testcases", "tc", ParamInfo::string("Value", "v"));
    let mut session = FormSession::new(ctx(0), &schema, "p_", Some(&json!(["a", "b"]))).unwrap();

    assert_eq!(value_fields(&session), vec!["p_tc_0_v", "p_tc_1_v"]);
    assert_eq!(input_value(&session, "p_tc_0_v").as_deref(), Some("a"));
    assert_eq!(input_value(&session, "p_tc_1_v").as_deref(), Some("b"));

    session
        .dispatch(FormEvent::Remove { array: "p_tc".into(), index: 0 })
        .unwrap();
    session.dispatch(FormEvent::Add { array: "p_tc".into() }).unwrap();

    assert_eq!(value_fields(&session), vec!["p_tc_1_v", "p_tc_2_v"]);
    assert_eq!(input_value(&session, "p_tc_1_v").as_deref(), Some("b"));
    assert_eq!(input_value(&session, "p_tc_2_v").as_deref(), Some(""));

    let markers: Vec<String> = session
        .render()
        .0
        .iter()
        .flat_map(|n| n.elements())
        .filter(|e| e.get_attr("name") == Some("p_tc_has_row"))
        .filter_map(|e| e.get_attr("value").map(str::to_string))
        .collect();
    assert_eq!(markers, vec!["1", "2"]);
}

#[test]
fn test_sibling_checkboxes_do_not_leak_state() {
    let schema = ParamInfo::array("Flags", "f", ParamInfo::boolean("Flag", "b"));
    let session =
        FormSession::new(ctx(0), &schema, "", Some(&json!([true, false, true]))).unwrap();

    let checked: Vec<bool> = session
        .render()
        .0
        .iter()
        .flat_map(|n| n.elements())
        .filter(|e| e.get_attr("type") == Some("checkbox"))
        .map(|e| e.has_attr("checked"))
        .collect();
    assert_eq!(checked, vec![true, false, true]);
}

#[test]
fn test_unknown_kind_aborts_construction() {
    let schema = ParamInfo::array("Items", "it", ParamInfo::new("matrix", "M", "m"));

    let err = FormSession::new(ctx(0), &schema, "", Some(&json!([1]))).unwrap_err();
    assert!(matches!(err, WidgetError::UnknownKind { ref field, .. } if field == "it_0_m"));

    // An empty array only hits the unknown kind once an element is added
    let mut session = FormSession::new(ctx(0), &schema, "", None).unwrap();
    let err = session
        .dispatch(FormEvent::Add { array: "it".into() })
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(session.array("it").unwrap().is_empty());
    assert_eq!(session.array("it").unwrap().next_index(), 0);
}

#[test]
fn test_root_widget_metadata() {
    let session = FormSession::new(ctx(0), &task_schema(), "p_", None).unwrap();
    let root: &dyn Widget = session.root();
    assert_eq!(root.field_name(), "p_task");
    assert_eq!(root.info().subparameters.len(), 3);
    assert_eq!(session.context().testcases(), 0);
}
