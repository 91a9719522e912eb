//! Verify every action against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected request path, a simulated
//! response, and the expected outcome. Responses are replayed through a
//! `ScriptedTransport`, so the vectors exercise the same code path as a live
//! driver.

mod common;

use common::Widget;
use object_driver::{Endpoint, ObjectDriver, ScriptedTransport};
use serde_json::Value;
use uuid::Uuid;

const HOST: &str = "http://localhost:3000";
const BASE_URL: &str = "http://localhost:3000/";

fn load_vectors(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// A driver whose only reply is the case's simulated response.
fn replay(case: &Value) -> (ObjectDriver, ScriptedTransport) {
    let sim = &case["simulated_response"];
    let transport = ScriptedTransport::new().with_reply(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    );
    let driver = ObjectDriver::new(Endpoint::new(BASE_URL, ".json"), transport.clone());
    (driver, transport)
}

fn assert_request(case: &Value, transport: &ScriptedTransport) {
    let name = case["name"].as_str().unwrap();
    let expected = format!("{HOST}{}", case["expected_request"].as_str().unwrap());
    assert_eq!(transport.requests(), vec![expected], "{name}: request");
}

fn assert_widget(name: &str, widget: &Widget, expected: &Value) {
    assert_eq!(
        widget.id.to_string(),
        expected["id"].as_str().unwrap(),
        "{name}: id"
    );
    assert_eq!(widget.name, expected["name"].as_str().unwrap(), "{name}: name");
}

fn input_id(case: &Value) -> Uuid {
    case["input_id"].as_str().unwrap().parse().unwrap()
}

fn input_pairs(case: &Value) -> Vec<(String, String)> {
    case["input"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let pair = pair.as_array().unwrap();
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn expected_status(case: &Value) -> (i64, String) {
    let pair = case["expected_result"].as_array().unwrap();
    (
        pair[0].as_i64().unwrap(),
        pair[1].as_str().unwrap().to_string(),
    )
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

#[test]
fn load_test_vectors() {
    for case in load_vectors(include_str!("../../test-vectors/load.json")) {
        let name = case["name"].as_str().unwrap();
        let (driver, transport) = replay(&case);

        let widget = driver.load(Widget::default(), input_id(&case));

        assert_request(&case, &transport);
        assert_widget(name, &widget, &case["expected_result"]);
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    for case in load_vectors(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let (driver, transport) = replay(&case);

        let widgets: Vec<Widget> = driver.list();

        assert_request(&case, &transport);
        let expected = case["expected_result"].as_array().unwrap();
        assert_eq!(widgets.len(), expected.len(), "{name}: row count");
        for (widget, expected) in widgets.iter().zip(expected) {
            assert_widget(name, widget, expected);
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    for case in load_vectors(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let (driver, transport) = replay(&case);

        let widget: Widget = driver.create(&input_pairs(&case));

        assert_request(&case, &transport);
        assert_widget(name, &widget, &case["expected_result"]);
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

#[test]
fn commit_test_vectors() {
    for case in load_vectors(include_str!("../../test-vectors/commit.json")) {
        let name = case["name"].as_str().unwrap();
        let (driver, transport) = replay(&case);

        let mut widget = Widget::with_id(input_id(&case));
        for (field, value) in input_pairs(&case) {
            assert_eq!(field, "name", "{name}: only name is editable");
            widget.set_name(&value);
        }
        let result = driver.commit_changes(&widget);

        assert_request(&case, &transport);
        assert_eq!(result, expected_status(&case), "{name}: result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    for case in load_vectors(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let (driver, transport) = replay(&case);

        let result = driver.delete(&Widget::with_id(input_id(&case)));

        assert_request(&case, &transport);
        assert_eq!(result, expected_status(&case), "{name}: result");
    }
}
