//! Request/response contract checks through the public entry points.

use bikefit::{CalculationKind, Request, handle, handle_json};
use serde_json::{Value, json};

fn run(kind: CalculationKind, data: Value) -> Value {
    let response = handle(&Request::new(kind, data));
    assert!(response.success, "{kind} failed: {:?}", response.error);
    response.result.expect("successful response has a result")
}

#[test]
fn unknown_kind_response() {
    let response = handle_json(r#"{"calculationKind": "saddle-height", "data": {}}"#);
    insta::assert_json_snapshot!(response, @r#"
    {
      "success": false,
      "error": "unknown calculation kind: saddle-height"
    }
    "#);
}

#[test]
fn seatpost_response() {
    let response = handle(&Request::new(
        CalculationKind::Seatpost,
        json!({
            "reach": 380,
            "stack": 560,
            "saddleSetback": -180,
            "saddleHeight": 160,
            "seatTubeAngle": 73.5,
            "seatTubeLength": 540
        }),
    ));
    insta::assert_json_snapshot!(response, @r#"
    {
      "success": true,
      "result": {
        "bbToRail": 751,
        "bbToSRC": 747,
        "effectiveSTA": "74.5",
        "exposedSeatpost": 211,
        "saddleX": 200,
        "saddleY": 720,
        "setbackVsSTA": 13
      }
    }
    "#);
}

#[test]
fn xy_position_missing_everything() {
    let response = handle_json(r#"{"calculationKind": "xy-position"}"#);
    insta::assert_json_snapshot!(response, @r#"
    {
      "success": true,
      "result": {
        "handlebarX": "-- mm",
        "handlebarY": "-- mm"
      }
    }
    "#);
}

#[test]
fn every_kind_accepts_an_empty_payload() {
    for kind in CalculationKind::ALL {
        let response = handle(&Request::new(kind, json!({})));
        assert!(response.success, "{kind}: {:?}", response.error);
    }
}

#[test]
fn array_payload_is_a_failure() {
    let response = handle(&Request::new(CalculationKind::Stem, json!([73])));
    assert!(!response.success);
    assert!(response.result.is_none());
    let error = response.error.unwrap();
    assert!(error.starts_with("invalid payload for stem"), "{error}");
}

#[test]
fn simulator_passes_unknown_fields_through() {
    let result = run(
        CalculationKind::PositionSimulator,
        json!({
            "bikes": [{
                "reach": 380,
                "stack": 560,
                "headTubeAngle": 73,
                "brand": "Acme",
                "notes": {"size": "M", "tags": ["gravel", "steel"]}
            }]
        }),
    );
    let bike = &result[0];
    assert_eq!(bike["brand"], "Acme");
    assert_eq!(bike["notes"], json!({"size": "M", "tags": ["gravel", "steel"]}));
    assert_eq!(bike["reach"], 380);
    // No target: position is known, diffs are not
    assert_eq!(bike["handlebarX"], 380);
    assert_eq!(bike["reachDiff"], "--");
    assert_eq!(bike["setbackVsSTA"], "--");
}

#[test]
fn simulator_keeps_input_order() {
    let bikes: Vec<Value> = [420, 380, 400]
        .into_iter()
        .map(|reach| json!({"id": reach, "reach": reach, "stack": 560, "headTubeAngle": 73}))
        .collect();
    let result = run(
        CalculationKind::PositionSimulator,
        json!({"bikes": bikes, "targetReach": 400, "targetStack": 560}),
    );
    let ids: Vec<_> = result.as_array().unwrap().iter().map(|b| b["id"].clone()).collect();
    assert_eq!(ids, [json!(420), json!(380), json!(400)]);
    let totals: Vec<_> = result.as_array().unwrap().iter().map(|b| b["totalDiff"].clone()).collect();
    assert_eq!(totals, [json!(20), json!(20), json!(0)]);
}

#[test]
fn simulator_without_bikes_is_empty() {
    let result = run(CalculationKind::PositionSimulator, json!({"targetReach": 400}));
    assert_eq!(result, json!([]));
}

#[test]
fn simulator_path_ends_at_handlebar() {
    let result = run(
        CalculationKind::PositionSimulator,
        json!({
            "bikes": [{
                "reach": 380, "stack": 560, "headTubeAngle": 73,
                "stemLength": 110, "stemAngle": -6, "spacerHeight": 15, "stemHeight": 40, "headsetHeight": 10
            }]
        }),
    );
    let path = result[0]["positionPath"].as_array().unwrap();
    assert_eq!(path.len(), 4);
    assert_eq!(path[0], json!({"x": 380.0, "y": 560.0}));
    let last = &path[3];
    assert_eq!((last["x"].as_f64().unwrap() + 0.5).floor(), 475.0);
    assert_eq!((last["y"].as_f64().unwrap() + 0.5).floor(), 624.0);
}

#[test]
fn stem_results_are_repeatable() {
    let data = json!({"headTubeAngle": 73, "stemLength": 90, "stemAngle": 6, "spacerHeight": 5});
    let first = run(CalculationKind::Stem, data.clone());
    let second = run(CalculationKind::Stem, data);
    assert_eq!(first, second);
}

#[test]
fn stem_ignores_frame_fields() {
    let bare = run(CalculationKind::Stem, json!({"headTubeAngle": 73}));
    let framed = run(CalculationKind::Stem, json!({"headTubeAngle": 73, "reach": 400, "stack": 600}));
    assert_eq!(bare, framed);
}

#[test]
fn zero_stem_length_is_not_defaulted() {
    let result = run(
        CalculationKind::XyPosition,
        json!({
            "reach": 400, "stack": 600, "headTubeAngle": 90,
            "stemLength": 0, "spacerHeight": 0, "stemHeight": 0, "headsetHeight": 0
        }),
    );
    assert_eq!(result, json!({"handlebarX": 400, "handlebarY": 600}));
}

#[test]
fn badly_typed_nested_fields_still_succeed() {
    let stem = handle_json(r#"{"calculationKind": "stem", "data": {"headTubeAngle": 73, "candidate": ""}}"#);
    assert!(stem.success, "{:?}", stem.error);
    assert!(stem.result.unwrap().get("candidate").is_none());

    let empty = handle_json(r#"{"calculationKind": "position-simulator", "data": {"bikes": null}}"#);
    assert_eq!(empty.result, Some(json!([])));

    let mixed = handle_json(
        r#"{"calculationKind": "position-simulator",
            "data": {"bikes": [{"reach": 380, "stack": 560, "headTubeAngle": 73}, "junk"]}}"#,
    );
    let bikes = mixed.result.unwrap();
    assert_eq!(bikes.as_array().map(Vec::len), Some(2));
    assert_eq!(bikes[0]["handlebarX"], 380);
    assert_eq!(bikes[1]["handlebarX"], "--");
}
