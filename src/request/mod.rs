//! Request/response contract.
//!
//! A request names a calculation kind and carries a kind-specific `data`
//! object. The kind string is checked once, up front; after that every
//! calculation is a variant of the closed [`Calculation`] enum.

mod calculators;

use std::fmt;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CalcError;
use crate::log::{debug, warn};

pub use calculators::{PositionSimulator, Seatpost, StackReach, StemComparison, XyPosition};

/// The five calculations the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculationKind {
    XyPosition,
    PositionSimulator,
    Seatpost,
    StackReach,
    Stem,
}

impl CalculationKind {
    pub const ALL: [CalculationKind; 5] = [
        CalculationKind::XyPosition,
        CalculationKind::PositionSimulator,
        CalculationKind::Seatpost,
        CalculationKind::StackReach,
        CalculationKind::Stem,
    ];

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationKind::XyPosition => "xy-position",
            CalculationKind::PositionSimulator => "position-simulator",
            CalculationKind::Seatpost => "seatpost",
            CalculationKind::StackReach => "stack-reach",
            CalculationKind::Stem => "stem",
        }
    }
}

impl FromStr for CalculationKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CalcError::UnknownCalculationKind { kind: s.to_string() })
    }
}

impl fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incoming request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub calculation_kind: String,
    #[serde(default)]
    pub data: Value,
}

impl Request {
    pub fn new(kind: CalculationKind, data: Value) -> Self {
        Request {
            calculation_kind: kind.as_str().to_string(),
            data,
        }
    }

    pub fn from_json(input: &str) -> Result<Self, CalcError> {
        serde_json::from_str(input).map_err(|source| CalcError::MalformedRequest { source })
    }

    pub fn kind(&self) -> Result<CalculationKind, CalcError> {
        self.calculation_kind.parse()
    }

    /// Decode the payload into its typed calculation.
    pub fn calculation(&self) -> Result<Calculation, CalcError> {
        Calculation::decode(self.kind()?, &self.data)
    }
}

/// A calculation ready to run.
#[enum_dispatch]
pub trait Calculate {
    /// Compute the `result` object. Missing inputs become placeholders;
    /// this only fails if the result cannot be encoded.
    fn calculate(&self) -> Result<Value, CalcError>;
}

/// Typed payload for each calculation kind.
#[enum_dispatch(Calculate)]
#[derive(Debug, Clone, PartialEq)]
pub enum Calculation {
    XyPosition(XyPosition),
    PositionSimulator(PositionSimulator),
    Seatpost(Seatpost),
    StackReach(StackReach),
    Stem(StemComparison),
}

impl Calculation {
    pub fn decode(kind: CalculationKind, data: &Value) -> Result<Self, CalcError> {
        Ok(match kind {
            CalculationKind::XyPosition => Calculation::XyPosition(payload(kind, data)?),
            CalculationKind::PositionSimulator => Calculation::PositionSimulator(payload(kind, data)?),
            CalculationKind::Seatpost => Calculation::Seatpost(payload(kind, data)?),
            CalculationKind::StackReach => Calculation::StackReach(payload(kind, data)?),
            CalculationKind::Stem => Calculation::Stem(payload(kind, data)?),
        })
    }

    pub fn kind(&self) -> CalculationKind {
        match self {
            Calculation::XyPosition(_) => CalculationKind::XyPosition,
            Calculation::PositionSimulator(_) => CalculationKind::PositionSimulator,
            Calculation::Seatpost(_) => CalculationKind::Seatpost,
            Calculation::StackReach(_) => CalculationKind::StackReach,
            Calculation::Stem(_) => CalculationKind::Stem,
        }
    }
}

/// Decode `data` for `kind`. Absent or null data is an empty object.
fn payload<T: DeserializeOwned>(kind: CalculationKind, data: &Value) -> Result<T, CalcError> {
    let invalid = |source| CalcError::InvalidPayload { kind: kind.as_str(), source };
    let object = match data {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        other => {
            return Err(invalid(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_type(other)
            ))));
        }
    };
    serde_json::from_value(Value::Object(object)).map_err(invalid)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Value, CalcError> {
    serde_json::to_value(value).map_err(|source| CalcError::Encode { source })
}

/// Outgoing response: `{ success: true, result }` or `{ success: false, error }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(result: Value) -> Self {
        Response { success: true, result: Some(result), error: None }
    }

    pub fn failure(error: &CalcError) -> Self {
        Response { success: false, result: None, error: Some(error.to_string()) }
    }

    pub fn from_result(result: Result<Value, CalcError>) -> Self {
        match result {
            Ok(value) => Response::ok(value),
            Err(err) => Response::failure(&err),
        }
    }
}

/// Run a request, keeping the typed error.
pub fn evaluate(request: &Request) -> Result<Value, CalcError> {
    let calculation = request.calculation().inspect_err(|err| {
        if matches!(err, CalcError::UnknownCalculationKind { .. }) {
            warn!(error = %err, "unknown calculation kind");
        }
    })?;
    debug!(kind = %calculation.kind(), "running calculation");
    calculation.calculate()
}

/// Run a request and shape the response.
pub fn handle(request: &Request) -> Response {
    Response::from_result(evaluate(request))
}

/// Parse, run and shape the response. Never panics on bad input.
pub fn handle_json(input: &str) -> Response {
    Response::from_result(Request::from_json(input).and_then(|request| evaluate(&request)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names_round_trip() {
        for kind in CalculationKind::ALL {
            assert_eq!(kind.as_str().parse::<CalculationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = "saddle-height".parse::<CalculationKind>().unwrap_err();
        assert!(matches!(err, CalcError::UnknownCalculationKind { ref kind } if kind == "saddle-height"));
        assert_eq!(err.to_string(), "unknown calculation kind: saddle-height");
    }

    #[test]
    fn evaluate_keeps_unknown_kind_typed() {
        let request: Request =
            serde_json::from_value(json!({"calculationKind": "frame-size", "data": {}})).unwrap();
        let err = evaluate(&request).unwrap_err();
        assert!(matches!(err, CalcError::UnknownCalculationKind { ref kind } if kind == "frame-size"));
    }

    #[test]
    fn kind_match_is_exact() {
        assert!("XY-Position".parse::<CalculationKind>().is_err());
        assert!(" stem".parse::<CalculationKind>().is_err());
    }

    #[test]
    fn missing_data_is_empty_payload() {
        let request: Request = serde_json::from_value(json!({"calculationKind": "xy-position"})).unwrap();
        let calc = request.calculation().unwrap();
        assert_eq!(calc.kind(), CalculationKind::XyPosition);
    }

    #[test]
    fn non_object_data_is_rejected() {
        let request = Request::new(CalculationKind::Seatpost, json!([1, 2, 3]));
        let err = request.calculation().unwrap_err();
        assert!(matches!(err, CalcError::InvalidPayload { kind: "seatpost", .. }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn malformed_json_fails_softly() {
        let response = handle_json("{not json");
        assert!(!response.success);
        assert!(response.result.is_none());
        assert!(response.error.unwrap().starts_with("malformed request"));
    }

    #[test]
    fn decoded_calculation_dispatches() {
        let calc = Calculation::decode(
            CalculationKind::XyPosition,
            &json!({"reach": 380, "stack": 560, "headTubeAngle": 73}),
        )
        .unwrap();
        let result = calc.calculate().unwrap();
        assert_eq!(result, json!({"handlebarX": 464, "handlebarY": 627}));
    }
}
