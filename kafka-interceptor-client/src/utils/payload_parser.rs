// Copyright 2023 The Kafka Interceptor Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use kafka_interceptor_error::InterceptorResult;
use kafka_interceptor_error::SerializationError;
use serde_json::Map;
use serde_json::Value;

/// Turns a raw payload into a generic field map.
pub trait PayloadParser: Send + Sync {
    fn parse(&self, raw: &str) -> InterceptorResult<Map<String, Value>>;
}

/// Parses payloads as JSON objects. Valid JSON that is not an object is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPayloadParser;

impl PayloadParser for JsonPayloadParser {
    fn parse(&self, raw: &str) -> InterceptorResult<Map<String, Value>> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(SerializationError::invalid_format("json object", json_kind(&other)).into()),
            Err(e) => Err(SerializationError::decode_failed("json", e.to_string()).into()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
