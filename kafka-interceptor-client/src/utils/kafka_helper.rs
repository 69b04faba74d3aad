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

use cheetah_string::CheetahString;
use serde_json::Value;
use tracing::debug;

use crate::base::consumer_record::ConsumerRecord;
use crate::event::consumer_event::ConsumerEvent;
use crate::utils::payload_parser::PayloadParser;

/// Copies a delivered record into a consumer event carrying `event_id`.
pub fn to_consumer_event(record: &ConsumerRecord, event_id: CheetahString) -> ConsumerEvent {
    ConsumerEvent::builder()
        .event_id(event_id)
        .key_opt(record.key().cloned())
        .value(record.value().clone())
        .topic(record.topic().clone())
        .partition(record.partition())
        .offset(record.offset())
        .headers(record.headers().clone())
        .build()
}

/// Reads `field_name` out of the payload and returns it as text.
///
/// String values are returned verbatim and numbers as their decimal text. Anything else,
/// including a payload that does not parse, yields an empty id. This never fails.
pub fn get_event_id(payload: &str, parser: &dyn PayloadParser, field_name: &str) -> CheetahString {
    if payload.is_empty() || field_name.is_empty() {
        return CheetahString::empty();
    }
    let map = match parser.parse(payload) {
        Ok(map) => map,
        Err(e) => {
            debug!("cannot read event id field '{}' from payload: {}", field_name, e);
            return CheetahString::empty();
        }
    };
    match map.get(field_name) {
        Some(Value::String(id)) => CheetahString::from_slice(id),
        Some(Value::Number(id)) => CheetahString::from_string(id.to_string()),
        _ => CheetahString::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::payload_parser::JsonPayloadParser;

    #[test]
    fn event_id_from_string_field() {
        let id = get_event_id(r#"{"traceId":"abc123"}"#, &JsonPayloadParser, "traceId");
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn event_id_from_number_field() {
        let id = get_event_id(r#"{"traceId":42}"#, &JsonPayloadParser, "traceId");
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn malformed_payload_yields_empty_id() {
        assert!(get_event_id("not-json", &JsonPayloadParser, "traceId").is_empty());
    }

    #[test]
    fn missing_field_yields_empty_id() {
        assert!(get_event_id(r#"{"other":"x"}"#, &JsonPayloadParser, "traceId").is_empty());
    }

    #[test]
    fn incompatible_field_yields_empty_id() {
        assert!(get_event_id(r#"{"traceId":{"a":1}}"#, &JsonPayloadParser, "traceId").is_empty());
        assert!(get_event_id(r#"{"traceId":null}"#, &JsonPayloadParser, "traceId").is_empty());
        assert!(get_event_id(r#"{"traceId":true}"#, &JsonPayloadParser, "traceId").is_empty());
    }

    #[test]
    fn empty_payload_yields_empty_id() {
        assert!(get_event_id("", &JsonPayloadParser, "traceId").is_empty());
    }

    #[test]
    fn consumer_event_copies_record() {
        let record = ConsumerRecord::new("orders", 1, 7, r#"{"traceId":"t"}"#)
            .with_key("k")
            .with_header("h", "v");
        let event = to_consumer_event(&record, CheetahString::from("t"));

        assert_eq!(event.event_id().as_str(), "t");
        assert_eq!(event.topic(), record.topic());
        assert_eq!(event.partition(), 1);
        assert_eq!(event.offset(), 7);
        assert_eq!(event.key(), record.key());
        assert_eq!(event.value(), record.value());
        assert_eq!(event.headers(), record.headers());
    }
}
