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

use std::collections::HashMap;

use cheetah_string::CheetahString;
use serde_json::Value;

use crate::trace::trace_constants::TraceConstants;

/// The propagated part of a span: enough to continue it in another process.
///
/// Ids travel as 16-digit lowercase hex strings under B3-style keys, both in message headers
/// and inside JSON payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanContext {
    pub trace_id: u64,
    pub span_id: u64,
    pub parent_id: Option<u64>,
    pub name: CheetahString,
    pub process_id: Option<CheetahString>,
    pub sampled: bool,
}

impl SpanContext {
    /// A new trace with a single root span.
    pub fn new_root(name: impl Into<CheetahString>) -> Self {
        let trace_id = rand::random::<u64>();
        Self {
            trace_id,
            span_id: trace_id,
            parent_id: None,
            name: name.into(),
            process_id: None,
            sampled: true,
        }
    }

    /// A new span in the same trace, parented on `self`.
    pub fn child(&self, name: impl Into<CheetahString>) -> Self {
        Self {
            trace_id: self.trace_id,
            span_id: rand::random::<u64>(),
            parent_id: Some(self.span_id),
            name: name.into(),
            process_id: self.process_id.clone(),
            sampled: self.sampled,
        }
    }

    pub fn to_map(&self) -> HashMap<CheetahString, CheetahString> {
        let mut map = HashMap::with_capacity(6);
        map.insert(
            CheetahString::from_static_str(TraceConstants::TRACE_ID),
            CheetahString::from_string(to_hex(self.trace_id)),
        );
        map.insert(
            CheetahString::from_static_str(TraceConstants::SPAN_ID),
            CheetahString::from_string(to_hex(self.span_id)),
        );
        if let Some(parent_id) = self.parent_id {
            map.insert(
                CheetahString::from_static_str(TraceConstants::PARENT_ID),
                CheetahString::from_string(to_hex(parent_id)),
            );
        }
        map.insert(CheetahString::from_static_str(TraceConstants::SPAN_NAME), self.name.clone());
        if let Some(process_id) = &self.process_id {
            map.insert(
                CheetahString::from_static_str(TraceConstants::PROCESS_ID),
                process_id.clone(),
            );
        }
        map.insert(
            CheetahString::from_static_str(TraceConstants::SAMPLED),
            CheetahString::from_static_str(if self.sampled { "1" } else { "0" }),
        );
        map
    }

    /// Reads a span from message headers. Returns `None` unless both ids are present and valid.
    pub fn from_headers(headers: &HashMap<CheetahString, CheetahString>) -> Option<Self> {
        Self::from_lookup(|key| headers.get(key).map(|v| v.as_str()))
    }

    /// Reads a span from a JSON object whose values are strings.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Self::from_lookup(|key| object.get(key).and_then(Value::as_str))
    }

    fn from_lookup<'a>(get: impl Fn(&str) -> Option<&'a str>) -> Option<Self> {
        let trace_id = from_hex(get(TraceConstants::TRACE_ID)?)?;
        let span_id = from_hex(get(TraceConstants::SPAN_ID)?)?;
        Some(Self {
            trace_id,
            span_id,
            parent_id: get(TraceConstants::PARENT_ID).and_then(from_hex),
            name: get(TraceConstants::SPAN_NAME)
                .map(CheetahString::from_slice)
                .unwrap_or_default(),
            process_id: get(TraceConstants::PROCESS_ID).map(CheetahString::from_slice),
            sampled: get(TraceConstants::SAMPLED).is_none_or(|s| s == "1" || s.eq_ignore_ascii_case("true")),
        })
    }
}

fn to_hex(id: u64) -> String {
    format!("{id:016x}")
}

fn from_hex(value: &str) -> Option<u64> {
    u64::from_str_radix(value, 16).ok()
}
