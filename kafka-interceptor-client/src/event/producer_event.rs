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

/// One outbound message about to be sent.
///
/// Only the headers can change after construction; `before_send` hooks use them to attach
/// correlation metadata before the value is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerEvent {
    key: Option<CheetahString>,
    value: Value,
    topic: CheetahString,
    headers: HashMap<CheetahString, CheetahString>,
}

impl ProducerEvent {
    pub fn new(topic: impl Into<CheetahString>, key: Option<CheetahString>, value: Value) -> Self {
        Self {
            key,
            value,
            topic: topic.into(),
            headers: HashMap::new(),
        }
    }

    #[inline]
    pub fn with_header(mut self, name: impl Into<CheetahString>, value: impl Into<CheetahString>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn key(&self) -> Option<&CheetahString> {
        self.key.as_ref()
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn topic(&self) -> &CheetahString {
        &self.topic
    }

    #[inline]
    pub fn headers(&self) -> &HashMap<CheetahString, CheetahString> {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HashMap<CheetahString, CheetahString> {
        &mut self.headers
    }

    pub fn put_header(&mut self, name: impl Into<CheetahString>, value: impl Into<CheetahString>) {
        self.headers.insert(name.into(), value.into());
    }
}
