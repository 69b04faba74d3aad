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

/// One inbound message occurrence, as seen by consumer interceptors.
///
/// Built once per delivered message and read-only afterwards. Fields left unset on the
/// builder default to empty strings and zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerEvent {
    event_id: CheetahString,
    key: Option<CheetahString>,
    value: CheetahString,
    topic: CheetahString,
    partition: i32,
    offset: i64,
    headers: HashMap<CheetahString, CheetahString>,
}

impl ConsumerEvent {
    #[must_use]
    pub fn builder() -> ConsumerEventBuilder {
        ConsumerEventBuilder::default()
    }

    #[inline]
    pub fn event_id(&self) -> &CheetahString {
        &self.event_id
    }

    #[inline]
    pub fn key(&self) -> Option<&CheetahString> {
        self.key.as_ref()
    }

    #[inline]
    pub fn value(&self) -> &CheetahString {
        &self.value
    }

    #[inline]
    pub fn topic(&self) -> &CheetahString {
        &self.topic
    }

    #[inline]
    pub fn partition(&self) -> i32 {
        self.partition
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    #[inline]
    pub fn headers(&self) -> &HashMap<CheetahString, CheetahString> {
        &self.headers
    }

    #[inline]
    pub fn header(&self, name: &str) -> Option<&CheetahString> {
        self.headers.get(name)
    }
}

#[derive(Debug, Default)]
pub struct ConsumerEventBuilder {
    event_id: Option<CheetahString>,
    key: Option<CheetahString>,
    value: Option<CheetahString>,
    topic: Option<CheetahString>,
    partition: Option<i32>,
    offset: Option<i64>,
    headers: HashMap<CheetahString, CheetahString>,
}

impl ConsumerEventBuilder {
    #[inline]
    pub fn event_id(mut self, event_id: impl Into<CheetahString>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    #[inline]
    pub fn key(mut self, key: impl Into<CheetahString>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[inline]
    pub fn key_opt(mut self, key: Option<CheetahString>) -> Self {
        self.key = key;
        self
    }

    #[inline]
    pub fn value(mut self, value: impl Into<CheetahString>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[inline]
    pub fn topic(mut self, topic: impl Into<CheetahString>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    #[inline]
    pub fn partition(mut self, partition: i32) -> Self {
        self.partition = Some(partition);
        self
    }

    #[inline]
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[inline]
    pub fn header(mut self, name: impl Into<CheetahString>, value: impl Into<CheetahString>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn headers(mut self, headers: HashMap<CheetahString, CheetahString>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn build(self) -> ConsumerEvent {
        ConsumerEvent {
            event_id: self.event_id.unwrap_or_default(),
            key: self.key,
            value: self.value.unwrap_or_default(),
            topic: self.topic.unwrap_or_default(),
            partition: self.partition.unwrap_or_default(),
            offset: self.offset.unwrap_or_default(),
            headers: self.headers,
        }
    }
}
