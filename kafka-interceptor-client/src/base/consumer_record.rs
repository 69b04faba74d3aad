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

/// A message as delivered by the messaging client, before any listener sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerRecord {
    topic: CheetahString,
    partition: i32,
    offset: i64,
    key: Option<CheetahString>,
    value: CheetahString,
    headers: HashMap<CheetahString, CheetahString>,
}

impl ConsumerRecord {
    pub fn new(
        topic: impl Into<CheetahString>,
        partition: i32,
        offset: i64,
        value: impl Into<CheetahString>,
    ) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            key: None,
            value: value.into(),
            headers: HashMap::new(),
        }
    }

    #[inline]
    pub fn with_key(mut self, key: impl Into<CheetahString>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[inline]
    pub fn with_header(mut self, name: impl Into<CheetahString>, value: impl Into<CheetahString>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
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
    pub fn key(&self) -> Option<&CheetahString> {
        self.key.as_ref()
    }

    #[inline]
    pub fn value(&self) -> &CheetahString {
        &self.value
    }

    #[inline]
    pub fn headers(&self) -> &HashMap<CheetahString, CheetahString> {
        &self.headers
    }
}
