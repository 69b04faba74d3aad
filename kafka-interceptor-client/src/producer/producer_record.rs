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
use kafka_interceptor_error::InterceptorError;
use kafka_interceptor_error::SerializationError;

use crate::event::producer_event::ProducerEvent;

/// The serialized form of a producer event, ready for the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerRecord {
    pub topic: CheetahString,
    pub key: Option<CheetahString>,
    pub value: CheetahString,
    pub headers: HashMap<CheetahString, CheetahString>,
}

impl TryFrom<&ProducerEvent> for ProducerRecord {
    type Error = InterceptorError;

    fn try_from(event: &ProducerEvent) -> Result<Self, Self::Error> {
        let value = serde_json::to_string(event.value())
            .map_err(|e| SerializationError::encode_failed("json", e.to_string()))?;
        Ok(Self {
            topic: event.topic().clone(),
            key: event.key().cloned(),
            value: CheetahString::from_string(value),
            headers: event.headers().clone(),
        })
    }
}
