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
use kafka_interceptor_error::InterceptorResult;
use kafka_interceptor_error::SerializationError;
use serde::Serialize;
use tracing::debug;

use crate::event::producer_event::ProducerEvent;
use crate::hook::interceptor_registry::InterceptorChain;
use crate::producer::message_sender::MessageSender;
use crate::producer::producer_record::ProducerRecord;
use crate::producer::send_result::SendResult;

/// Front-end that turns values into records and sends them through the producer chain.
pub struct KafkaProducer<S> {
    chain: InterceptorChain,
    sender: S,
}

impl<S> KafkaProducer<S>
where
    S: MessageSender,
{
    pub fn new(chain: InterceptorChain, sender: S) -> Self {
        Self { chain, sender }
    }

    #[inline]
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Serializes `value` to JSON and sends it to `topic`.
    pub async fn send<T>(
        &self,
        topic: impl Into<CheetahString>,
        key: Option<CheetahString>,
        value: &T,
    ) -> InterceptorResult<SendResult>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(|e| SerializationError::encode_failed("json", e.to_string()))?;
        self.send_event(ProducerEvent::new(topic, key, value)).await
    }

    pub async fn send_event(&self, mut event: ProducerEvent) -> InterceptorResult<SendResult> {
        self.chain.fire_before_send(&mut event)?;
        let record = ProducerRecord::try_from(&event)?;
        let result = self.sender.send(record).await?;
        debug!("message sent to {}", result);
        self.chain.fire_after_send(&event);
        Ok(result)
    }
}
