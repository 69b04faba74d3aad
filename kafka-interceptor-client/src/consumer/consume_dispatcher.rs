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

use std::error::Error;
use std::sync::Arc;

use cheetah_string::CheetahString;
use kafka_interceptor_common::common::ModelProperties;
use kafka_interceptor_error::InterceptorError;
use tracing::debug;
use tracing::trace;

use crate::base::consumer_record::ConsumerRecord;
use crate::consumer::consume_state::ConsumeState;
use crate::consumer::listener_invocation::HandlerInvocation;
use crate::consumer::listener_invocation::ListenerInvocation;
use crate::event::consumer_event::ConsumerEvent;
use crate::hook::interceptor_registry::InterceptorChain;
use crate::utils::kafka_helper;
use crate::utils::payload_parser::JsonPayloadParser;
use crate::utils::payload_parser::PayloadParser;

/// Wraps single listener calls with the consumer interceptor chain.
///
/// The dispatcher never spawns or defers: hooks and the listener all run on the calling thread,
/// one after another, so thread-local state set by a `before_consume` hook is visible to the
/// listener and to the after hooks.
///
/// Error contract:
/// - a listener error is handed to every `after_error_consume` hook and then returned as-is;
/// - a failing `before_consume` hook stops the chain, the listener is not called, the failure
///   goes through `after_error_consume` and is returned converted into the listener's error type;
/// - failures of after hooks are logged by the chain and never replace the listener's outcome.
pub struct ConsumeDispatcher {
    chain: InterceptorChain,
    parser: Arc<dyn PayloadParser>,
    trace_field_name: CheetahString,
}

impl ConsumeDispatcher {
    pub fn new(chain: InterceptorChain, model: &ModelProperties) -> Self {
        Self::with_parser(
            chain,
            Arc::new(JsonPayloadParser),
            CheetahString::from_slice(&model.trace_field_name),
        )
    }

    pub fn with_parser(
        chain: InterceptorChain,
        parser: Arc<dyn PayloadParser>,
        trace_field_name: impl Into<CheetahString>,
    ) -> Self {
        Self {
            chain,
            parser,
            trace_field_name: trace_field_name.into(),
        }
    }

    #[inline]
    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    #[inline]
    pub fn trace_field_name(&self) -> &CheetahString {
        &self.trace_field_name
    }

    /// Builds the event interceptors will see for `record`.
    pub fn build_event(&self, record: &ConsumerRecord) -> ConsumerEvent {
        let event_id = kafka_helper::get_event_id(
            record.value().as_str(),
            self.parser.as_ref(),
            self.trace_field_name.as_str(),
        );
        kafka_helper::to_consumer_event(record, event_id)
    }

    /// Runs `invocation` through the chain.
    ///
    /// Returns `Ok(None)` when an interceptor cancelled the call, `Ok(Some(_))` with the
    /// listener's own value otherwise. Invocations that are not listener calls, or that carry no
    /// record, are proceeded directly.
    pub fn invoke<I>(&self, invocation: I) -> Result<Option<I::Output>, I::Error>
    where
        I: ListenerInvocation,
        I::Error: Error + From<InterceptorError> + 'static,
    {
        if !invocation.is_listener() {
            return invocation.proceed().map(Some);
        }
        let event = invocation.consumer_record().map(|record| self.build_event(record));
        let Some(event) = event else {
            return invocation.proceed().map(Some);
        };

        match self.chain.fire_before_consume(&event) {
            Ok(false) => {}
            Ok(true) => {
                transition(&event, ConsumeState::Entry, ConsumeState::Cancelled);
                return Ok(None);
            }
            Err(e) => {
                transition(&event, ConsumeState::Entry, ConsumeState::Failed);
                let err = I::Error::from(e);
                self.chain.fire_after_error_consume(&event, &err);
                return Err(err);
            }
        }

        transition(&event, ConsumeState::Entry, ConsumeState::Running);
        match invocation.proceed() {
            Ok(output) => {
                transition(&event, ConsumeState::Running, ConsumeState::Succeeded);
                self.chain.fire_after_success_consume(&event);
                Ok(Some(output))
            }
            Err(err) => {
                transition(&event, ConsumeState::Running, ConsumeState::Failed);
                self.chain.fire_after_error_consume(&event, &err);
                Err(err)
            }
        }
    }

    /// Decorator form of [`invoke`](Self::invoke) for a listener closure and its record.
    pub fn consume<R, E, F>(&self, record: &ConsumerRecord, handler: F) -> Result<Option<R>, E>
    where
        F: FnOnce(&ConsumerRecord) -> Result<R, E>,
        E: Error + From<InterceptorError> + 'static,
    {
        self.invoke(HandlerInvocation::listener(record, || handler(record)))
    }
}

#[inline]
fn transition(event: &ConsumerEvent, from: ConsumeState, to: ConsumeState) {
    if to.is_terminal() {
        debug!(
            "consume of {}-{}@{} [{}] finished {}",
            event.topic(),
            event.partition(),
            event.offset(),
            event.event_id(),
            to
        );
    } else {
        trace!(
            "{}-{}@{} [{}] {} -> {}",
            event.topic(),
            event.partition(),
            event.offset(),
            event.event_id(),
            from,
            to
        );
    }
}
