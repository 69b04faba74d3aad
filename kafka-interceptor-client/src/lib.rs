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

#![allow(clippy::result_large_err)]

//! Interceptor chain around single-message Kafka listener and producer calls.
//!
//! A [`ConsumeDispatcher`](consumer::consume_dispatcher::ConsumeDispatcher) wraps one listener
//! invocation: it builds a [`ConsumerEvent`](event::consumer_event::ConsumerEvent), runs the
//! ordered `before_consume` hooks (any of which may cancel the call), runs the handler and then
//! the success or error hooks. The producer side mirrors this without cancellation.

pub mod base;
pub mod consumer;
pub mod event;
pub mod hook;
pub mod producer;
pub mod trace;
pub mod utils;

pub use crate::base::consumer_record::ConsumerRecord;
pub use crate::consumer::consume_dispatcher::ConsumeDispatcher;
pub use crate::event::consumer_event::ConsumerEvent;
pub use crate::event::producer_event::ProducerEvent;
pub use crate::hook::consumer_interceptor::ConsumerInterceptor;
pub use crate::hook::interceptor_registry::InterceptorChain;
pub use crate::hook::interceptor_registry::InterceptorRegistry;
pub use crate::hook::producer_interceptor::ProducerInterceptor;
pub use crate::producer::kafka_producer::KafkaProducer;
pub use crate::producer::send_dispatcher::SendDispatcher;
