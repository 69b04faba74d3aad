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

//! # Tracing Pipeline
//!
//! Wires a producer and a listener through the same interceptor chain:
//! - `LogInterceptor` logs every lifecycle point
//! - `SpanInterceptor` carries the producer's span into the listener
//! - `DuplicateFilter` cancels messages whose event id was already handled
//!
//! Run with `cargo run --example tracing-pipeline`; set `KAFKA_INTERCEPTOR__MODEL__TRACE_FIELD_NAME`
//! to read the event id from another payload field.

use std::collections::HashSet;
use std::sync::Arc;

use cheetah_string::CheetahString;
use kafka_interceptor_client::hook::log_interceptor::LogInterceptor;
use kafka_interceptor_client::producer::message_sender::MessageSender;
use kafka_interceptor_client::producer::producer_record::ProducerRecord;
use kafka_interceptor_client::producer::send_result::SendResult;
use kafka_interceptor_client::trace::span_interceptor::SpanInterceptor;
use kafka_interceptor_client::trace::tracer::ThreadLocalTracer;
use kafka_interceptor_client::trace::tracer::Tracer;
use kafka_interceptor_client::ConsumeDispatcher;
use kafka_interceptor_client::ConsumerEvent;
use kafka_interceptor_client::ConsumerInterceptor;
use kafka_interceptor_client::ConsumerRecord;
use kafka_interceptor_client::InterceptorRegistry;
use kafka_interceptor_client::KafkaProducer;
use kafka_interceptor_common::common::InterceptorProperties;
use kafka_interceptor_common::common::LoggingProperties;
use kafka_interceptor_error::InterceptorError;
use kafka_interceptor_error::InterceptorResult;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

pub const TOPIC: &str = "PaymentTopic";

#[derive(Serialize)]
struct Payment {
    #[serde(rename = "traceId")]
    trace_id: &'static str,
    amount: u64,
}

#[derive(Default)]
struct LocalBroker {
    log: Mutex<Vec<ProducerRecord>>,
}

impl MessageSender for LocalBroker {
    async fn send(&self, record: ProducerRecord) -> InterceptorResult<SendResult> {
        let mut log = self.log.lock();
        log.push(record.clone());
        Ok(SendResult::new(record.topic, 0, log.len() as i64 - 1))
    }
}

impl LocalBroker {
    fn poll(&self) -> Vec<ConsumerRecord> {
        self.log
            .lock()
            .iter()
            .enumerate()
            .map(|(offset, sent)| {
                sent.headers.iter().fold(
                    ConsumerRecord::new(sent.topic.clone(), 0, offset as i64, sent.value.clone()),
                    |record, (name, value)| record.with_header(name.clone(), value.clone()),
                )
            })
            .collect()
    }
}

/// Cancels any message whose event id has been seen before.
#[derive(Default)]
struct DuplicateFilter {
    seen: Mutex<HashSet<CheetahString>>,
}

impl ConsumerInterceptor for DuplicateFilter {
    fn interceptor_name(&self) -> &str {
        "DuplicateFilter"
    }

    fn before_consume(&self, event: &ConsumerEvent) -> InterceptorResult<bool> {
        if event.event_id().is_empty() {
            return Ok(false);
        }
        Ok(!self.seen.lock().insert(event.event_id().clone()))
    }
}

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> InterceptorResult<()> {
    kafka_interceptor_common::log::init_logger()?;

    let mut properties = InterceptorProperties::from_file_and_env("interceptor.toml")?;
    if properties.logging == LoggingProperties::default() {
        properties.logging = LoggingProperties::all();
    }

    let tracer = Arc::new(ThreadLocalTracer);
    let mut registry = InterceptorRegistry::new();
    registry
        .register_interceptor(LogInterceptor::new(properties.logging.clone()))
        .register_interceptor(SpanInterceptor::new(tracer.clone(), &properties.model))
        .register_consumer_interceptor(DuplicateFilter::default());
    let chain = registry.build();

    let producer = KafkaProducer::new(chain.clone(), LocalBroker::default());
    let dispatcher = ConsumeDispatcher::new(chain, &properties.model);

    tracer.start_span("checkout");
    for trace_id in ["pay-1", "pay-2", "pay-1"] {
        let result = producer
            .send(TOPIC, None, &Payment { trace_id, amount: 100 })
            .await?;
        info!("sent {}", result);
    }
    tracer.detach_span();

    for record in producer.sender().poll() {
        let handled = dispatcher.consume(&record, |record| {
            let span = tracer.current_span().map(|span| format!("{:016x}", span.trace_id));
            info!("handling offset {} in trace {:?}", record.offset(), span);
            Ok::<_, InterceptorError>(record.offset())
        })?;
        match handled {
            Some(offset) => info!("offset {} handled", offset),
            None => info!("offset {} skipped as duplicate", record.offset()),
        }
    }
    Ok(())
}
