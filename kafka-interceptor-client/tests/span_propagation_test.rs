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

//! End-to-end propagation of a span from a producer to a listener.

use std::sync::Arc;

use cheetah_string::CheetahString;
use kafka_interceptor_client::hook::log_interceptor::LogInterceptor;
use kafka_interceptor_client::producer::message_sender::MessageSender;
use kafka_interceptor_client::producer::producer_record::ProducerRecord;
use kafka_interceptor_client::producer::send_result::SendResult;
use kafka_interceptor_client::trace::span_context::SpanContext;
use kafka_interceptor_client::trace::span_interceptor::SpanInterceptor;
use kafka_interceptor_client::trace::tracer::ThreadLocalTracer;
use kafka_interceptor_client::trace::tracer::Tracer;
use kafka_interceptor_client::ConsumeDispatcher;
use kafka_interceptor_client::ConsumerEvent;
use kafka_interceptor_client::ConsumerInterceptor;
use kafka_interceptor_client::ConsumerRecord;
use kafka_interceptor_client::InterceptorChain;
use kafka_interceptor_client::InterceptorRegistry;
use kafka_interceptor_client::KafkaProducer;
use kafka_interceptor_common::common::InterceptorProperties;
use kafka_interceptor_common::common::LoggingProperties;
use kafka_interceptor_error::InterceptorError;
use kafka_interceptor_error::InterceptorResult;
use parking_lot::Mutex;
use serde_json::json;

#[derive(Default)]
struct Broker {
    log: Mutex<Vec<ProducerRecord>>,
}

impl MessageSender for Broker {
    async fn send(&self, record: ProducerRecord) -> InterceptorResult<SendResult> {
        let mut log = self.log.lock();
        log.push(record.clone());
        Ok(SendResult::new(record.topic, 0, log.len() as i64 - 1))
    }
}

impl Broker {
    fn deliver(&self, offset: usize) -> ConsumerRecord {
        let log = self.log.lock();
        let sent = &log[offset];
        let mut record = ConsumerRecord::new(sent.topic.clone(), 0, offset as i64, sent.value.clone());
        if let Some(key) = &sent.key {
            record = record.with_key(key.clone());
        }
        for (name, value) in &sent.headers {
            record = record.with_header(name.clone(), value.clone());
        }
        record
    }
}

fn chain(tracer: Arc<ThreadLocalTracer>) -> InterceptorChain {
    let mut properties = InterceptorProperties::default();
    properties.logging = LoggingProperties::all();

    let mut registry = InterceptorRegistry::new();
    registry
        .register_interceptor(LogInterceptor::new(properties.logging.clone()))
        .register_interceptor(SpanInterceptor::new(tracer, &properties.model));
    registry.build()
}

#[tokio::test]
async fn span_flows_from_producer_to_listener() {
    let tracer = Arc::new(ThreadLocalTracer);
    let chain = chain(tracer.clone());
    let producer = KafkaProducer::new(chain.clone(), Broker::default());
    let dispatcher = ConsumeDispatcher::new(chain, &InterceptorProperties::default().model);

    let checkout = tracer.start_span("checkout");
    let result = producer
        .send(
            "orders",
            Some(CheetahString::from("order-1")),
            &json!({"traceId": "abc123", "amount": 10}),
        )
        .await
        .unwrap();
    assert_eq!(result.offset, 0);
    assert_eq!(tracer.detach_span(), Some(checkout.clone()));
    assert!(tracer.current_span().is_none());

    let record = producer.sender().deliver(0);
    let seen = dispatcher
        .consume(&record, |record| {
            assert_eq!(record.key().map(|k| k.as_str()), Some("order-1"));
            Ok::<_, InterceptorError>(tracer.current_span())
        })
        .unwrap()
        .flatten();

    assert_eq!(seen, Some(checkout));
    assert!(tracer.current_span().is_none());
}

#[tokio::test]
async fn span_is_detached_when_listener_fails() {
    let tracer = Arc::new(ThreadLocalTracer);
    let chain = chain(tracer.clone());
    let producer = KafkaProducer::new(chain.clone(), Broker::default());
    let dispatcher = ConsumeDispatcher::new(chain, &InterceptorProperties::default().model);

    tracer.start_span("checkout");
    producer.send("orders", None, &json!({"amount": 10})).await.unwrap();
    tracer.detach_span();

    let record = producer.sender().deliver(0);
    let result = dispatcher.consume(&record, |_| {
        assert!(tracer.current_span().is_some());
        Err::<(), _>(InterceptorError::internal("listener crashed"))
    });

    assert!(matches!(result, Err(InterceptorError::Internal(_))));
    assert!(tracer.current_span().is_none());
}

#[test]
fn span_embedded_in_payload_is_continued() {
    let tracer = Arc::new(ThreadLocalTracer);
    let dispatcher = ConsumeDispatcher::new(chain(tracer.clone()), &InterceptorProperties::default().model);
    let upstream = SpanContext::new_root("legacy-producer");
    let payload = json!({"traceId": "t-1", "span": upstream.to_map()}).to_string();
    let record = ConsumerRecord::new("orders", 0, 0, payload);

    let seen = dispatcher
        .consume(&record, |_| Ok::<_, InterceptorError>(tracer.current_span()))
        .unwrap()
        .flatten();

    assert_eq!(seen.map(|span| span.trace_id), Some(upstream.trace_id));
    assert!(tracer.current_span().is_none());
}

#[tokio::test]
async fn send_without_current_span_adds_no_trace_headers() {
    let tracer = Arc::new(ThreadLocalTracer);
    let producer = KafkaProducer::new(chain(tracer), Broker::default());

    producer.send("orders", None, &json!({"amount": 1})).await.unwrap();

    let record = producer.sender().deliver(0);
    assert!(SpanContext::from_headers(record.headers()).is_none());
}

/// Cancels every message keyed `dup`.
struct DropDuplicates;

impl ConsumerInterceptor for DropDuplicates {
    fn before_consume(&self, event: &ConsumerEvent) -> InterceptorResult<bool> {
        Ok(event.key().is_some_and(|key| key.as_str() == "dup"))
    }
}

struct RejectAll;

impl ConsumerInterceptor for RejectAll {
    fn before_consume(&self, _event: &ConsumerEvent) -> InterceptorResult<bool> {
        Err(InterceptorError::interceptor_failed("RejectAll", "quota exceeded"))
    }
}

fn traced_record(offset: i64, key: &str, span: &SpanContext) -> ConsumerRecord {
    span.to_map().into_iter().fold(
        ConsumerRecord::new("orders", 0, offset, "{}").with_key(key),
        |record, (name, value)| record.with_header(name, value),
    )
}

#[test]
fn cancelled_consumes_do_not_accumulate_spans() {
    let tracer = Arc::new(ThreadLocalTracer);
    let mut registry = InterceptorRegistry::new();
    registry
        .register_consumer_interceptor(SpanInterceptor::new(tracer.clone(), &InterceptorProperties::default().model))
        .register_consumer_interceptor(DropDuplicates);
    let dispatcher = ConsumeDispatcher::new(registry.build(), &InterceptorProperties::default().model);

    for offset in 0..3 {
        let record = traced_record(offset, "dup", &SpanContext::new_root("upstream"));
        let result = dispatcher.consume(&record, |_| Ok::<_, InterceptorError>(()));
        assert_eq!(result.unwrap(), None);
        assert_eq!(tracer.depth(), 1);
    }

    let fresh = SpanContext::new_root("fresh");
    let record = traced_record(3, "order-1", &fresh);
    let seen = dispatcher
        .consume(&record, |_| Ok::<_, InterceptorError>((tracer.current_span(), tracer.depth())))
        .unwrap();

    assert_eq!(seen, Some((Some(fresh), 1)));
    assert_eq!(tracer.depth(), 0);
}

#[test]
fn failing_earlier_before_hook_keeps_host_span() {
    let tracer = Arc::new(ThreadLocalTracer);
    let mut registry = InterceptorRegistry::new();
    registry
        .register_consumer_interceptor(RejectAll)
        .register_consumer_interceptor(SpanInterceptor::new(tracer.clone(), &InterceptorProperties::default().model));
    let dispatcher = ConsumeDispatcher::new(registry.build(), &InterceptorProperties::default().model);

    let host = tracer.start_span("host-span");
    let record = traced_record(0, "order-1", &SpanContext::new_root("upstream"));
    let result = dispatcher.consume(&record, |_| Ok::<_, InterceptorError>(()));

    assert!(matches!(result, Err(InterceptorError::InterceptorFailed { .. })));
    assert_eq!(tracer.current_span(), Some(host));
    assert_eq!(tracer.depth(), 1);
    tracer.detach_span();
}
