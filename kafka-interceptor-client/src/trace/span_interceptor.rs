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

use std::cell::RefCell;
use std::error::Error;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use cheetah_string::CheetahString;
use kafka_interceptor_common::common::ModelProperties;
use kafka_interceptor_error::InterceptorResult;
use tracing::debug;

use crate::event::consumer_event::ConsumerEvent;
use crate::event::producer_event::ProducerEvent;
use crate::hook::consumer_interceptor::ConsumerInterceptor;
use crate::hook::producer_interceptor::ProducerInterceptor;
use crate::trace::span_context::SpanContext;
use crate::trace::trace_constants::TraceConstants;
use crate::trace::tracer::Tracer;
use crate::utils::payload_parser::JsonPayloadParser;
use crate::utils::payload_parser::PayloadParser;

static NEXT_INTERCEPTOR_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    /// Ids of the span interceptors that continued a span on this thread and still owe a detach.
    static CONTINUED: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

fn mark_continued(id: u64) {
    CONTINUED.with(|continued| continued.borrow_mut().push(id));
}

fn take_continued(id: u64) -> bool {
    CONTINUED.with(|continued| {
        let mut continued = continued.borrow_mut();
        match continued.iter().rposition(|owner| *owner == id) {
            Some(index) => {
                continued.remove(index);
                true
            }
            None => false,
        }
    })
}

/// Carries the current span from producers to consumers.
///
/// On send the tracer's current span is written into the message headers. On consume the span
/// is read back from the headers, or from the payload's span field for messages produced by
/// clients that embed it in the body, and continued on the consuming thread until the listener
/// finished.
///
/// Only a span this interceptor continued on the calling thread is ever detached. A call cancelled
/// by a later interceptor gets no after hook, so its span is detached at the start of the next
/// `before_consume` on the same thread.
pub struct SpanInterceptor {
    id: u64,
    tracer: Arc<dyn Tracer>,
    parser: Arc<dyn PayloadParser>,
    span_field_name: CheetahString,
}

impl SpanInterceptor {
    pub fn new(tracer: Arc<dyn Tracer>, model: &ModelProperties) -> Self {
        Self::with_parser(
            tracer,
            Arc::new(JsonPayloadParser),
            CheetahString::from_slice(&model.span_field_name),
        )
    }

    pub fn with_parser(
        tracer: Arc<dyn Tracer>,
        parser: Arc<dyn PayloadParser>,
        span_field_name: impl Into<CheetahString>,
    ) -> Self {
        Self {
            id: NEXT_INTERCEPTOR_ID.fetch_add(1, Ordering::Relaxed),
            tracer,
            parser,
            span_field_name: span_field_name.into(),
        }
    }

    fn extract_span(&self, event: &ConsumerEvent) -> Option<SpanContext> {
        SpanContext::from_headers(event.headers()).or_else(|| {
            let payload = self.parser.parse(event.value().as_str()).ok()?;
            payload
                .get(self.span_field_name.as_str())
                .and_then(SpanContext::from_json)
        })
    }

    fn detach(&self) {
        if take_continued(self.id) {
            self.tracer.detach_span();
        }
    }
}

impl ProducerInterceptor for SpanInterceptor {
    fn interceptor_name(&self) -> &str {
        TraceConstants::SPAN_INTERCEPTOR
    }

    fn before_send(&self, event: &mut ProducerEvent) -> InterceptorResult<()> {
        if let Some(span) = self.tracer.current_span() {
            event.headers_mut().extend(span.to_map());
        }
        Ok(())
    }
}

impl ConsumerInterceptor for SpanInterceptor {
    fn interceptor_name(&self) -> &str {
        TraceConstants::SPAN_INTERCEPTOR
    }

    fn before_consume(&self, event: &ConsumerEvent) -> InterceptorResult<bool> {
        if take_continued(self.id) {
            debug!("detach span left by a cancelled consume on this thread");
            self.tracer.detach_span();
        }
        if let Some(span) = self.extract_span(event) {
            debug!(
                "continue span {:016x}/{:016x} for {}-{}@{}",
                span.trace_id,
                span.span_id,
                event.topic(),
                event.partition(),
                event.offset()
            );
            self.tracer.continue_span(span);
            mark_continued(self.id);
        }
        Ok(false)
    }

    fn after_success_consume(&self, _event: &ConsumerEvent) -> InterceptorResult<()> {
        self.detach();
        Ok(())
    }

    fn after_error_consume(&self, _event: &ConsumerEvent, _error: &(dyn Error + 'static)) -> InterceptorResult<()> {
        self.detach();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use mockall::predicate::eq;
    use serde_json::json;
    use serde_json::Value;

    use super::*;
    use crate::trace::tracer::MockTracer;

    const SPAN: &str = "span";

    fn span() -> SpanContext {
        SpanContext {
            trace_id: 234248923,
            span_id: 41841094,
            parent_id: None,
            name: CheetahString::from("name"),
            process_id: Some(CheetahString::from("processId")),
            sampled: true,
        }
    }

    fn interceptor(tracer: MockTracer) -> SpanInterceptor {
        SpanInterceptor::with_parser(Arc::new(tracer), Arc::new(JsonPayloadParser), SPAN)
    }

    #[test]
    fn before_send_without_current_span() {
        let mut tracer = MockTracer::new();
        tracer.expect_current_span().times(1).returning(|| None);
        let interceptor = interceptor(tracer);

        let mut event = ProducerEvent::new("orders", None, json!({"span": {"Test": "Test"}}));
        interceptor.before_send(&mut event).unwrap();
        assert!(event.headers().is_empty());
    }

    #[test]
    fn before_send_injects_current_span() {
        let mut tracer = MockTracer::new();
        tracer.expect_current_span().times(1).returning(|| Some(span()));
        let interceptor = interceptor(tracer);

        let mut event = ProducerEvent::new("orders", None, Value::Null);
        interceptor.before_send(&mut event).unwrap();
        assert_eq!(SpanContext::from_headers(event.headers()), Some(span()));
    }

    #[test]
    fn before_consume_continues_span_from_payload() {
        let payload = json!({ "span": span().to_map() }).to_string();
        let mut tracer = MockTracer::new();
        tracer
            .expect_continue_span()
            .with(eq(span()))
            .times(1)
            .return_const(());
        let interceptor = interceptor(tracer);

        let event = ConsumerEvent::builder().value(payload).build();
        assert!(!interceptor.before_consume(&event).unwrap());
    }

    #[test]
    fn before_consume_prefers_headers() {
        let mut header_span = span();
        header_span.span_id = 7;
        let mut builder = ConsumerEvent::builder().value(json!({ "span": span().to_map() }).to_string());
        for (name, value) in header_span.to_map() {
            builder = builder.header(name, value);
        }

        let mut tracer = MockTracer::new();
        tracer
            .expect_continue_span()
            .with(eq(header_span))
            .times(1)
            .return_const(());
        let interceptor = interceptor(tracer);

        assert!(!interceptor.before_consume(&builder.build()).unwrap());
    }

    #[test]
    fn no_span_means_no_tracer_calls() {
        let mut tracer = MockTracer::new();
        tracer.expect_continue_span().never();
        tracer.expect_detach_span().never();
        let interceptor = interceptor(tracer);

        let event = ConsumerEvent::builder().value("not-json").build();
        assert!(!interceptor.before_consume(&event).unwrap());
        interceptor.after_success_consume(&event).unwrap();
        interceptor
            .after_error_consume(&event, &io::Error::other("boom"))
            .unwrap();
    }

    #[test]
    fn after_hooks_detach_continued_span_once() {
        let mut tracer = MockTracer::new();
        tracer.expect_continue_span().times(1).return_const(());
        tracer.expect_detach_span().times(1).returning(|| Some(span()));
        let interceptor = interceptor(tracer);

        let event = ConsumerEvent::builder().headers(span().to_map()).build();
        assert!(!interceptor.before_consume(&event).unwrap());
        interceptor.after_success_consume(&event).unwrap();
        interceptor
            .after_error_consume(&event, &io::Error::other("boom"))
            .unwrap();
    }

    #[test]
    fn after_error_without_continue_leaves_tracer_alone() {
        let mut tracer = MockTracer::new();
        tracer.expect_detach_span().never();
        let interceptor = interceptor(tracer);

        let event = ConsumerEvent::builder().headers(span().to_map()).build();
        interceptor
            .after_error_consume(&event, &io::Error::other("earlier hook failed"))
            .unwrap();
    }

    #[test]
    fn span_left_by_cancelled_consume_is_detached_on_next_consume() {
        let mut tracer = MockTracer::new();
        tracer.expect_continue_span().times(2).return_const(());
        tracer.expect_detach_span().times(2).returning(|| Some(span()));
        let interceptor = interceptor(tracer);
        let event = ConsumerEvent::builder().headers(span().to_map()).build();

        // first consume cancelled downstream: no after hook
        assert!(!interceptor.before_consume(&event).unwrap());
        assert!(!interceptor.before_consume(&event).unwrap());
        interceptor.after_success_consume(&event).unwrap();
    }

    #[test]
    fn interceptors_track_their_own_spans() {
        let mut first = MockTracer::new();
        first.expect_continue_span().times(1).return_const(());
        first.expect_detach_span().never();
        let mut second = MockTracer::new();
        second.expect_detach_span().never();
        let first = interceptor(first);
        let second = interceptor(second);

        let event = ConsumerEvent::builder().headers(span().to_map()).build();
        assert!(!first.before_consume(&event).unwrap());
        second.after_success_consume(&event).unwrap();
    }
}
