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

use cheetah_string::CheetahString;

use crate::trace::span_context::SpanContext;

/// The span store of the tracing library in use.
///
/// Implementations are typically thread-bound: a span continued on one thread is current only
/// on that thread until it is detached there.
#[cfg_attr(test, mockall::automock)]
pub trait Tracer: Send + Sync {
    /// The span current on the calling thread, if any.
    fn current_span(&self) -> Option<SpanContext>;

    /// Makes `span` current on the calling thread.
    fn continue_span(&self, span: SpanContext);

    /// Removes the current span from the calling thread and returns it.
    fn detach_span(&self) -> Option<SpanContext>;
}

thread_local! {
    static SPAN_STACK: RefCell<Vec<SpanContext>> = const { RefCell::new(Vec::new()) };
}

/// A [`Tracer`] keeping a stack of spans per thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadLocalTracer;

impl ThreadLocalTracer {
    /// Starts a span as a child of the current one, or as a new root, and makes it current.
    pub fn start_span(&self, name: impl Into<CheetahString>) -> SpanContext {
        let span = match self.current_span() {
            Some(parent) => parent.child(name),
            None => SpanContext::new_root(name),
        };
        self.continue_span(span.clone());
        span
    }

    /// Number of spans stacked on the calling thread.
    pub fn depth(&self) -> usize {
        SPAN_STACK.with(|stack| stack.borrow().len())
    }
}

impl Tracer for ThreadLocalTracer {
    fn current_span(&self) -> Option<SpanContext> {
        SPAN_STACK.with(|stack| stack.borrow().last().cloned())
    }

    fn continue_span(&self, span: SpanContext) {
        SPAN_STACK.with(|stack| stack.borrow_mut().push(span));
    }

    fn detach_span(&self) -> Option<SpanContext> {
        SPAN_STACK.with(|stack| stack.borrow_mut().pop())
    }
}
