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
use std::fmt;
use std::sync::Arc;

use kafka_interceptor_error::InterceptorResult;
use tracing::debug;
use tracing::warn;

use crate::event::consumer_event::ConsumerEvent;
use crate::event::producer_event::ProducerEvent;
use crate::hook::consumer_interceptor::ConsumerInterceptor;
use crate::hook::producer_interceptor::ProducerInterceptor;

pub type ArcConsumerInterceptor = Arc<dyn ConsumerInterceptor>;
pub type ArcProducerInterceptor = Arc<dyn ProducerInterceptor>;

/// Source of interceptor instances owned by the host application, consulted once at startup.
///
/// Implementations return instances in their natural enumeration order; that order becomes the
/// firing order. An `Err` means the source itself could not be read and startup must stop.
pub trait InterceptorProvider {
    fn consumer_interceptors(&self) -> InterceptorResult<Vec<ArcConsumerInterceptor>>;

    fn producer_interceptors(&self) -> InterceptorResult<Vec<ArcProducerInterceptor>>;
}

/// Collects interceptors in append order until [`InterceptorRegistry::build`] freezes them.
#[derive(Default)]
pub struct InterceptorRegistry {
    consumer_interceptors: Vec<ArcConsumerInterceptor>,
    producer_interceptors: Vec<ArcProducerInterceptor>,
}

impl InterceptorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from everything the provider exposes, failing fast if it cannot be read.
    pub fn from_provider(provider: &dyn InterceptorProvider) -> InterceptorResult<Self> {
        let consumer_interceptors = provider.consumer_interceptors()?;
        let producer_interceptors = provider.producer_interceptors()?;
        debug!(
            "resolved {} consumer and {} producer interceptors",
            consumer_interceptors.len(),
            producer_interceptors.len()
        );
        Ok(Self {
            consumer_interceptors,
            producer_interceptors,
        })
    }

    pub fn register_consumer_interceptor(&mut self, interceptor: impl ConsumerInterceptor) -> &mut Self {
        self.register_consumer_interceptor_arc(Arc::new(interceptor))
    }

    pub fn register_consumer_interceptor_arc(&mut self, interceptor: ArcConsumerInterceptor) -> &mut Self {
        self.consumer_interceptors.push(interceptor);
        self
    }

    pub fn register_producer_interceptor(&mut self, interceptor: impl ProducerInterceptor) -> &mut Self {
        self.register_producer_interceptor_arc(Arc::new(interceptor))
    }

    pub fn register_producer_interceptor_arc(&mut self, interceptor: ArcProducerInterceptor) -> &mut Self {
        self.producer_interceptors.push(interceptor);
        self
    }

    /// Registers one instance on both the consumer and the producer path.
    pub fn register_interceptor<T>(&mut self, interceptor: T) -> &mut Self
    where
        T: ConsumerInterceptor + ProducerInterceptor,
    {
        let interceptor = Arc::new(interceptor);
        self.consumer_interceptors.push(interceptor.clone());
        self.producer_interceptors.push(interceptor);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.consumer_interceptors.is_empty() && self.producer_interceptors.is_empty()
    }

    pub fn build(self) -> InterceptorChain {
        InterceptorChain {
            consumer_interceptors: self.consumer_interceptors.into(),
            producer_interceptors: self.producer_interceptors.into(),
        }
    }
}

/// The frozen, process-wide interceptor list.
///
/// Cloning is cheap and every clone shares the same slices, which are never mutated, so the
/// chain can be read from any number of consumer threads without locking.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    consumer_interceptors: Arc<[ArcConsumerInterceptor]>,
    producer_interceptors: Arc<[ArcProducerInterceptor]>,
}

impl InterceptorChain {
    #[inline]
    pub fn consumer_interceptors(&self) -> &[ArcConsumerInterceptor] {
        &self.consumer_interceptors
    }

    #[inline]
    pub fn producer_interceptors(&self) -> &[ArcProducerInterceptor] {
        &self.producer_interceptors
    }

    #[inline]
    pub fn has_consumer_interceptors(&self) -> bool {
        !self.consumer_interceptors.is_empty()
    }

    #[inline]
    pub fn has_producer_interceptors(&self) -> bool {
        !self.producer_interceptors.is_empty()
    }

    /// Fires `before_consume` in order and stops at the first interceptor that cancels or fails.
    pub fn fire_before_consume(&self, event: &ConsumerEvent) -> InterceptorResult<bool> {
        for interceptor in self.consumer_interceptors.iter() {
            if interceptor.before_consume(event)? {
                debug!(
                    "consume of {}-{}@{} cancelled by {}",
                    event.topic(),
                    event.partition(),
                    event.offset(),
                    interceptor.interceptor_name()
                );
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Fires `after_success_consume` on every interceptor; failures are logged, never raised.
    pub fn fire_after_success_consume(&self, event: &ConsumerEvent) {
        for interceptor in self.consumer_interceptors.iter() {
            if let Err(e) = interceptor.after_success_consume(event) {
                warn!(
                    "after_success_consume of {} failed for {}-{}@{}: {}",
                    interceptor.interceptor_name(),
                    event.topic(),
                    event.partition(),
                    event.offset(),
                    e
                );
            }
        }
    }

    /// Fires `after_error_consume` on every interceptor; failures are logged, never raised.
    pub fn fire_after_error_consume(&self, event: &ConsumerEvent, error: &(dyn Error + 'static)) {
        for interceptor in self.consumer_interceptors.iter() {
            if let Err(e) = interceptor.after_error_consume(event, error) {
                warn!(
                    "after_error_consume of {} failed for {}-{}@{}: {}",
                    interceptor.interceptor_name(),
                    event.topic(),
                    event.partition(),
                    event.offset(),
                    e
                );
            }
        }
    }

    /// Fires `before_send` on every interceptor in order; the first failure aborts the send.
    pub fn fire_before_send(&self, event: &mut ProducerEvent) -> InterceptorResult<()> {
        for interceptor in self.producer_interceptors.iter() {
            interceptor.before_send(event)?;
        }
        Ok(())
    }

    /// Fires `after_send` on every interceptor; failures are logged, never raised.
    pub fn fire_after_send(&self, event: &ProducerEvent) {
        for interceptor in self.producer_interceptors.iter() {
            if let Err(e) = interceptor.after_send(event) {
                warn!(
                    "after_send of {} failed for topic {}: {}",
                    interceptor.interceptor_name(),
                    event.topic(),
                    e
                );
            }
        }
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field(
                "consumer_interceptors",
                &self
                    .consumer_interceptors
                    .iter()
                    .map(|i| i.interceptor_name())
                    .collect::<Vec<_>>(),
            )
            .field(
                "producer_interceptors",
                &self
                    .producer_interceptors
                    .iter()
                    .map(|i| i.interceptor_name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
