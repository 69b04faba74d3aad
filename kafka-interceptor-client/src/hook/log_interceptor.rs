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

use kafka_interceptor_common::common::LoggingProperties;
use kafka_interceptor_error::InterceptorResult;
use tracing::error;
use tracing::info;

use crate::event::consumer_event::ConsumerEvent;
use crate::event::producer_event::ProducerEvent;
use crate::hook::consumer_interceptor::ConsumerInterceptor;
use crate::hook::producer_interceptor::ProducerInterceptor;

/// Writes one log record per enabled lifecycle point.
pub struct LogInterceptor {
    properties: LoggingProperties,
}

impl LogInterceptor {
    pub fn new(properties: LoggingProperties) -> Self {
        Self { properties }
    }
}

impl ConsumerInterceptor for LogInterceptor {
    fn interceptor_name(&self) -> &str {
        "LogInterceptor"
    }

    fn before_consume(&self, event: &ConsumerEvent) -> InterceptorResult<bool> {
        if self.properties.before_consume {
            info!(
                topic = %event.topic(),
                partition = event.partition(),
                offset = event.offset(),
                key = ?event.key(),
                event_id = %event.event_id(),
                "receive message: {}",
                event.value()
            );
        }
        Ok(false)
    }

    fn after_success_consume(&self, event: &ConsumerEvent) -> InterceptorResult<()> {
        if self.properties.after_success_consume {
            info!(
                topic = %event.topic(),
                partition = event.partition(),
                offset = event.offset(),
                event_id = %event.event_id(),
                "success consume message"
            );
        }
        Ok(())
    }

    fn after_error_consume(&self, event: &ConsumerEvent, err: &(dyn Error + 'static)) -> InterceptorResult<()> {
        if self.properties.after_error_consume {
            error!(
                topic = %event.topic(),
                partition = event.partition(),
                offset = event.offset(),
                event_id = %event.event_id(),
                "error consume message: {}",
                err
            );
        }
        Ok(())
    }
}

impl ProducerInterceptor for LogInterceptor {
    fn interceptor_name(&self) -> &str {
        "LogInterceptor"
    }

    fn before_send(&self, event: &mut ProducerEvent) -> InterceptorResult<()> {
        if self.properties.before_send {
            info!(topic = %event.topic(), key = ?event.key(), "send message: {}", event.value());
        }
        Ok(())
    }

    fn after_send(&self, event: &ProducerEvent) -> InterceptorResult<()> {
        if self.properties.after_send {
            info!(topic = %event.topic(), key = ?event.key(), "message sent");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use serde_json::json;

    use super::*;

    #[test]
    fn log_interceptor_never_cancels_or_fails() {
        let interceptor = LogInterceptor::new(LoggingProperties::all());
        let event = ConsumerEvent::builder().topic("orders").value("{}").build();
        let err = io::Error::other("boom");

        assert!(!ConsumerInterceptor::before_consume(&interceptor, &event).unwrap());
        assert!(interceptor.after_success_consume(&event).is_ok());
        assert!(interceptor.after_error_consume(&event, &err).is_ok());

        let mut producer_event = ProducerEvent::new("orders", None, json!({"id": 1}));
        assert!(interceptor.before_send(&mut producer_event).is_ok());
        assert!(interceptor.after_send(&producer_event).is_ok());
        assert!(producer_event.headers().is_empty());
    }

    #[test]
    fn disabled_logging_is_silent_pass_through() {
        let interceptor = LogInterceptor::new(LoggingProperties::default());
        let event = ConsumerEvent::default();
        assert!(!ConsumerInterceptor::before_consume(&interceptor, &event).unwrap());
    }
}
