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

use kafka_interceptor_error::InterceptorError;

use crate::event::producer_event::ProducerEvent;
use crate::hook::interceptor_registry::InterceptorChain;

/// Wraps single synchronous send calls with the producer interceptor chain.
///
/// Every `before_send` hook runs, in order, before the send; sends cannot be cancelled. A failing
/// `before_send` aborts the call before anything is sent. `after_send` runs only when the send
/// succeeded, and its failures are logged without affecting the result.
#[derive(Debug, Clone, Default)]
pub struct SendDispatcher {
    chain: InterceptorChain,
}

impl SendDispatcher {
    pub fn new(chain: InterceptorChain) -> Self {
        Self { chain }
    }

    pub fn send<R, E, F>(&self, mut event: ProducerEvent, send: F) -> Result<R, E>
    where
        F: FnOnce(&ProducerEvent) -> Result<R, E>,
        E: From<InterceptorError>,
    {
        self.chain.fire_before_send(&mut event)?;
        let result = send(&event)?;
        self.chain.fire_after_send(&event);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kafka_interceptor_error::InterceptorResult;
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::hook::interceptor_registry::InterceptorRegistry;
    use crate::hook::producer_interceptor::ProducerInterceptor;

    #[derive(Default, Clone, Copy)]
    struct Faults {
        before: bool,
        after: bool,
    }

    struct Stamp {
        name: &'static str,
        faults: Faults,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl ProducerInterceptor for Stamp {
        fn before_send(&self, event: &mut ProducerEvent) -> InterceptorResult<()> {
            self.log.lock().push(format!("{}:before_send", self.name));
            if self.faults.before {
                return Err(InterceptorError::interceptor_failed(self.name, "cannot stamp"));
            }
            event.put_header("stamp", self.name);
            Ok(())
        }

        fn after_send(&self, _event: &ProducerEvent) -> InterceptorResult<()> {
            self.log.lock().push(format!("{}:after_send", self.name));
            if self.faults.after {
                return Err(InterceptorError::interceptor_failed(self.name, "audit store down"));
            }
            Ok(())
        }
    }

    fn dispatcher(log: &Arc<Mutex<Vec<String>>>, a: Faults, b: Faults) -> SendDispatcher {
        let mut registry = InterceptorRegistry::new();
        registry
            .register_producer_interceptor(Stamp {
                name: "a",
                faults: a,
                log: log.clone(),
            })
            .register_producer_interceptor(Stamp {
                name: "b",
                faults: b,
                log: log.clone(),
            });
        SendDispatcher::new(registry.build())
    }

    #[test]
    fn hooks_surround_send() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = dispatcher(&log, Faults::default(), Faults::default());
        let event = ProducerEvent::new("orders", None, json!({"id": 1}));

        let sent = dispatcher
            .send(event, |event| {
                log.lock().push("send".to_string());
                Ok::<_, InterceptorError>(event.headers().get("stamp").cloned())
            })
            .unwrap();

        assert_eq!(sent.as_ref().map(|s| s.as_str()), Some("b"));
        assert_eq!(
            *log.lock(),
            vec!["a:before_send", "b:before_send", "send", "a:after_send", "b:after_send"]
        );
    }

    #[test]
    fn failed_send_skips_after_send() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = dispatcher(&log, Faults::default(), Faults::default());
        let event = ProducerEvent::new("orders", None, json!(null));

        let result: Result<(), InterceptorError> =
            dispatcher.send(event, |_| Err(InterceptorError::send_failed("orders", "broker down")));

        assert!(matches!(result, Err(InterceptorError::SendFailed { .. })));
        assert_eq!(*log.lock(), vec!["a:before_send", "b:before_send"]);
    }

    #[test]
    fn failing_before_send_aborts_send() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let failing = Faults {
            before: true,
            ..Default::default()
        };
        let dispatcher = dispatcher(&log, failing, Faults::default());
        let event = ProducerEvent::new("orders", None, json!({"id": 1}));

        let result = dispatcher.send(event, |_| {
            log.lock().push("send".to_string());
            Ok::<_, InterceptorError>(())
        });

        assert!(matches!(result, Err(InterceptorError::InterceptorFailed { .. })));
        assert_eq!(*log.lock(), vec!["a:before_send"]);
    }

    #[test]
    fn failing_after_send_keeps_send_result() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let failing = Faults {
            after: true,
            ..Default::default()
        };
        let dispatcher = dispatcher(&log, failing, Faults::default());
        let event = ProducerEvent::new("orders", None, json!({"id": 1}));

        let result = dispatcher.send(event, |_| Ok::<_, InterceptorError>(42));

        assert_eq!(result.unwrap(), 42);
        assert_eq!(
            *log.lock(),
            vec!["a:before_send", "b:before_send", "a:after_send", "b:after_send"]
        );
    }
}
