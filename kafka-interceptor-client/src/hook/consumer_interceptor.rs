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

use kafka_interceptor_error::InterceptorResult;

use crate::event::consumer_event::ConsumerEvent;

/// `ConsumerInterceptor` provides hooks around the consumption of a single message.
///
/// Every hook has a no-op default, so an implementor only overrides the points it cares about.
/// Hooks run on the thread that delivered the message, in registration order.
pub trait ConsumerInterceptor: Send + Sync + 'static {
    /// Returns the name of the interceptor, used in logs and error reports.
    fn interceptor_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called before the listener runs.
    ///
    /// Returning `Ok(true)` cancels the call: the listener is skipped and no later interceptor
    /// sees `before_consume` for this message.
    fn before_consume(&self, event: &ConsumerEvent) -> InterceptorResult<bool> {
        let _ = event;
        Ok(false)
    }

    /// Called after the listener returned successfully.
    fn after_success_consume(&self, event: &ConsumerEvent) -> InterceptorResult<()> {
        let _ = event;
        Ok(())
    }

    /// Called after the listener failed, with the error the listener returned.
    fn after_error_consume(&self, event: &ConsumerEvent, error: &(dyn Error + 'static)) -> InterceptorResult<()> {
        let _ = (event, error);
        Ok(())
    }
}
