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

use kafka_interceptor_error::InterceptorResult;

use crate::event::producer_event::ProducerEvent;

/// `ProducerInterceptor` observes outbound messages.
///
/// Sends cannot be vetoed: `before_send` may only annotate the event (typically its headers).
pub trait ProducerInterceptor: Send + Sync + 'static {
    /// Returns the name of the interceptor, used in logs and error reports.
    fn interceptor_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called before the record is serialized and handed to the sender.
    fn before_send(&self, event: &mut ProducerEvent) -> InterceptorResult<()> {
        let _ = event;
        Ok(())
    }

    /// Called once the sender acknowledged the record.
    fn after_send(&self, event: &ProducerEvent) -> InterceptorResult<()> {
        let _ = event;
        Ok(())
    }
}
