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

use crate::base::consumer_record::ConsumerRecord;

/// A pending handler call as seen by the consume dispatcher.
///
/// Only calls that target a listener and carry a record are intercepted; everything else is
/// proceeded untouched.
pub trait ListenerInvocation {
    type Output;
    type Error;

    /// Whether the call target is registered as a message listener.
    fn is_listener(&self) -> bool;

    /// The delivered record among the call arguments, if any.
    fn consumer_record(&self) -> Option<&ConsumerRecord>;

    /// Runs the original call.
    fn proceed(self) -> Result<Self::Output, Self::Error>;
}

/// A listener closure together with the record it is about to receive.
pub struct HandlerInvocation<'a, F> {
    listener: bool,
    record: Option<&'a ConsumerRecord>,
    handler: F,
}

impl<'a, F> HandlerInvocation<'a, F> {
    /// A call to a message listener with its record.
    pub fn listener(record: &'a ConsumerRecord, handler: F) -> Self {
        Self {
            listener: true,
            record: Some(record),
            handler,
        }
    }

    /// A call that is not a listener call, or that carries no record; always passed through.
    pub fn plain(handler: F) -> Self {
        Self {
            listener: false,
            record: None,
            handler,
        }
    }

    pub fn new(listener: bool, record: Option<&'a ConsumerRecord>, handler: F) -> Self {
        Self {
            listener,
            record,
            handler,
        }
    }
}

impl<F, R, E> ListenerInvocation for HandlerInvocation<'_, F>
where
    F: FnOnce() -> Result<R, E>,
{
    type Output = R;
    type Error = E;

    #[inline]
    fn is_listener(&self) -> bool {
        self.listener
    }

    #[inline]
    fn consumer_record(&self) -> Option<&ConsumerRecord> {
        self.record
    }

    #[inline]
    fn proceed(self) -> Result<R, E> {
        (self.handler)()
    }
}
