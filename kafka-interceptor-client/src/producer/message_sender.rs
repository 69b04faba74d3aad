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

use crate::producer::producer_record::ProducerRecord;
use crate::producer::send_result::SendResult;

/// The messaging client's send operation.
#[trait_variant::make(MessageSender: Send)]
pub trait MessageSenderLocal: Sync {
    /// Sends one record and resolves once the broker acknowledged it.
    async fn send(&self, record: ProducerRecord) -> InterceptorResult<SendResult>;
}
