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

pub struct TraceConstants;

impl TraceConstants {
    pub const TRACE_ID: &'static str = "X-B3-TraceId";
    pub const SPAN_ID: &'static str = "X-B3-SpanId";
    pub const PARENT_ID: &'static str = "X-B3-ParentSpanId";
    pub const SAMPLED: &'static str = "X-B3-Sampled";
    pub const SPAN_NAME: &'static str = "X-Span-Name";
    pub const PROCESS_ID: &'static str = "X-Process-Id";
    pub const SPAN_INTERCEPTOR: &'static str = "SpanInterceptor";
}
