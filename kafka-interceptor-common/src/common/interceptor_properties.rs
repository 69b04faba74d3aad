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

use std::path::Path;

use kafka_interceptor_error::InterceptorResult;
use serde::Deserialize;
use serde::Serialize;

use crate::utils::parse_config_file::parse_config_file;
use crate::utils::parse_config_file::parse_config_file_with_env;

/// Root of the interceptor configuration.
///
/// ```toml
/// [model]
/// trace_field_name = "traceId"
/// span_field_name = "span"
///
/// [logging]
/// before_consume = true
/// after_error_consume = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptorProperties {
    pub model: ModelProperties,
    pub logging: LoggingProperties,
}

impl InterceptorProperties {
    pub fn from_file(path: impl AsRef<Path>) -> InterceptorResult<Self> {
        parse_config_file(path)
    }

    /// Loads `path` if it exists, then applies `KAFKA_INTERCEPTOR__*` overrides.
    pub fn from_file_and_env(path: impl AsRef<Path>) -> InterceptorResult<Self> {
        parse_config_file_with_env(path, false)
    }
}

/// Names of the payload fields the interceptors read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelProperties {
    /// Payload field whose value becomes the consumer event id.
    pub trace_field_name: String,
    /// Payload field that carries a serialized span when headers do not.
    pub span_field_name: String,
}

impl Default for ModelProperties {
    fn default() -> Self {
        Self {
            trace_field_name: "traceId".to_string(),
            span_field_name: "span".to_string(),
        }
    }
}

/// Lifecycle points at which the log interceptor writes a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingProperties {
    pub before_send: bool,
    pub after_send: bool,
    pub before_consume: bool,
    pub after_success_consume: bool,
    pub after_error_consume: bool,
}

impl LoggingProperties {
    pub fn all() -> Self {
        Self {
            before_send: true,
            after_send: true,
            before_consume: true,
            after_success_consume: true,
            after_error_consume: true,
        }
    }
}
