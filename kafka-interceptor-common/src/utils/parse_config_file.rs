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

use std::fmt::Debug;
use std::path::Path;

use config::Config;
use config::Environment;
use kafka_interceptor_error::InterceptorError;
use kafka_interceptor_error::InterceptorResult;
use serde::de::DeserializeOwned;

/// Prefix of environment variables that override file values, e.g.
/// `KAFKA_INTERCEPTOR__MODEL__TRACE_FIELD_NAME`.
pub const ENV_PREFIX: &str = "KAFKA_INTERCEPTOR";

pub fn parse_config_file<C>(config_file: impl AsRef<Path>) -> InterceptorResult<C>
where
    C: Debug + DeserializeOwned,
{
    let cfg = Config::builder()
        .add_source(config::File::from(config_file.as_ref()))
        .build()
        .map_err(|e| InterceptorError::config_invalid(e.to_string()))?;
    cfg.try_deserialize::<C>()
        .map_err(|e| InterceptorError::config_invalid(e.to_string()))
}

/// Same as [`parse_config_file`] but layers `KAFKA_INTERCEPTOR__*` variables on top. A missing
/// file is tolerated when `required` is false, leaving defaults plus environment.
pub fn parse_config_file_with_env<C>(config_file: impl AsRef<Path>, required: bool) -> InterceptorResult<C>
where
    C: Debug + DeserializeOwned,
{
    let cfg = Config::builder()
        .add_source(config::File::from(config_file.as_ref()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .map_err(|e| InterceptorError::config_invalid(e.to_string()))?;
    cfg.try_deserialize::<C>()
        .map_err(|e| InterceptorError::config_invalid(e.to_string()))
}
