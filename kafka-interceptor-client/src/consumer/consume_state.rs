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

use std::fmt::Display;

/// Where a single wrapped listener call currently is.
///
/// `Entry` leads to either `Cancelled` or `Running`; `Running` ends in `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsumeState {
    #[default]
    Entry,
    /// A `before_consume` hook vetoed the call
    Cancelled,
    /// The listener is executing
    Running,
    Succeeded,
    Failed,
}

impl ConsumeState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConsumeState::Cancelled | ConsumeState::Succeeded | ConsumeState::Failed
        )
    }
}

impl Display for ConsumeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsumeState::Entry => write!(f, "ENTRY"),
            ConsumeState::Cancelled => write!(f, "CANCELLED"),
            ConsumeState::Running => write!(f, "RUNNING"),
            ConsumeState::Succeeded => write!(f, "SUCCEEDED"),
            ConsumeState::Failed => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!ConsumeState::Entry.is_terminal());
        assert!(!ConsumeState::Running.is_terminal());
        assert!(ConsumeState::Cancelled.is_terminal());
        assert!(ConsumeState::Succeeded.is_terminal());
        assert!(ConsumeState::Failed.is_terminal());
    }

    #[test]
    fn display() {
        assert_eq!(ConsumeState::default().to_string(), "ENTRY");
        assert_eq!(ConsumeState::Failed.to_string(), "FAILED");
    }
}
