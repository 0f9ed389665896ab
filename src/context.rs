// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Session construction.

use datafusion::prelude::{SessionConfig, SessionContext};

/// Create the execution context all analyses run against.
pub fn session_context(partitions: usize, batch_size: usize) -> SessionContext {
    let config = SessionConfig::new()
        .with_target_partitions(partitions)
        .with_batch_size(batch_size);
    SessionContext::new_with_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_uses_requested_partitions() {
        let ctx = session_context(4, 1024);
        let config = ctx.state().config().clone();
        assert_eq!(config.target_partitions(), 4);
        assert_eq!(config.batch_size(), 1024);
    }
}
