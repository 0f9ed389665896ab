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

//! Batch analytics over the MovieLens ratings dataset.
//!
//! Two CSV tables (`ratings`, `movies`) are registered in a DataFusion
//! [`SessionContext`](datafusion::prelude::SessionContext) and a fixed set of
//! aggregation queries is run against them, each producing a small ranked
//! result table. All partitioning and parallelism is DataFusion's; this crate
//! only builds logical plans and converts the collected batches into typed
//! rows.

pub mod context;
pub mod dataset;
pub mod queries;
pub mod report;
pub mod tables;
