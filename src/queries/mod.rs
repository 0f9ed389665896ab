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

//! The fixed set of aggregation queries.
//!
//! Each analysis builds a logical plan through the DataFrame API (the
//! `*_frame` functions), executes it with one blocking `collect`, and turns
//! the batches into a small vector of typed rows. Rankings are deterministic:
//! every ordering carries an explicit secondary sort key, so equal aggregate
//! values tie-break on id/title/genre rather than on partition order.

pub mod activity;
pub mod genres;
pub mod movies;
pub mod users;

/// Row cap for the ranked analyses.
pub const DEFAULT_TOP_LIMIT: usize = 10;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use datafusion::arrow::array::{Float64Array, Int64Array, StringArray};
    use datafusion::arrow::record_batch::RecordBatch;
    use datafusion::error::Result;
    use datafusion::prelude::SessionContext;

    use crate::tables::{movies_schema, ratings_schema, MOVIES_TABLE, RATINGS_TABLE};

    pub fn ratings_batch(rows: &[(i64, i64, f64, i64)]) -> Result<RecordBatch> {
        let batch = RecordBatch::try_new(
            Arc::new(ratings_schema()),
            vec![
                Arc::new(Int64Array::from(
                    rows.iter().map(|r| r.0).collect::<Vec<_>>(),
                )),
                Arc::new(Int64Array::from(
                    rows.iter().map(|r| r.1).collect::<Vec<_>>(),
                )),
                Arc::new(Float64Array::from(
                    rows.iter().map(|r| r.2).collect::<Vec<_>>(),
                )),
                Arc::new(Int64Array::from(
                    rows.iter().map(|r| r.3).collect::<Vec<_>>(),
                )),
            ],
        )?;
        Ok(batch)
    }

    pub fn movies_batch(rows: &[(i64, &str, &str)]) -> Result<RecordBatch> {
        let batch = RecordBatch::try_new(
            Arc::new(movies_schema()),
            vec![
                Arc::new(Int64Array::from(
                    rows.iter().map(|r| r.0).collect::<Vec<_>>(),
                )),
                Arc::new(StringArray::from(
                    rows.iter().map(|r| r.1).collect::<Vec<_>>(),
                )),
                Arc::new(StringArray::from(
                    rows.iter().map(|r| r.2).collect::<Vec<_>>(),
                )),
            ],
        )?;
        Ok(batch)
    }

    /// Context with `ratings` and `movies` registered from in-memory rows.
    pub async fn context(
        ratings: &[(i64, i64, f64, i64)],
        movies: &[(i64, &str, &str)],
    ) -> Result<SessionContext> {
        let ctx = SessionContext::new();
        ctx.register_batch(RATINGS_TABLE, ratings_batch(ratings)?)?;
        ctx.register_batch(MOVIES_TABLE, movies_batch(movies)?)?;
        Ok(ctx)
    }
}
