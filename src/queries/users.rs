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

//! Most active raters.

use datafusion::arrow::array::AsArray;
use datafusion::arrow::datatypes::Int64Type;
use datafusion::error::Result;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::prelude::*;

use crate::tables::RATINGS_TABLE;

/// One user in the activity ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct UserActivity {
    pub rank: u32,
    pub user_id: i64,
    pub num_ratings: i64,
}

/// Ratings submitted per user, most active first.
pub async fn top_users_frame(ctx: &SessionContext, limit: usize) -> Result<DataFrame> {
    ctx.table(RATINGS_TABLE)
        .await?
        .aggregate(
            vec![col("userId")],
            vec![count(col("movieId")).alias("num_ratings")],
        )?
        .sort(vec![
            col("num_ratings").sort(false, false),
            col("userId").sort(true, false),
        ])?
        .limit(0, Some(limit))
}

/// The `limit` most active users, ranked 1..N.
pub async fn top_users(ctx: &SessionContext, limit: usize) -> Result<Vec<UserActivity>> {
    let batches = top_users_frame(ctx, limit).await?.collect().await?;

    let mut rows = Vec::new();
    for batch in &batches {
        let user_ids = batch.column(0).as_primitive::<Int64Type>();
        let counts = batch.column(1).as_primitive::<Int64Type>();
        for i in 0..batch.num_rows() {
            rows.push(UserActivity {
                rank: rows.len() as u32 + 1,
                user_id: user_ids.value(i),
                num_ratings: counts.value(i),
            });
        }
    }
    Ok(rows)
}
