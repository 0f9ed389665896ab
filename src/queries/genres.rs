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

//! Average rating per genre.
//!
//! A movie's `genres` field is a `|`-joined label list, so one movie row is
//! exploded into one row per label before the join; every rating of the movie
//! then lands in each of its genres' aggregates.

use datafusion::arrow::array::AsArray;
use datafusion::arrow::datatypes::Float64Type;
use datafusion::common::ScalarValue;
use datafusion::error::Result;
use datafusion::functions_aggregate::expr_fn::avg;
use datafusion::prelude::*;

use crate::tables::{MOVIES_TABLE, RATINGS_TABLE};

/// One genre in the average-rating ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreScore {
    pub rank: u32,
    pub genre: String,
    pub avg_rating: f64,
}

/// Mean rating per genre, best first.
pub async fn genre_averages_frame(ctx: &SessionContext) -> Result<DataFrame> {
    let exploded = ctx
        .table(MOVIES_TABLE)
        .await?
        .select(vec![
            col("movieId"),
            string_to_array(col("genres"), lit("|"), lit(ScalarValue::Utf8(None)))
                .alias("genre"),
        ])?
        .unnest_columns(&["genre"])?;

    ctx.table(RATINGS_TABLE)
        .await?
        .join(exploded, JoinType::Inner, &["movieId"], &["movieId"], None)?
        .aggregate(
            vec![col("genre")],
            vec![avg(col("rating")).alias("avg_rating")],
        )?
        .sort(vec![
            col("avg_rating").sort(false, false),
            col("genre").sort(true, false),
        ])
}

/// All genres ranked by mean rating.
pub async fn genre_averages(ctx: &SessionContext) -> Result<Vec<GenreScore>> {
    let batches = genre_averages_frame(ctx).await?.collect().await?;

    let mut rows = Vec::new();
    for batch in &batches {
        let genres = batch.column(0).as_string::<i32>();
        let avgs = batch.column(1).as_primitive::<Float64Type>();
        for i in 0..batch.num_rows() {
            rows.push(GenreScore {
                rank: rows.len() as u32 + 1,
                genre: genres.value(i).to_string(),
                avg_rating: avgs.value(i),
            });
        }
    }
    Ok(rows)
}
