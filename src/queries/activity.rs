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

//! Rating volume over time.

use chrono::NaiveDate;
use datafusion::arrow::array::AsArray;
use datafusion::arrow::datatypes::{DataType, Date32Type, Int64Type, TimeUnit};
use datafusion::common::exec_datafusion_err;
use datafusion::error::Result;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::prelude::*;

use crate::tables::RATINGS_TABLE;

/// Number of ratings submitted on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub num_ratings: i64,
}

/// Ratings per day, oldest first. Epoch seconds are truncated to the UTC
/// calendar date.
pub async fn daily_counts_frame(ctx: &SessionContext) -> Result<DataFrame> {
    ctx.table(RATINGS_TABLE)
        .await?
        .select(vec![
            cast(
                cast(
                    col("timestamp"),
                    DataType::Timestamp(TimeUnit::Second, None),
                ),
                DataType::Date32,
            )
            .alias("date"),
            col("rating"),
        ])?
        .aggregate(
            vec![col("date")],
            vec![count(col("rating")).alias("num_ratings")],
        )?
        .sort(vec![col("date").sort(true, false)])
}

/// The full daily time series as typed rows.
pub async fn daily_rating_counts(ctx: &SessionContext) -> Result<Vec<DailyCount>> {
    let batches = daily_counts_frame(ctx).await?.collect().await?;

    let mut rows = Vec::new();
    for batch in &batches {
        let dates = batch.column(0).as_primitive::<Date32Type>();
        let counts = batch.column(1).as_primitive::<Int64Type>();
        for i in 0..batch.num_rows() {
            let date = dates
                .value_as_date(i)
                .ok_or_else(|| exec_datafusion_err!("date out of range"))?;
            rows.push(DailyCount {
                date,
                num_ratings: counts.value(i),
            });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    #[tokio::test]
    async fn counts_ratings_per_day_in_date_order() -> Result<()> {
        // 1000 and 2000 fall on 1970-01-01, 90000 on 1970-01-02
        let ctx = fixtures::context(
            &[
                (1, 10, 4.0, 90_000),
                (2, 10, 3.0, 1_000),
                (3, 10, 5.0, 2_000),
            ],
            &[],
        )
        .await?;

        let rows = daily_rating_counts(&ctx).await?;
        assert_eq!(
            rows,
            vec![
                DailyCount {
                    date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
                    num_ratings: 2,
                },
                DailyCount {
                    date: NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(),
                    num_ratings: 1,
                },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_ratings_yield_an_empty_series() -> Result<()> {
        let ctx = fixtures::context(&[], &[]).await?;
        assert!(daily_rating_counts(&ctx).await?.is_empty());
        Ok(())
    }
}
