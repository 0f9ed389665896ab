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

//! Result rendering.
//!
//! Typed result rows go back into a single `RecordBatch` (ranked tables gain
//! a leading `Rank` column) and print through Arrow's pretty formatter.

use std::sync::Arc;

use chrono::NaiveDate;
use datafusion::arrow::array::{
    Date32Array, Float64Array, Int64Array, StringArray, UInt32Array,
};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::arrow::util::pretty;
use datafusion::error::Result;

use crate::queries::activity::DailyCount;
use crate::queries::genres::GenreScore;
use crate::queries::movies::{MovieScore, MovieSpread};
use crate::queries::users::UserActivity;

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
    date.signed_duration_since(epoch).num_days() as i32
}

pub fn user_activity_batch(rows: &[UserActivity]) -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        Field::new("Rank", DataType::UInt32, false),
        Field::new("userId", DataType::Int64, false),
        Field::new("num_ratings", DataType::Int64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(UInt32Array::from(
                rows.iter().map(|r| r.rank).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.user_id).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.num_ratings).collect::<Vec<_>>(),
            )),
        ],
    )?;
    Ok(batch)
}

pub fn daily_counts_batch(rows: &[DailyCount]) -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("num_ratings", DataType::Int64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Date32Array::from(
                rows.iter().map(|r| days_since_epoch(r.date)).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.num_ratings).collect::<Vec<_>>(),
            )),
        ],
    )?;
    Ok(batch)
}

pub fn movie_scores_batch(rows: &[MovieScore]) -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        Field::new("Rank", DataType::UInt32, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("avg_rating", DataType::Float64, false),
        Field::new("num_ratings", DataType::Int64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(UInt32Array::from(
                rows.iter().map(|r| r.rank).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.avg_rating).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.num_ratings).collect::<Vec<_>>(),
            )),
        ],
    )?;
    Ok(batch)
}

pub fn movie_spreads_batch(rows: &[MovieSpread]) -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        Field::new("Rank", DataType::UInt32, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("avg_rating", DataType::Float64, false),
        Field::new("stddev_rating", DataType::Float64, false),
        Field::new("num_ratings", DataType::Int64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(UInt32Array::from(
                rows.iter().map(|r| r.rank).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.avg_rating).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.stddev_rating).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.num_ratings).collect::<Vec<_>>(),
            )),
        ],
    )?;
    Ok(batch)
}

pub fn genre_scores_batch(rows: &[GenreScore]) -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        Field::new("Rank", DataType::UInt32, false),
        Field::new("genre", DataType::Utf8, false),
        Field::new("avg_rating", DataType::Float64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(UInt32Array::from(
                rows.iter().map(|r| r.rank).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.genre.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.avg_rating).collect::<Vec<_>>(),
            )),
        ],
    )?;
    Ok(batch)
}

pub fn print_user_activity(rows: &[UserActivity]) -> Result<()> {
    pretty::print_batches(&[user_activity_batch(rows)?])?;
    Ok(())
}

pub fn print_daily_counts(rows: &[DailyCount]) -> Result<()> {
    pretty::print_batches(&[daily_counts_batch(rows)?])?;
    Ok(())
}

pub fn print_movie_scores(rows: &[MovieScore]) -> Result<()> {
    pretty::print_batches(&[movie_scores_batch(rows)?])?;
    Ok(())
}

pub fn print_movie_spreads(rows: &[MovieSpread]) -> Result<()> {
    pretty::print_batches(&[movie_spreads_batch(rows)?])?;
    Ok(())
}

pub fn print_genre_scores(rows: &[GenreScore]) -> Result<()> {
    pretty::print_batches(&[genre_scores_batch(rows)?])?;
    Ok(())
}
