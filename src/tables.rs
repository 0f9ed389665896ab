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

//! Input table schemas and registration.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::common::exec_datafusion_err;
use datafusion::datasource::file_format::csv::CsvFormat;
use datafusion::datasource::listing::{
    ListingOptions, ListingTable, ListingTableConfig, ListingTableUrl,
};
use datafusion::datasource::MemTable;
use datafusion::error::Result;
use datafusion::prelude::{CsvReadOptions, SessionContext};
use log::info;

use crate::dataset::DatasetPaths;

pub const RATINGS_TABLE: &str = "ratings";
pub const MOVIES_TABLE: &str = "movies";

/// File names as shipped in the MovieLens 20M distribution.
pub const RATINGS_FILE: &str = "rating.csv";
pub const MOVIES_FILE: &str = "movie.csv";

/// One row per rating event. `timestamp` is epoch seconds.
pub fn ratings_schema() -> Schema {
    Schema::new(vec![
        Field::new("userId", DataType::Int64, false),
        Field::new("movieId", DataType::Int64, false),
        Field::new("rating", DataType::Float64, false),
        Field::new("timestamp", DataType::Int64, false),
    ])
}

/// One row per movie. `genres` is a `|`-joined label list.
pub fn movies_schema() -> Schema {
    Schema::new(vec![
        Field::new("movieId", DataType::Int64, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("genres", DataType::Utf8, false),
    ])
}

/// Register both input tables on the context.
///
/// With `mem_table` the CSV files are loaded into memory up front, which pays
/// off when several analyses run in one process; otherwise each query scans
/// the files directly.
pub async fn register_tables(
    ctx: &SessionContext,
    paths: &DatasetPaths,
    mem_table: bool,
) -> Result<()> {
    register_csv_table(ctx, RATINGS_TABLE, &paths.ratings, ratings_schema(), mem_table).await?;
    register_csv_table(ctx, MOVIES_TABLE, &paths.movies, movies_schema(), mem_table).await?;
    Ok(())
}

async fn register_csv_table(
    ctx: &SessionContext,
    name: &str,
    path: &Path,
    schema: Schema,
    mem_table: bool,
) -> Result<()> {
    let path = path
        .to_str()
        .ok_or_else(|| exec_datafusion_err!("non UTF-8 path for table '{name}'"))?;

    if mem_table {
        let format = CsvFormat::default().with_has_header(true);
        let listing_config = ListingTableConfig::new(ListingTableUrl::parse(path)?)
            .with_listing_options(ListingOptions::new(Arc::new(format)))
            .with_schema(Arc::new(schema));
        let csv = ListingTable::try_new(listing_config)?;
        let partitions = ctx.state().config().target_partitions();
        let start = Instant::now();
        let memtable = MemTable::load(Arc::new(csv), Some(partitions), &ctx.state()).await?;
        info!(
            "loaded table '{}' into memory in {} ms",
            name,
            start.elapsed().as_millis()
        );
        ctx.register_table(name, Arc::new(memtable))?;
    } else {
        ctx.register_csv(name, path, CsvReadOptions::new().schema(&schema).has_header(true))
            .await?;
    }
    Ok(())
}
