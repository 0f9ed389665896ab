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

//! MovieLens analytics runner: registers the two input tables and executes
//! one or all of the analyses, printing each result table with its timing.

use std::path::PathBuf;
use std::time::Instant;

use datafusion::error::Result;
use datafusion::prelude::{DataFrame, SessionContext};
use movielens_analytics::context::session_context;
use movielens_analytics::dataset;
use movielens_analytics::queries::{activity, genres, movies, users, DEFAULT_TOP_LIMIT};
use movielens_analytics::report;
use movielens_analytics::tables;
use structopt::StructOpt;
use strum::{IntoEnumIterator, VariantNames};
use strum_macros::{Display, EnumIter, EnumString, VariantNames};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, VariantNames)]
#[strum(serialize_all = "kebab-case")]
enum Analysis {
    All,
    LowestRated,
    TopUsers,
    DailyVolume,
    TopRated,
    Controversial,
    GenreAverages,
}

#[derive(Debug, StructOpt)]
#[structopt(name = "movielens", about = "MovieLens rating analytics")]
struct Opt {
    /// Analysis to run
    #[structopt(
        short,
        long,
        default_value = "all",
        possible_values = Analysis::VARIANTS
    )]
    analysis: Analysis,

    /// Directory containing rating.csv and movie.csv
    #[structopt(parse(from_os_str), short, long)]
    path: Option<PathBuf>,

    /// Dataset repository to fetch the CSV files from when no --path is given
    #[structopt(long)]
    dataset: Option<String>,

    /// Number of partitions to process in parallel
    #[structopt(short = "n", long = "partitions", default_value = "2")]
    partitions: usize,

    /// Batch size when reading CSV files
    #[structopt(short = "s", long = "batch-size", default_value = "8192")]
    batch_size: usize,

    /// Minimum number of ratings for the top-rated and controversial rankings
    #[structopt(long = "min-votes", default_value = "50")]
    min_votes: i64,

    /// Load the tables into memory before executing the queries
    #[structopt(short = "m", long = "mem-table")]
    mem_table: bool,

    /// Activate debug mode to see logical plans
    #[structopt(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    println!("Running MovieLens analytics with the following options: {opt:?}");

    let paths = dataset::resolve(opt.path.clone(), opt.dataset.clone()).await?;
    let ctx = session_context(opt.partitions, opt.batch_size);
    tables::register_tables(&ctx, &paths, opt.mem_table).await?;

    match opt.analysis {
        Analysis::All => {
            for analysis in Analysis::iter().filter(|a| *a != Analysis::All) {
                run_analysis(&ctx, analysis, &opt).await?;
            }
        }
        analysis => run_analysis(&ctx, analysis, &opt).await?,
    }
    Ok(())
}

async fn run_analysis(ctx: &SessionContext, analysis: Analysis, opt: &Opt) -> Result<()> {
    if opt.debug {
        let frame = analysis_frame(ctx, analysis, opt).await?;
        println!(
            "=== Logical plan: {analysis} ===\n{}\n",
            frame.logical_plan().display_indent()
        );
    }

    let start = Instant::now();
    match analysis {
        Analysis::LowestRated => println!("{}", movies::lowest_rated_movie(ctx).await?),
        Analysis::TopUsers => {
            report::print_user_activity(&users::top_users(ctx, DEFAULT_TOP_LIMIT).await?)?
        }
        Analysis::DailyVolume => {
            report::print_daily_counts(&activity::daily_rating_counts(ctx).await?)?
        }
        Analysis::TopRated => report::print_movie_scores(
            &movies::top_rated_movies(ctx, opt.min_votes, DEFAULT_TOP_LIMIT).await?,
        )?,
        Analysis::Controversial => report::print_movie_spreads(
            &movies::controversial_movies(ctx, opt.min_votes, DEFAULT_TOP_LIMIT).await?,
        )?,
        Analysis::GenreAverages => {
            report::print_genre_scores(&genres::genre_averages(ctx).await?)?
        }
        Analysis::All => unreachable!(),
    }
    println!(
        "{analysis} took {:.1} ms\n",
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

async fn analysis_frame(
    ctx: &SessionContext,
    analysis: Analysis,
    opt: &Opt,
) -> Result<DataFrame> {
    match analysis {
        Analysis::LowestRated => movies::lowest_average_frame(ctx).await,
        Analysis::TopUsers => users::top_users_frame(ctx, DEFAULT_TOP_LIMIT).await,
        Analysis::DailyVolume => activity::daily_counts_frame(ctx).await,
        Analysis::TopRated => {
            movies::top_rated_frame(ctx, opt.min_votes, DEFAULT_TOP_LIMIT).await
        }
        Analysis::Controversial => {
            movies::controversial_frame(ctx, opt.min_votes, DEFAULT_TOP_LIMIT).await
        }
        Analysis::GenreAverages => genres::genre_averages_frame(ctx).await,
        Analysis::All => unreachable!(),
    }
}
