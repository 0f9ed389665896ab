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

//! Per-movie rating statistics: worst average, best averages above a vote
//! threshold, and widest rating spread.

use datafusion::arrow::array::{Array, AsArray};
use datafusion::arrow::datatypes::{Float64Type, Int64Type};
use datafusion::error::Result;
use datafusion::functions_aggregate::expr_fn::{avg, count, stddev};
use datafusion::prelude::*;

use crate::tables::{MOVIES_TABLE, RATINGS_TABLE};

/// One movie in the top-rated ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieScore {
    pub rank: u32,
    pub title: String,
    pub avg_rating: f64,
    pub num_ratings: i64,
}

/// One movie in the most-controversial ranking. `stddev_rating` is the
/// sample standard deviation of its ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSpread {
    pub rank: u32,
    pub title: String,
    pub avg_rating: f64,
    pub stddev_rating: f64,
    pub num_ratings: i64,
}

/// Mean rating per movie, worst first.
pub async fn lowest_average_frame(ctx: &SessionContext) -> Result<DataFrame> {
    ctx.table(RATINGS_TABLE)
        .await?
        .select(vec![col("movieId"), col("rating")])?
        .aggregate(
            vec![col("movieId")],
            vec![avg(col("rating")).alias("avg_rating")],
        )?
        .sort(vec![
            col("avg_rating").sort(true, false),
            col("movieId").sort(true, false),
        ])
}

/// Formatted sentence naming the single worst-rated movie.
///
/// Returns a fixed message when the ratings table is empty, and falls back to
/// `"Unknown Title"` when the movie id has no row in `movies`.
pub async fn lowest_rated_movie(ctx: &SessionContext) -> Result<String> {
    let lowest = lowest_average_frame(ctx)
        .await?
        .limit(0, Some(1))?
        .collect()
        .await?;

    let Some(batch) = lowest.iter().find(|b| b.num_rows() > 0) else {
        return Ok("No valid average ratings found.".to_string());
    };
    let movie_id = batch.column(0).as_primitive::<Int64Type>().value(0);
    let avg_rating = batch.column(1).as_primitive::<Float64Type>().value(0);

    let title_batches = ctx
        .table(MOVIES_TABLE)
        .await?
        .filter(col("movieId").eq(lit(movie_id)))?
        .select(vec![col("title")])?
        .limit(0, Some(1))?
        .collect()
        .await?;
    let title = title_batches
        .iter()
        .find(|b| b.num_rows() > 0)
        .map(|b| b.column(0).as_string::<i32>().value(0).to_string())
        .unwrap_or_else(|| "Unknown Title".to_string());

    Ok(format!("Lowest rated movie: {title} ({avg_rating:.2})"))
}

/// Best averages among movies with at least `min_votes` ratings, joined to
/// their titles. Movies missing from `movies` drop out of the ranking.
pub async fn top_rated_frame(
    ctx: &SessionContext,
    min_votes: i64,
    limit: usize,
) -> Result<DataFrame> {
    let movies = ctx.table(MOVIES_TABLE).await?;
    ctx.table(RATINGS_TABLE)
        .await?
        .aggregate(
            vec![col("movieId")],
            vec![
                avg(col("rating")).alias("avg_rating"),
                count(col("rating")).alias("num_ratings"),
            ],
        )?
        .filter(col("num_ratings").gt_eq(lit(min_votes)))?
        .sort(vec![
            col("avg_rating").sort(false, false),
            col("movieId").sort(true, false),
        ])?
        .limit(0, Some(limit))?
        .join(movies, JoinType::Inner, &["movieId"], &["movieId"], None)?
        .select(vec![col("title"), col("avg_rating"), col("num_ratings")])?
        .sort(vec![
            col("avg_rating").sort(false, false),
            col("title").sort(true, false),
        ])
}

/// The `limit` highest-rated movies with at least `min_votes` ratings,
/// ranked 1..N.
pub async fn top_rated_movies(
    ctx: &SessionContext,
    min_votes: i64,
    limit: usize,
) -> Result<Vec<MovieScore>> {
    let batches = top_rated_frame(ctx, min_votes, limit).await?.collect().await?;

    let mut rows = Vec::new();
    for batch in &batches {
        let titles = batch.column(0).as_string::<i32>();
        let avgs = batch.column(1).as_primitive::<Float64Type>();
        let counts = batch.column(2).as_primitive::<Int64Type>();
        for i in 0..batch.num_rows() {
            rows.push(MovieScore {
                rank: rows.len() as u32 + 1,
                title: titles.value(i).to_string(),
                avg_rating: avgs.value(i),
                num_ratings: counts.value(i),
            });
        }
    }
    Ok(rows)
}

/// Rating dispersion per movie above a count threshold, widest spread first.
/// The row cap lands after the title join, mirroring the vote-threshold
/// ranking's inner-join drop rule.
pub async fn controversial_frame(
    ctx: &SessionContext,
    min_ratings: i64,
    limit: usize,
) -> Result<DataFrame> {
    let movies = ctx.table(MOVIES_TABLE).await?;
    ctx.table(RATINGS_TABLE)
        .await?
        .aggregate(
            vec![col("movieId")],
            vec![
                count(col("rating")).alias("num_ratings"),
                avg(col("rating")).alias("avg_rating"),
                stddev(col("rating")).alias("stddev_rating"),
            ],
        )?
        .filter(col("num_ratings").gt_eq(lit(min_ratings)))?
        .join(movies, JoinType::Inner, &["movieId"], &["movieId"], None)?
        .select(vec![
            col("title"),
            col("avg_rating"),
            col("stddev_rating"),
            col("num_ratings"),
        ])?
        .sort(vec![
            col("stddev_rating").sort(false, false),
            col("title").sort(true, false),
        ])?
        .limit(0, Some(limit))
}

/// The `limit` movies whose ratings disagree the most, ranked 1..N.
pub async fn controversial_movies(
    ctx: &SessionContext,
    min_ratings: i64,
    limit: usize,
) -> Result<Vec<MovieSpread>> {
    let batches = controversial_frame(ctx, min_ratings, limit)
        .await?
        .collect()
        .await?;

    let mut rows = Vec::new();
    for batch in &batches {
        let titles = batch.column(0).as_string::<i32>();
        let avgs = batch.column(1).as_primitive::<Float64Type>();
        let stddevs = batch.column(2).as_primitive::<Float64Type>();
        let counts = batch.column(3).as_primitive::<Int64Type>();
        for i in 0..batch.num_rows() {
            // a single-rating movie has no sample deviation
            let stddev_rating = if stddevs.is_null(i) {
                f64::NAN
            } else {
                stddevs.value(i)
            };
            rows.push(MovieSpread {
                rank: rows.len() as u32 + 1,
                title: titles.value(i).to_string(),
                avg_rating: avgs.value(i),
                stddev_rating,
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
    async fn lowest_rated_movie_averages_its_ratings() -> Result<()> {
        let ctx = fixtures::context(
            &[(1, 10, 5.0, 1000), (2, 10, 1.0, 1000)],
            &[(10, "X", "Action")],
        )
        .await?;

        let message = lowest_rated_movie(&ctx).await?;
        assert_eq!(message, "Lowest rated movie: X (3.00)");
        Ok(())
    }

    #[tokio::test]
    async fn lowest_rated_movie_picks_the_minimum_average() -> Result<()> {
        let ctx = fixtures::context(
            &[
                (1, 10, 5.0, 1000),
                (2, 10, 4.0, 1000),
                (1, 11, 2.0, 1000),
                (2, 11, 1.0, 1000),
                (1, 12, 3.0, 1000),
            ],
            &[
                (10, "Good", "Drama"),
                (11, "Bad", "Drama"),
                (12, "Mid", "Drama"),
            ],
        )
        .await?;

        let message = lowest_rated_movie(&ctx).await?;
        assert_eq!(message, "Lowest rated movie: Bad (1.50)");
        Ok(())
    }

    #[tokio::test]
    async fn lowest_rated_movie_reports_empty_ratings() -> Result<()> {
        let ctx = fixtures::context(&[], &[(10, "X", "Action")]).await?;
        assert_eq!(
            lowest_rated_movie(&ctx).await?,
            "No valid average ratings found."
        );
        Ok(())
    }

    #[tokio::test]
    async fn lowest_rated_movie_falls_back_on_missing_title() -> Result<()> {
        let ctx = fixtures::context(&[(1, 99, 2.0, 1000)], &[(10, "X", "Action")]).await?;
        assert_eq!(
            lowest_rated_movie(&ctx).await?,
            "Lowest rated movie: Unknown Title (2.00)"
        );
        Ok(())
    }

    #[tokio::test]
    async fn top_rated_enforces_the_vote_threshold() -> Result<()> {
        // movie 10 has the best average but only two votes
        let ctx = fixtures::context(
            &[
                (1, 10, 5.0, 1000),
                (2, 10, 5.0, 1000),
                (1, 11, 4.0, 1000),
                (2, 11, 4.0, 1000),
                (3, 11, 4.0, 1000),
                (1, 12, 3.0, 1000),
                (2, 12, 3.0, 1000),
                (3, 12, 3.0, 1000),
            ],
            &[
                (10, "Few Votes", "Drama"),
                (11, "Winner", "Drama"),
                (12, "Runner Up", "Drama"),
            ],
        )
        .await?;

        let rows = top_rated_movies(&ctx, 3, 10).await?;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.num_ratings >= 3));
        assert_eq!(rows[0].title, "Winner");
        assert_eq!(rows[1].title, "Runner Up");
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn top_rated_drops_movies_without_a_title_row() -> Result<()> {
        let ctx = fixtures::context(
            &[(1, 10, 5.0, 1000), (1, 99, 5.0, 1000)],
            &[(10, "Known", "Drama")],
        )
        .await?;

        let rows = top_rated_movies(&ctx, 1, 10).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Known");
        Ok(())
    }

    #[tokio::test]
    async fn controversial_ranks_by_sample_stddev() -> Result<()> {
        // movie 10: ratings 1 and 5 (sd = sqrt(8)); movie 11: constant 3s
        let ctx = fixtures::context(
            &[
                (1, 10, 1.0, 1000),
                (2, 10, 5.0, 1000),
                (1, 11, 3.0, 1000),
                (2, 11, 3.0, 1000),
            ],
            &[(10, "Split", "Drama"), (11, "Flat", "Drama")],
        )
        .await?;

        let rows = controversial_movies(&ctx, 2, 10).await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Split");
        assert!((rows[0].stddev_rating - 8.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(rows[1].title, "Flat");
        assert_eq!(rows[1].stddev_rating, 0.0);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn controversial_enforces_the_count_threshold() -> Result<()> {
        let ctx = fixtures::context(
            &[
                (1, 10, 1.0, 1000),
                (2, 10, 5.0, 1000),
                (3, 10, 3.0, 1000),
                (1, 11, 1.0, 1000),
                (2, 11, 5.0, 1000),
            ],
            &[(10, "Kept", "Drama"), (11, "Dropped", "Drama")],
        )
        .await?;

        let rows = controversial_movies(&ctx, 3, 10).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Kept");
        assert!(rows.iter().all(|r| r.num_ratings >= 3));
        Ok(())
    }
}
