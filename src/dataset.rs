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

//! Dataset resolution.
//!
//! The two MovieLens CSV files either already live in a local directory
//! (`--path`) or are fetched from a Hugging Face dataset repository into the
//! hub's local cache. Download and caching are entirely the hub client's
//! concern; this module only maps the outcome onto two file paths.

use std::path::{Path, PathBuf};

use datafusion::common::exec_datafusion_err;
use datafusion::error::{DataFusionError, Result};
use hf_hub::api::sync::Api;
use log::info;

use crate::tables::{MOVIES_FILE, RATINGS_FILE};

/// Local paths of the two input files, wherever they came from.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub ratings: PathBuf,
    pub movies: PathBuf,
}

/// Resolve the dataset to local file paths.
///
/// A local directory takes precedence; otherwise both files are fetched from
/// the given dataset repository. Exactly one of the two sources must be
/// provided.
pub async fn resolve(path: Option<PathBuf>, dataset: Option<String>) -> Result<DatasetPaths> {
    match (path, dataset) {
        (Some(dir), _) => local(&dir),
        (None, Some(repo)) => fetch(repo).await,
        (None, None) => Err(exec_datafusion_err!(
            "no dataset source given: pass --path <dir> or --dataset <repo>"
        )),
    }
}

fn local(dir: &Path) -> Result<DatasetPaths> {
    let ratings = dir.join(RATINGS_FILE);
    let movies = dir.join(MOVIES_FILE);
    for file in [&ratings, &movies] {
        if !file.is_file() {
            return Err(exec_datafusion_err!("{} not found", file.display()));
        }
    }
    Ok(DatasetPaths { ratings, movies })
}

/// Fetch both CSV files through the hub client. The client keeps a local
/// cache, so repeated runs do not download again.
async fn fetch(repo: String) -> Result<DatasetPaths> {
    info!("fetching dataset '{repo}' via the hub cache");
    let paths = tokio::task::spawn_blocking(move || {
        let api = Api::new()?;
        let repo = api.dataset(repo);
        let ratings = repo.get(RATINGS_FILE)?;
        let movies = repo.get(MOVIES_FILE)?;
        Ok::<_, hf_hub::api::sync::ApiError>(DatasetPaths { ratings, movies })
    })
    .await
    .map_err(|e| exec_datafusion_err!("dataset fetch task failed: {e}"))?
    .map_err(|e| DataFusionError::External(Box::new(e)))?;

    info!("dataset files: {paths:?}");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_requires_a_source() {
        let err = resolve(None, None).await.unwrap_err();
        assert!(err.to_string().contains("no dataset source"));
    }

    #[tokio::test]
    async fn resolve_rejects_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RATINGS_FILE), "userId,movieId,rating,timestamp\n")
            .unwrap();
        // movie.csv is absent
        let err = resolve(Some(dir.path().to_path_buf()), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains(MOVIES_FILE));
    }

    #[tokio::test]
    async fn resolve_accepts_a_complete_directory() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RATINGS_FILE), "userId,movieId,rating,timestamp\n")
            .unwrap();
        std::fs::write(dir.path().join(MOVIES_FILE), "movieId,title,genres\n").unwrap();
        let paths = resolve(Some(dir.path().to_path_buf()), None).await?;
        assert!(paths.ratings.ends_with(RATINGS_FILE));
        assert!(paths.movies.ends_with(MOVIES_FILE));
        Ok(())
    }
}
