//! Application setup and pipeline orchestration.

pub mod config;

pub use config::Config;

use crate::{
  db,
  error::PipelineError,
  models::report::{ProjectionReport, RunReport, StageReport},
  project::project_all,
  staging::{SqliteStagingStore, stage_sample},
};
use sqlx::SqlitePool;
use tracing::info;

/// One unit of the pipeline. Each is idempotent and safe to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  EnsureSchema,
  StageSample,
  ProjectAll,
}

/// Open connections to both stores.
#[derive(Clone)]
pub struct AppState {
  pub db: SqlitePool,
  pub staging: SqliteStagingStore,
}

impl AppState {
  pub async fn connect(config: &Config) -> Result<Self, PipelineError> {
    let db = db::connect(&config.database_url, config.max_connections).await?;
    let staging_pool = db::connect(&config.staging_url, config.max_connections).await?;
    Ok(AppState {
      db,
      staging: SqliteStagingStore::new(staging_pool),
    })
  }

  /// Relational tables plus the staging collection.
  pub async fn ensure_schema(&self) -> Result<(), PipelineError> {
    db::ensure_schema(&self.db).await?;
    self.staging.ensure_schema().await?;
    info!("schema ready");
    Ok(())
  }

  pub async fn stage_sample(&self, config: &Config) -> Result<StageReport, PipelineError> {
    Ok(stage_sample(&self.staging, &config.sample_source, config.sample_size).await?)
  }

  pub async fn project_all(&self, config: &Config) -> Result<ProjectionReport, PipelineError> {
    project_all(&self.staging, &self.db, config.workers).await
  }

  pub async fn run_step(&self, config: &Config, step: Step) -> Result<RunReport, PipelineError> {
    let mut report = RunReport::default();
    match step {
      Step::EnsureSchema => self.ensure_schema().await?,
      Step::StageSample => report.staged = Some(self.stage_sample(config).await?),
      Step::ProjectAll => report.projected = Some(self.project_all(config).await?),
    }
    Ok(report)
  }

  /// Schema, then staging, then projection; stops at the first failing step.
  pub async fn run_all(&self, config: &Config) -> Result<RunReport, PipelineError> {
    self.ensure_schema().await?;
    let staged = self.stage_sample(config).await?;
    let projected = self.project_all(config).await?;
    Ok(RunReport {
      staged: Some(staged),
      projected: Some(projected),
    })
  }
}

/// Run one step, or the whole pipeline when `step` is `None`.
pub async fn run(config: Config, step: Option<Step>) -> Result<RunReport, PipelineError> {
  crate::util::init_tracing();
  info!("relational store: {}", config.database_url);
  info!("staging store:    {}", config.staging_url);

  let state = AppState::connect(&config).await?;
  match step {
    Some(step) => state.run_step(&config, step).await,
    None => state.run_all(&config).await,
  }
}
