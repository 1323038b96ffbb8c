//! Pipeline executors for the cleaning and dirty-data directions

use std::time::Instant;

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

use super::config::{CleaningStage, CorruptionStage, WranglerConfig};
use super::error::{ConfigError, PipelineError, PipelineResult};
use super::report::{PipelineKind, PipelineReport, StageOutput};
use crate::audit::AuditSink;
use crate::cleaning::transforms::{
    add_country_count, deduplicate_rows, drop_known_non_movie_rows, merge_director_columns,
    normalize_runtime_column, normalize_year_column, select_columns, split_alternate_title,
    strip_leading_comma, strip_whitespace, substitute_known_misspellings, tag_source_festival,
};
use crate::corruption::{
    CorruptionError, add_misspelling, inject_duplicates, inject_runtime_outliers,
    runtime_format_drift, year_shorthand_drift,
};
use crate::models::Table;
use crate::models::columns::COUNTRY;

/// Hash the config for run reports
fn hash_config(config: &WranglerConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(config).unwrap_or_default());
    format!("{:x}", hasher.finalize())
}

/// Runs every [`CleaningStage`] in order over one table
pub struct CleaningPipeline<'a> {
    config: &'a WranglerConfig,
    sink: &'a dyn AuditSink,
    run_id: String,
    config_hash: String,
}

impl<'a> CleaningPipeline<'a> {
    /// Create a new cleaning pipeline
    pub fn new(config: &'a WranglerConfig, sink: &'a dyn AuditSink) -> PipelineResult<Self> {
        config
            .validate()
            .map_err(|msg| PipelineError::ConfigError(ConfigError::Invalid(msg)))?;
        Ok(Self {
            config,
            sink,
            run_id: Uuid::new_v4().to_string(),
            config_hash: hash_config(config),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Clean a raw table into the staged projection
    pub fn run(&self, mut table: Table) -> PipelineResult<(Table, PipelineReport)> {
        let _span = info_span!("pipeline_run", run_id = %self.run_id, kind = "cleaning").entered();

        let started_at = Utc::now();
        let start = Instant::now();
        let rows_in = table.len();
        info!(run_id = %self.run_id, rows = rows_in, "Starting cleaning pipeline");

        let mut stages = Vec::new();
        for stage in CleaningStage::all() {
            let _stage_span = info_span!("pipeline_stage", stage = stage.name()).entered();
            let stage_start = Instant::now();
            let rows_before = table.len();

            let cells_changed = match self.run_stage(stage, &mut table) {
                Ok(changed) => changed,
                Err(e) => {
                    error!(stage = stage.name(), error = %e, "Stage failed");
                    return Err(e);
                }
            };

            let output = StageOutput::new(stage.name(), rows_before, table.len())
                .with_cells_changed(cells_changed)
                .with_duration(stage_start.elapsed().as_millis() as u64);
            debug!(
                stage = stage.name(),
                rows_before,
                rows_after = output.rows_after,
                cells_changed = ?output.cells_changed,
                "Stage completed"
            );
            stages.push(output);
        }

        let duration = start.elapsed();
        info!(
            run_id = %self.run_id,
            duration_ms = duration.as_millis() as u64,
            rows_in,
            rows_out = table.len(),
            "Cleaning pipeline completed"
        );

        let report = PipelineReport {
            run_id: self.run_id.clone(),
            kind: PipelineKind::Cleaning,
            started_at,
            config_hash: self.config_hash.clone(),
            rows_in,
            rows_out: table.len(),
            duration_ms: duration.as_millis() as u64,
            stages,
        };
        Ok((table, report))
    }

    /// Run a single stage, returning the number of rewritten cells where that applies
    fn run_stage(&self, stage: CleaningStage, table: &mut Table) -> PipelineResult<Option<usize>> {
        let config = self.config;
        let changed = match stage {
            CleaningStage::SplitAlternateTitle => Some(split_alternate_title(table)),
            CleaningStage::StripWhitespace => Some(strip_whitespace(table)),
            CleaningStage::MergeDirectors => {
                merge_director_columns(table);
                None
            }
            CleaningStage::TagFestival => {
                tag_source_festival(table, &config.festival_tag);
                None
            }
            CleaningStage::DropDenylisted => {
                drop_known_non_movie_rows(table, &config.denylist, self.sink);
                None
            }
            CleaningStage::Deduplicate => {
                deduplicate_rows(table, &config.dedup_columns);
                None
            }
            CleaningStage::FixMisspellings => Some(substitute_known_misspellings(
                table,
                COUNTRY,
                &config.known_terms,
            )),
            CleaningStage::NormalizeYear => Some(normalize_year_column(
                table,
                config.year_bounds,
                config.year_range_check,
                self.sink,
            )),
            CleaningStage::StripCountryComma => Some(strip_leading_comma(table, COUNTRY)),
            CleaningStage::CountryCount => {
                add_country_count(table);
                None
            }
            CleaningStage::NormalizeRuntime => Some(normalize_runtime_column(
                table,
                config.runtime_bounds,
                self.sink,
            )),
            CleaningStage::SelectColumns => {
                *table = select_columns(table, &config.output_columns)
                    .map_err(|e| PipelineError::stage_failure(stage.name(), e))?;
                None
            }
        };
        Ok(changed)
    }
}

/// Runs every [`CorruptionStage`] in order over one table
pub struct CorruptionPipeline<'a> {
    config: &'a WranglerConfig,
    sink: &'a dyn AuditSink,
    run_id: String,
    config_hash: String,
}

impl<'a> CorruptionPipeline<'a> {
    /// Create a new dirty-data pipeline
    pub fn new(config: &'a WranglerConfig, sink: &'a dyn AuditSink) -> PipelineResult<Self> {
        config
            .validate()
            .map_err(|msg| PipelineError::ConfigError(ConfigError::Invalid(msg)))?;
        Ok(Self {
            config,
            sink,
            run_id: Uuid::new_v4().to_string(),
            config_hash: hash_config(config),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Inject dirt into a copy of `table`, drawing every sample from `rng`
    pub fn run<R: Rng + ?Sized>(
        &self,
        mut table: Table,
        rng: &mut R,
    ) -> PipelineResult<(Table, PipelineReport)> {
        let _span =
            info_span!("pipeline_run", run_id = %self.run_id, kind = "corruption").entered();

        let started_at = Utc::now();
        let start = Instant::now();
        let rows_in = table.len();
        info!(
            run_id = %self.run_id,
            rows = rows_in,
            seed = ?self.config.corruption.seed,
            "Starting corruption pipeline"
        );

        let mut stages = Vec::new();
        for stage in CorruptionStage::all() {
            let _stage_span = info_span!("pipeline_stage", stage = stage.name()).entered();
            let stage_start = Instant::now();
            let rows_before = table.len();

            let changed = match self.run_stage(stage, &mut table, rng) {
                Ok(changed) => changed,
                Err(e) => {
                    error!(stage = stage.name(), error = %e, "Stage failed");
                    return Err(PipelineError::stage_failure(stage.name(), e));
                }
            };

            let output = StageOutput::new(stage.name(), rows_before, table.len())
                .with_cells_changed((stage != CorruptionStage::Duplicates).then_some(changed))
                .with_duration(stage_start.elapsed().as_millis() as u64);
            debug!(
                stage = stage.name(),
                rows_before,
                rows_after = output.rows_after,
                changed,
                "Stage completed"
            );
            stages.push(output);
        }

        let duration = start.elapsed();
        info!(
            run_id = %self.run_id,
            duration_ms = duration.as_millis() as u64,
            rows_in,
            rows_out = table.len(),
            "Corruption pipeline completed"
        );

        let report = PipelineReport {
            run_id: self.run_id.clone(),
            kind: PipelineKind::Corruption,
            started_at,
            config_hash: self.config_hash.clone(),
            rows_in,
            rows_out: table.len(),
            duration_ms: duration.as_millis() as u64,
            stages,
        };
        Ok((table, report))
    }

    fn run_stage<R: Rng + ?Sized>(
        &self,
        stage: CorruptionStage,
        table: &mut Table,
        rng: &mut R,
    ) -> Result<usize, CorruptionError> {
        let dirt = &self.config.corruption;
        match stage {
            CorruptionStage::Misspellings => {
                let mut changed = 0;
                for m in &dirt.misspellings {
                    changed += add_misspelling(
                        table,
                        &m.column,
                        &m.value,
                        &m.misspelled,
                        m.ratio,
                        rng,
                        self.sink,
                    )?;
                }
                Ok(changed)
            }
            CorruptionStage::RuntimeFormat => {
                runtime_format_drift(table, dirt.runtime_format_ratio, rng, self.sink)
            }
            CorruptionStage::YearShorthand => {
                year_shorthand_drift(table, dirt.year_shorthand_ratio, rng, self.sink)
            }
            CorruptionStage::Duplicates => {
                inject_duplicates(table, dirt.duplicate_ratio, rng, self.sink)
            }
            CorruptionStage::RuntimeOutliers => inject_runtime_outliers(
                table,
                dirt.runtime_outlier_ratio,
                dirt.outlier_range,
                rng,
                self.sink,
            ),
        }
    }
}
