//! Court CLI Library
//!
//! Detection JSON → pipeline → response JSON (+ optional stats CSV)

use anyhow::{bail, Context, Result};
use court_core::api::StatsRow;
use court_core::{CourtPipeline, MatchRequest, MatchResponse, PipelineConfig, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What one `analyze` run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub frame_count: usize,
    pub selected_players: [u32; 2],
    pub shot_count: usize,
    pub interval_count: usize,
    /// Generation time (RFC3339)
    pub created_at: String,
}

/// Read and version-check an analysis request.
pub fn load_request(path: &Path) -> Result<MatchRequest> {
    let json_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let request: MatchRequest = serde_json::from_str(&json_str)
        .with_context(|| format!("Failed to parse match request: {}", path.display()))?;

    if request.schema_version != SCHEMA_VERSION {
        bail!("Unsupported schema version: {}", request.schema_version);
    }
    Ok(request)
}

/// Explicit config file, else the request's embedded config, else `COURT_CONFIG_PATH`/defaults.
pub fn resolve_config(config_path: Option<&Path>, request: &MatchRequest) -> Result<PipelineConfig> {
    if let Some(path) = config_path {
        return PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()));
    }
    match &request.config {
        Some(config) => Ok(config.clone().validated()?),
        None => Ok(PipelineConfig::from_env_or_default()?),
    }
}

/// Run the pipeline on `input` and write the response to `output`.
pub fn run_analyze(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    stats_csv: Option<&Path>,
    pretty: bool,
) -> Result<AnalysisSummary> {
    let request = load_request(input)?;
    let config = resolve_config(config_path, &request)?;
    let (_, match_input) = request.into_parts();

    let analysis = CourtPipeline::new(config)
        .run(&match_input)
        .context("Match analysis failed")?;
    let response = MatchResponse::from_analysis(&analysis);

    let response_json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    fs::write(output, response_json)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;
    tracing::info!(path = %output.display(), "response written");

    if let Some(csv_path) = stats_csv {
        write_stats_csv(csv_path, &response.stats)?;
    }

    Ok(AnalysisSummary {
        frame_count: response.frame_count,
        selected_players: response.selected_players,
        shot_count: response.shot_frames.len(),
        interval_count: response.shots.len(),
        created_at: response.generated_at.to_rfc3339(),
    })
}

/// One CSV row per frame; unavailable averages are empty cells.
pub fn write_stats_csv(path: &Path, rows: &[StatsRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV: {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = rows.len(), "stats table written");
    Ok(())
}

/// JSON schema of the request; written to `out` when given.
pub fn write_schema(out: Option<&Path>) -> Result<String> {
    let schema = court_core::input_schema_json().map_err(anyhow::Error::msg)?;
    if let Some(path) = out {
        fs::write(path, &schema)
            .with_context(|| format!("Failed to write schema: {}", path.display()))?;
    }
    Ok(schema)
}
