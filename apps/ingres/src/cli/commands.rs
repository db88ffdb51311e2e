//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::{api, config::Config};
use ingres_core::{
    Chatbot, DataSources, Dataset, IngresError, Language, Overview, SynthConfig, export_csv,
    generate, normalize_upload, primitives::MAX_UPLOAD_BYTES,
};
use std::path::{Path, PathBuf};

// =============================================================================
// PATH VALIDATION
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), IngresError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| IngresError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(IngresError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and require a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, IngresError> {
    let canonical = path.canonicalize().map_err(|e| {
        IngresError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(IngresError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalize the parent of an output path, which must be an existing
/// directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, IngresError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        IngresError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(IngresError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| IngresError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

/// Merge the configured data files into a dataset.
pub fn load_dataset(config: &Config) -> Dataset {
    Dataset::new(DataSources::in_dir(&config.data_dir).load_merged())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: Config) -> Result<(), IngresError> {
    println!("INGRES Groundwater Monitoring Backend Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:        {}", config.host);
    println!("  Port:        {}", config.port);
    println!("  Environment: {}", config.environment);
    println!("  Data Dir:    {}", config.data_dir.display());
    println!();
    println!("Endpoints:");
    println!("  GET  /health              - Health check");
    println!("  POST /api/auth/login      - Log in");
    println!("  GET  /api/data/overview   - Network statistics");
    println!("  GET  /api/data/map        - Map markers");
    println!("  POST /api/chatbot         - Ask the chatbot");
    println!("  POST /api/admin/upload-csv - Replace the dataset (admin)");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config).await
}

// =============================================================================
// OVERVIEW COMMAND
// =============================================================================

/// Show network statistics.
pub fn cmd_overview(config: &Config, json_mode: bool) -> Result<(), IngresError> {
    let dataset = load_dataset(config);
    let o = Overview::from_records(dataset.records());

    if json_mode {
        let output = serde_json::to_value(&o)?;
        print_json(&output);
        return Ok(());
    }

    println!("INGRES Network Overview");
    println!("=======================");
    println!("Data Dir: {}", config.data_dir.display());
    println!();
    println!("Wells:          {}", o.total_sites);
    println!("  Active:       {}", o.active_sites);
    println!("  Maintenance:  {}", o.maintenance_sites);
    println!();
    println!("Avg TDS:        {} ppm", o.avg_tds);
    println!("Avg pH:         {}", o.avg_ph);
    println!("Avg Yield:      {} LPH", o.avg_yield);
    println!("Avg Water Lvl:  {} m", o.avg_water_level);
    println!();
    println!(
        "Risk:           {} high, {} moderate, {} low",
        o.high_risk_sites,
        o.moderate_risk_sites,
        o.low_risk_sites()
    );
    println!("Safe:           {:.1}%", o.safety_rate_percent());
    println!("Shallow Alerts: {}", o.shallow_water_alerts);
    println!(
        "Recharge:       {} rising, {} stable, {} declining",
        o.rising_sites, o.stable_sites, o.declining_sites
    );
    println!(
        "Last Survey:    {}",
        o.latest_inspection.as_deref().unwrap_or("N/A")
    );
    println!("Districts:      {}", o.districts.len());

    Ok(())
}

// =============================================================================
// ASK COMMAND
// =============================================================================

/// Run one chatbot exchange against the local data files.
pub fn cmd_ask(
    config: &Config,
    json_mode: bool,
    message: &str,
    language: Option<&str>,
) -> Result<(), IngresError> {
    let language = match language {
        Some(code) => Some(Language::from_code(code).ok_or_else(|| {
            IngresError::InvalidInput(format!(
                "Unknown language: {}. Use: en, ta, hi, te",
                code
            ))
        })?),
        None => None,
    };

    let dataset = load_dataset(config);
    let answer = Chatbot::new(&dataset).respond(message, language)?;

    if json_mode {
        let output = serde_json::to_value(&answer)?;
        print_json(&output);
        return Ok(());
    }

    println!("{}", answer.reply);
    println!();
    println!("Try asking:");
    for suggestion in &answer.suggestions {
        println!("  - {}", suggestion);
    }

    Ok(())
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Normalise a CSV upload and make it the primary data file.
pub fn cmd_import(config: &Config, json_mode: bool, file: &Path) -> Result<(), IngresError> {
    let validated = validate_file_path(file)?;
    validate_file_size(&validated, MAX_UPLOAD_BYTES as u64)?;

    let text = std::fs::read_to_string(&validated)?;
    let records = normalize_upload(&text)?;
    let sources = DataSources::in_dir(&config.data_dir);
    sources.persist(&records)?;

    if json_mode {
        print_json(&serde_json::json!({
            "success": true,
            "imported": records.len(),
            "path": sources.primary.to_string_lossy(),
        }));
    } else {
        println!(
            "Imported {} records into {}",
            records.len(),
            sources.primary.display()
        );
    }

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write the merged dataset as CSV.
pub fn cmd_export(config: &Config, output: &Path) -> Result<(), IngresError> {
    let validated_output = validate_output_path(output)?;
    let dataset = load_dataset(config);

    let file = std::fs::File::create(&validated_output)?;
    export_csv(dataset.records(), file)?;

    println!(
        "Exported {} records to {}",
        dataset.len(),
        validated_output.display()
    );

    Ok(())
}

// =============================================================================
// GENERATE COMMAND
// =============================================================================

/// Write a synthetic dataset, by default over the primary data file.
pub fn cmd_generate(
    config: &Config,
    json_mode: bool,
    output: Option<&Path>,
    seed: Option<u64>,
) -> Result<(), IngresError> {
    let mut synth = SynthConfig::new(chrono::Local::now().date_naive());
    if let Some(seed) = seed {
        synth = synth.with_seed(seed);
    }
    let records = generate(&synth);

    let path = match output {
        Some(output) => {
            let validated = validate_output_path(output)?;
            let json = serde_json::to_string_pretty(&records)?;
            std::fs::write(&validated, json)?;
            validated
        }
        None => {
            let sources = DataSources::in_dir(&config.data_dir);
            sources.persist(&records)?;
            sources.primary
        }
    };

    if json_mode {
        print_json(&serde_json::json!({
            "success": true,
            "generated": records.len(),
            "path": path.to_string_lossy(),
        }));
    } else {
        println!("Generated {} wells into {}", records.len(), path.display());
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
