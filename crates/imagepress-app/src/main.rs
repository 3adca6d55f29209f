// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Imagepress — images to PDF from the command line.
//
// Entry point. Initialises logging, loads settings, merges command-line
// overrides into a `PipelineConfig`, runs the conversion, and reports the
// outcome in plain English.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use imagepress_core::error::{ImagePressError, Result};
use imagepress_core::human_errors::{humanize_error, success_message};
use imagepress_core::{AppConfig, ConversionSummary, FilterKind, PipelineConfig};
use imagepress_document::ImagePipeline;

use services::{inputs, settings};

/// Convert images into a single PDF, one page per image.
#[derive(Debug, Parser)]
#[command(name = "imagepress", version, about)]
struct Cli {
    /// Image files or directories of images (png, jpg, jpeg, bmp, tif, tiff).
    inputs: Vec<PathBuf>,

    /// Output PDF path. Defaults to the first input's name with a .pdf extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JPEG quality for the compression pass; values outside 1-100 are clamped.
    #[arg(short, long, allow_negative_numbers = true)]
    quality: Option<i32>,

    /// Text stamped near the bottom-right corner of every page.
    #[arg(short, long, conflicts_with = "no_watermark")]
    watermark: Option<String>,

    /// Disable a watermark saved in the settings file.
    #[arg(long)]
    no_watermark: bool,

    /// Filter applied before the watermark: none, grayscale, or blur.
    #[arg(short, long, value_parser = parse_filter)]
    filter: Option<FilterKind>,

    /// Title stored in the PDF metadata.
    #[arg(long)]
    title: Option<String>,

    /// Settings file to load instead of the default one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective quality, watermark, and filter as the new defaults.
    #[arg(long)]
    save_defaults: bool,
}

fn parse_filter(value: &str) -> std::result::Result<FilterKind, String> {
    value.parse::<FilterKind>().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(summary) => {
            println!("{}", success_message(&summary.output));
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, kind = ?err.kind(), "conversion failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ConversionSummary> {
    let settings_path = cli.config.clone().unwrap_or_else(settings::default_path);
    let app_config = match &cli.config {
        Some(path) => settings::load_from(path)?,
        None => settings::load_or_default(&settings_path),
    };

    let config = merge_overrides(&app_config, &cli);
    if cli.save_defaults {
        let updated = AppConfig {
            defaults: config.clone(),
            ..app_config.clone()
        };
        settings::persist(&settings_path, &updated)?;
    }

    let paths = inputs::expand_inputs(&cli.inputs)?;
    let Some(output) = inputs::resolve_output(
        cli.output.as_deref(),
        paths.first().map(PathBuf::as_path),
    ) else {
        return Err(ImagePressError::NoInput);
    };

    tracing::info!(
        inputs = paths.len(),
        output = %output.display(),
        "Imagepress starting"
    );

    let mut pipeline = ImagePipeline::new(config);
    if let Some(title) = cli.title.or(app_config.document_title) {
        pipeline = pipeline.with_title(title);
    }
    pipeline.convert_paths(&paths, &output)
}

/// Command-line flags take precedence over the settings file.
fn merge_overrides(app_config: &AppConfig, cli: &Cli) -> PipelineConfig {
    let defaults = &app_config.defaults;
    let text = cli.watermark.as_deref().or(defaults.watermark());
    PipelineConfig::from_form(
        cli.quality.unwrap_or(defaults.quality),
        text.is_some() && !cli.no_watermark,
        text.unwrap_or_default(),
        cli.filter.unwrap_or(defaults.filter),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let app_config = AppConfig {
            defaults: PipelineConfig::new()
                .with_quality(40)
                .with_filter(FilterKind::Blur),
            document_title: None,
        };
        let cli = Cli::parse_from(["imagepress", "a.png", "-q", "90", "--watermark", "DRAFT"]);

        let config = merge_overrides(&app_config, &cli);
        assert_eq!(config.quality, 90);
        assert_eq!(config.watermark(), Some("DRAFT"));
        assert_eq!(config.filter, FilterKind::Blur);
    }

    #[test]
    fn no_watermark_clears_saved_text() {
        let app_config = AppConfig {
            defaults: PipelineConfig::new().with_watermark("CONFIDENTIAL"),
            document_title: None,
        };

        let kept = merge_overrides(&app_config, &Cli::parse_from(["imagepress", "a.png"]));
        assert_eq!(kept.watermark(), Some("CONFIDENTIAL"));

        let cleared = merge_overrides(
            &app_config,
            &Cli::parse_from(["imagepress", "a.png", "--no-watermark"]),
        );
        assert_eq!(cleared.watermark(), None);

        assert!(
            Cli::try_parse_from(["imagepress", "a.png", "-w", "DRAFT", "--no-watermark"]).is_err()
        );
    }

    #[test]
    fn filter_flag_parses() {
        let cli = Cli::parse_from(["imagepress", "a.png", "--filter", "Grayscale"]);
        assert_eq!(cli.filter, Some(FilterKind::Grayscale));
        assert!(Cli::try_parse_from(["imagepress", "a.png", "--filter", "sepia"]).is_err());
    }

    #[test]
    fn negative_quality_is_accepted_for_clamping() {
        let cli = Cli::parse_from(["imagepress", "a.png", "--quality", "-3"]);
        let config = merge_overrides(&AppConfig::default(), &cli);
        assert_eq!(config.effective_quality(), 1);
    }

    #[test]
    fn no_inputs_is_no_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("settings.json");
        std::fs::write(&config_path, "{}").unwrap();
        let cli = Cli::parse_from([
            "imagepress".to_string(),
            "--config".to_string(),
            config_path.display().to_string(),
        ]);

        let err = run(cli).unwrap_err();
        assert!(matches!(err, ImagePressError::NoInput));
    }

    #[test]
    fn converts_a_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("settings.json");
        std::fs::write(&config_path, "{}").unwrap();
        let images = dir.path().join("scans");
        std::fs::create_dir(&images).unwrap();
        for name in ["p1.png", "p2.png"] {
            image::RgbImage::from_pixel(24, 24, image::Rgb([30, 60, 90]))
                .save(images.join(name))
                .unwrap();
        }
        let output = dir.path().join("scans-out");

        let cli = Cli::parse_from([
            "imagepress".to_string(),
            images.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
            "--config".to_string(),
            config_path.display().to_string(),
        ]);
        let summary = run(cli).unwrap();

        assert_eq!(summary.page_count(), 2);
        assert_eq!(summary.output, dir.path().join("scans-out.pdf"));
        assert!(summary.output.exists());
    }
}
