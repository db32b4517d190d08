mod config;
mod data;
mod pivot;
mod rank;
mod render;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use config::{TableConfig, load_config};
use data::loader::{load_file, to_csv};
use render::Layout;

/// Turn experiment results (.csv / .json / .parquet) into LaTeX tables.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Results file with model, dataset, output_len, mse and mae columns.
    input: PathBuf,

    /// Table shape. Defaults to the config file's layout, then `pivot`.
    #[arg(long, value_enum)]
    layout: Option<Layout>,

    /// TOML file with table options.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    caption: Option<String>,

    #[arg(long)]
    label: Option<String>,

    /// Wrap the pivot table in a \resizebox to fit the column width.
    #[arg(long)]
    resize: bool,

    /// Models to show, in order (comma separated).
    #[arg(long, value_delimiter = ',')]
    models: Option<Vec<String>>,

    /// Datasets to show, in order (comma separated).
    #[arg(long, value_delimiter = ',')]
    datasets: Option<Vec<String>>,

    /// Write re-serialised CSV instead of LaTeX.
    #[arg(long)]
    to_csv: bool,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    /// Merge command-line overrides on top of the file configuration.
    fn table_config(&self) -> Result<TableConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => TableConfig::default(),
        };
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(caption) = &self.caption {
            config.pivot.caption = Some(caption.clone());
            config.flat.caption = caption.clone();
        }
        if let Some(label) = &self.label {
            config.pivot.label = label.clone();
            config.flat.label = label.clone();
        }
        if self.resize {
            config.pivot.resize_to_column = true;
        }
        if let Some(models) = &self.models {
            config.pivot.model_order = Some(models.clone());
        }
        if let Some(datasets) = &self.datasets {
            config.pivot.dataset_order = Some(datasets.clone());
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.table_config()?;

    let rows = load_file(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    if rows.is_empty() {
        log::warn!("No valid rows in {}", cli.input.display());
    }

    let text = if cli.to_csv {
        to_csv(&rows)?
    } else {
        render::render(config.layout, &rows, &config)
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} bytes to {}", text.len(), path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "latex-pivot",
            "results.csv",
            "--layout",
            "flat",
            "--caption",
            "Main results",
            "--models",
            "B,A",
            "--resize",
        ]);
        let config = cli.table_config().unwrap();
        assert_eq!(config.layout, Layout::Flat);
        assert_eq!(config.flat.caption, "Main results");
        assert_eq!(config.pivot.caption.as_deref(), Some("Main results"));
        assert_eq!(config.pivot.model_order, Some(vec!["B".to_string(), "A".to_string()]));
        assert!(config.pivot.resize_to_column);
        assert_eq!(config.pivot.dataset_order, None);
    }

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::parse_from(["latex-pivot", "results.csv"]);
        assert_eq!(cli.table_config().unwrap(), TableConfig::default());
        assert!(!cli.to_csv);
    }
}
