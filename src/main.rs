use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use mortality_dash::utils::logging::{create_spinner, finish_and_clear, finish_progress_bar};
use mortality_dash::{Dashboard, DashboardConfig, FilterSelection, SexSelector};

/// Compute the mortality dashboard views and print them as JSON
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Death-records source (CSV or Parquet); defaults to $MORTALITY_DEATHS
    #[arg(long)]
    deaths: Option<PathBuf>,

    /// ICD-10 cause-code reference
    #[arg(long)]
    causes: Option<PathBuf>,

    /// DIVIPOLA geography reference
    #[arg(long)]
    geography: Option<PathBuf>,

    /// Department boundary GeoJSON, used when geography lacks centroids
    #[arg(long)]
    boundaries: Option<PathBuf>,

    /// Sex: Todos, Hombre, Mujer, N/A or the codes 1, 2, 3
    #[arg(long, default_value = "Todos")]
    sex: SexSelector,

    /// Department name
    #[arg(long)]
    department: Option<String>,

    /// ICD-10 cause code
    #[arg(long)]
    cause: Option<String>,

    /// Age band label, e.g. 20-24
    #[arg(long)]
    age_band: Option<String>,

    /// Print the dropdown options instead of the views
    #[arg(long)]
    options: bool,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

impl Args {
    fn config(&self) -> DashboardConfig {
        let mut config = DashboardConfig::from_env();
        if let Some(path) = &self.deaths {
            config.sources.deaths.clone_from(path);
        }
        if let Some(path) = &self.causes {
            config.sources.causes.clone_from(path);
        }
        if let Some(path) = &self.geography {
            config.sources.geography.clone_from(path);
        }
        if let Some(path) = &self.boundaries {
            config.sources.boundaries = Some(path.clone());
        }
        config
    }

    fn selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::all().with_sex(self.sex);
        if let Some(department) = &self.department {
            selection = selection.with_department(department);
        }
        if let Some(cause) = &self.cause {
            selection = selection.with_cause_code(cause);
        }
        if let Some(band) = &self.age_band {
            selection = selection.with_age_band(band);
        }
        selection
    }
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = args.config();

    let spinner = create_spinner(Some("Loading mortality sources..."));
    let loaded = Dashboard::load_async(config).await;
    if loaded.is_ok() {
        finish_progress_bar(&spinner, Some("Sources loaded"));
    } else {
        finish_and_clear(&spinner);
    }
    let dashboard = loaded.context("Failed to initialize the dashboard")?;

    let output = if args.options {
        let options = dashboard
            .filter_options()
            .context("Failed to collect filter options")?;
        to_json(&options, args.compact)?
    } else {
        let selection = args.selection();
        info!("Rendering views for {selection:?}");
        let snapshot = dashboard.render_all(&selection);
        to_json(&snapshot, args.compact)?
    };
    println!("{output}");
    Ok(())
}
