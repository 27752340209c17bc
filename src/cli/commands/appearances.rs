//! `partpatch appearances` command - list or resolve appearance assets

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{normalize, PatchConfig};
use crate::engine::resolve_appearance;
use crate::host::{DocumentHost, TemplateHost};

#[derive(clap::Args, Debug)]
pub struct AppearancesArgs {
    /// Resolve this logical key instead of listing everything
    #[arg(long, short = 'k')]
    pub key: Option<String>,

    /// Filter listed assets (tolerant substring match)
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Tabled, Serialize)]
struct AssetRow {
    #[tabled(rename = "LIBRARY")]
    library: String,
    #[tabled(rename = "ASSET")]
    asset: String,
}

pub fn run(args: AppearancesArgs, global: &GlobalOpts) -> Result<()> {
    let config =
        PatchConfig::load(global.config.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let host =
        TemplateHost::load_libraries(&config.libraries).map_err(|e| miette::miette!("{}", e))?;

    if let Some(key) = &args.key {
        let asset = resolve_appearance(key, &config, host.asset_libraries())
            .ok_or_else(|| miette::miette!("no asset found for '{}' in any library", key))?;
        match global.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&asset).into_diagnostic()?)
            }
            OutputFormat::Yaml => print!("{}", serde_yml::to_string(&asset).into_diagnostic()?),
            OutputFormat::Pretty => {
                println!("{} {} {}", style(key).cyan(), style("->").dim(), asset)
            }
        }
        return Ok(());
    }

    let wanted = args.search.as_deref().map(normalize);
    let mut rows = Vec::new();
    for library in host.asset_libraries() {
        for asset in &library.assets {
            if let Some(wanted) = &wanted {
                if !normalize(asset).contains(wanted.as_str()) {
                    continue;
                }
            }
            rows.push(AssetRow {
                library: library.name.clone(),
                asset: asset.clone(),
            });
        }
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&rows).into_diagnostic()?),
        OutputFormat::Pretty => {
            if rows.is_empty() {
                println!("No assets found");
            } else {
                println!("{}", Table::new(&rows).with(Style::sharp()));
                println!("{} asset(s)", rows.len());
            }
        }
    }

    Ok(())
}
