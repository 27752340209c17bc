//! `partpatch patch` command - apply updates and save

use std::io::IsTerminal;
use std::path::PathBuf;

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::normalize;
use crate::core::{PatchConfig, Unit};
use crate::engine::{execute, PatchOutcome, PatchRequest, UpdateRequest};
use crate::host::TemplateHost;

#[derive(clap::Args, Debug)]
pub struct PatchArgs {
    /// Template to patch
    pub template: PathBuf,

    /// Parameter update as NAME=VALUE with an optional unit suffix
    /// (e.g. --set ANCHO=65.25 --set FONDO=120mm)
    #[arg(
        long = "set",
        short = 's',
        value_name = "NAME=VALUE[unit]",
        required = true
    )]
    pub set: Vec<String>,

    /// Unit assumed for values without a suffix (overrides the config default)
    #[arg(long, short = 'u')]
    pub unit: Option<Unit>,

    /// Appearance key to apply, best effort (e.g. steel)
    #[arg(long, short = 'a')]
    pub appearance: Option<String>,

    /// Save the patched copy under this directory instead of in place
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Logical names that may be skipped when no parameter matches
    #[arg(long, value_name = "NAME")]
    pub optional: Vec<String>,

    /// Overwrite an existing target without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: PatchArgs, global: &GlobalOpts) -> Result<()> {
    let config =
        PatchConfig::load(global.config.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let default_unit = args.unit.unwrap_or(config.default_unit);

    let mut updates = Vec::with_capacity(args.set.len());
    for entry in &args.set {
        let mut update = parse_set(entry, default_unit).map_err(|e| miette::miette!("{}", e))?;
        if args
            .optional
            .iter()
            .any(|name| normalize(name) == normalize(&update.logical_name))
        {
            update = update.optional();
        }
        updates.push(update);
    }

    let mut request = PatchRequest::new(&args.template, updates);
    request.appearance = args.appearance.clone();
    request.output_dir = args.output_dir.clone();

    confirm_overwrite(&request, args.yes)?;

    let host =
        TemplateHost::load_libraries(&config.libraries).map_err(|e| miette::miette!("{}", e))?;
    let outcome = execute(&host, &request, &config).map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&outcome).into_diagnostic()?
        ),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&outcome).into_diagnostic()?),
        OutputFormat::Pretty => print_outcome(&outcome, request.appearance.as_deref()),
    }

    Ok(())
}

/// Parse one `NAME=VALUE[unit]` argument.
fn parse_set(entry: &str, default_unit: Unit) -> Result<UpdateRequest, String> {
    let (name, raw_value) = entry
        .split_once('=')
        .ok_or_else(|| format!("invalid --set '{}': expected NAME=VALUE", entry))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid --set '{}': empty parameter name", entry));
    }

    let raw_value = raw_value.trim();
    let (magnitude, unit) = match raw_value.find(|c: char| c.is_alphabetic()) {
        Some(idx) => {
            let unit: Unit = raw_value[idx..].trim().parse()?;
            (raw_value[..idx].trim(), unit)
        }
        None => (raw_value, default_unit),
    };
    let value: f64 = magnitude
        .parse()
        .map_err(|_| format!("invalid --set '{}': '{}' is not a number", entry, magnitude))?;

    Ok(UpdateRequest::new(name, value, unit))
}

/// Ask before clobbering an existing target file. Non-interactive runs
/// proceed; `--yes` skips the prompt.
fn confirm_overwrite(request: &PatchRequest, yes: bool) -> Result<()> {
    if yes || !std::io::stdin().is_terminal() {
        return Ok(());
    }
    let target = match &request.output_dir {
        Some(dir) => match request.source.file_name() {
            Some(name) => dir.join(name),
            None => return Ok(()),
        },
        None => request.source.clone(),
    };
    if !target.exists() {
        return Ok(());
    }

    let overwrite = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Overwrite {}?", target.display()))
        .default(false)
        .interact()
        .into_diagnostic()?;
    if !overwrite {
        return Err(miette::miette!(
            "aborted, {} left untouched",
            target.display()
        ));
    }
    Ok(())
}

fn print_outcome(outcome: &PatchOutcome, requested_appearance: Option<&str>) {
    for update in &outcome.applied {
        println!(
            "  {} {} {} = {}",
            style(&update.logical_name).cyan(),
            style("->").dim(),
            update.parameter,
            style(&update.expression).green()
        );
    }
    for name in &outcome.skipped {
        println!(
            "  {} {}",
            style(name).yellow(),
            style("skipped (no matching parameter)").dim()
        );
    }
    match (&outcome.appearance, requested_appearance) {
        (Some(asset), _) => println!("  appearance: {}", style(asset.to_string()).green()),
        (None, Some(key)) => println!(
            "  {}",
            style(format!("appearance '{}' not found in any library", key)).dim()
        ),
        (None, None) => {}
    }
    println!(
        "{} {}",
        style("Saved").green().bold(),
        outcome.output_path.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_with_default_unit() {
        let update = parse_set("ANCHO=65.25", Unit::In).unwrap();
        assert_eq!(update.logical_name, "ANCHO");
        assert_eq!(update.value, 65.25);
        assert_eq!(update.unit, Unit::In);
        assert!(update.required);
    }

    #[test]
    fn test_parse_set_with_unit_suffix() {
        let update = parse_set("FONDO=120mm", Unit::In).unwrap();
        assert_eq!(update.unit, Unit::Mm);
        assert_eq!(update.value, 120.0);

        let update = parse_set("LARGO = 82.98 in", Unit::Mm).unwrap();
        assert_eq!(update.unit, Unit::In);
        assert_eq!(update.value, 82.98);
    }

    #[test]
    fn test_parse_set_rejects_malformed_specs() {
        assert!(parse_set("ANCHO", Unit::In).is_err());
        assert!(parse_set("=5", Unit::In).is_err());
        assert!(parse_set("ANCHO=abc", Unit::In).is_err());
        assert!(parse_set("ANCHO=5 furlongs", Unit::In).is_err());
    }

    #[test]
    fn test_parse_set_passes_negative_values_through() {
        // the engine, not the parser, rejects non-positive dimensions
        let update = parse_set("ALTO=-1", Unit::In).unwrap();
        assert_eq!(update.value, -1.0);
    }
}
