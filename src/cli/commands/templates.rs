//! `partpatch templates` command - scan a directory for part templates

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use walkdir::WalkDir;

use crate::cli::helpers::truncate_str;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::host::template::{TemplateDocument, TEMPLATE_SUFFIX};

#[derive(clap::Args, Debug)]
pub struct TemplatesArgs {
    /// Directory to scan recursively
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Tabled, Serialize)]
struct TemplateRow {
    #[tabled(rename = "FILE")]
    file: String,
    #[tabled(rename = "PART")]
    part: String,
    #[tabled(rename = "USER")]
    user: usize,
    #[tabled(rename = "MODEL")]
    model: usize,
    #[tabled(rename = "MODIFIED")]
    modified: String,
}

pub fn run(args: TemplatesArgs, global: &GlobalOpts) -> Result<()> {
    let mut rows = Vec::new();
    let mut unreadable = Vec::new();

    for entry in WalkDir::new(&args.dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(TEMPLATE_SUFFIX) {
            continue;
        }
        match TemplateDocument::load(entry.path()) {
            Ok(doc) => {
                let part = doc.part();
                rows.push(TemplateRow {
                    file: truncate_str(&entry.path().display().to_string(), 48),
                    part: part.part.clone(),
                    user: part.parameters.user.len(),
                    model: part.parameters.model.len(),
                    modified: part.modified.format("%Y-%m-%d %H:%M").to_string(),
                });
            }
            Err(err) => unreadable.push((entry.path().to_path_buf(), err)),
        }
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&rows).into_diagnostic()?),
        OutputFormat::Pretty => {
            if rows.is_empty() {
                println!("No templates found under {}", args.dir.display());
            } else {
                println!("{}", Table::new(&rows).with(Style::sharp()));
                println!("{} template(s) found", rows.len());
            }
            for (path, err) in &unreadable {
                println!(
                    "{} {}: {}",
                    style("warning:").yellow().bold(),
                    path.display(),
                    err
                );
            }
        }
    }

    Ok(())
}
