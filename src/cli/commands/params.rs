//! `partpatch params` command - list template parameters

use std::path::PathBuf;

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::ParameterNamespace;
use crate::host::template::TemplateDocument;

#[derive(clap::Args, Debug)]
pub struct ParamsArgs {
    /// Template to inspect
    pub template: PathBuf,

    /// Only show one namespace
    #[arg(long, short = 'n', default_value = "all")]
    pub namespace: NamespaceFilter,
}

/// Namespace filter for parameter listings
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum NamespaceFilter {
    User,
    Model,
    #[default]
    All,
}

impl NamespaceFilter {
    fn matches(&self, namespace: ParameterNamespace) -> bool {
        match self {
            NamespaceFilter::User => namespace == ParameterNamespace::User,
            NamespaceFilter::Model => namespace == ParameterNamespace::Model,
            NamespaceFilter::All => true,
        }
    }
}

#[derive(Tabled, Serialize)]
struct ParamRow {
    #[tabled(rename = "NAMESPACE")]
    namespace: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "EXPRESSION")]
    expression: String,
}

pub fn run(args: ParamsArgs, global: &GlobalOpts) -> Result<()> {
    let doc = TemplateDocument::load(&args.template).map_err(|e| miette::miette!("{}", e))?;
    let part = doc.part();

    let mut rows = Vec::new();
    for (namespace, entries) in [
        (ParameterNamespace::User, &part.parameters.user),
        (ParameterNamespace::Model, &part.parameters.model),
    ] {
        if !args.namespace.matches(namespace) {
            continue;
        }
        for entry in entries {
            rows.push(ParamRow {
                namespace: namespace.to_string(),
                name: entry.name.clone(),
                expression: entry.expression.clone(),
            });
        }
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&rows).into_diagnostic()?),
        OutputFormat::Pretty => {
            println!(
                "{} {}",
                style("Part:").bold(),
                style(&part.part).cyan()
            );
            if let Some(description) = &part.description {
                println!("{}", style(description).dim());
            }
            if rows.is_empty() {
                println!("No parameters found");
            } else {
                println!("{}", Table::new(&rows).with(Style::sharp()));
                println!("{} parameter(s)", rows.len());
            }
        }
    }

    Ok(())
}
