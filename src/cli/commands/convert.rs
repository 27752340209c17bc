//! `partpatch convert` command - inch/millimeter conversion helper

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::format_length;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{to_inches, to_millimeters, Unit};

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Value to convert
    pub value: f64,

    /// Unit of the given value
    #[arg(long, short = 'f', default_value = "in")]
    pub from: Unit,
}

#[derive(Serialize)]
struct Conversion {
    #[serde(rename = "in")]
    inches: f64,
    mm: f64,
}

pub fn run(args: ConvertArgs, global: &GlobalOpts) -> Result<()> {
    let conversion = match args.from {
        Unit::In => Conversion {
            inches: args.value,
            mm: to_millimeters(args.value),
        },
        Unit::Mm => Conversion {
            inches: to_inches(args.value),
            mm: args.value,
        },
    };

    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&conversion).into_diagnostic()?
        ),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&conversion).into_diagnostic()?),
        OutputFormat::Pretty => println!(
            "{} in = {} mm",
            format_length(conversion.inches),
            format_length(conversion.mm)
        ),
    }

    Ok(())
}
