use clap::Parser;
use miette::Result;
use partpatch::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Patch(args) => partpatch::cli::commands::patch::run(args, &cli.global),
        Commands::Params(args) => partpatch::cli::commands::params::run(args, &cli.global),
        Commands::Templates(args) => partpatch::cli::commands::templates::run(args, &cli.global),
        Commands::Appearances(args) => {
            partpatch::cli::commands::appearances::run(args, &cli.global)
        }
        Commands::Convert(args) => partpatch::cli::commands::convert::run(args, &cli.global),
        Commands::Completions(args) => partpatch::cli::commands::completions::run(args),
    }
}
