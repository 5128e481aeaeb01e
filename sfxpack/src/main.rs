mod cli;
mod create;
mod error;
mod util;

use clap::Parser;

use cli::Cli;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(wild::args_os());
    create::run(cli)?;

    Ok(())
}
