use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "sfxpack",
    about = "Pack a directory into a self-extracting executable.",
    version,
    after_help = "\
\x1b[1m\x1b[4mExamples:\x1b[0m
  sfxpack -d dist/app --stub unzipsfx.exe
  sfxpack -d dist/app -w dist --stub unzipsfx.exe -n app-1.0
  sfxpack -d dist/app --stub unzipsfx --exe-extension '' -o out/")]
pub struct Cli {
    /// Directory to add to the archive
    #[arg(short = 'd', long, value_name = "DIR", alias = "dir")]
    pub directory: PathBuf,

    /// Name of the artifacts to create, without extension [default: name of the input directory]
    #[arg(
        short = 'n',
        long,
        value_name = "NAME",
        aliases = ["an", "artifactName"]
    )]
    pub artifact_name: Option<String>,

    /// Archive entries are created relative to this directory [default: the input directory]
    #[arg(
        short = 'w',
        long,
        value_name = "DIR",
        aliases = ["wd", "workingDirectory"]
    )]
    pub working_directory: Option<PathBuf>,

    /// Zip-reading extraction stub the archive is appended to, e.g. unzipsfx
    #[arg(long, value_name = "FILE")]
    pub stub: PathBuf,

    /// Configuration block placed between stub and archive [default: none]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to write the archive and executable to (defaults to current directory)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extension of the executable; pass an empty string for none
    #[arg(long, value_name = "EXT", default_value = "exe")]
    pub exe_extension: String,

    /// Overwrite existing artifacts
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Suppress output
    #[arg(short = 'q', long)]
    pub quiet: bool,
}
