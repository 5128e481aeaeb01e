use std::path::{Path, PathBuf};

use sfxpack_core::{assemble, resolve, ArchiveBuilder, Asset};

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::util::format_size;

/// Zip stubs find the archive by its central directory and need no config
/// block, so none is written unless `--config` is given.
const DEFAULT_CONFIG: &[u8] = b"";

const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Artifacts {
    archive: PathBuf,
    executable: PathBuf,
}

impl Artifacts {
    fn new(output_dir: &Path, name: &str, exe_extension: &str) -> Result<Artifacts> {
        let exe_extension = exe_extension.trim_start_matches('.');
        if exe_extension.eq_ignore_ascii_case(ARCHIVE_EXTENSION) {
            return Err(Error::ExtensionClash {
                extension: exe_extension.to_string(),
            });
        }

        let executable = if exe_extension.is_empty() {
            output_dir.join(name)
        } else {
            output_dir.join(format!("{}.{}", name, exe_extension))
        };

        Ok(Artifacts {
            archive: output_dir.join(format!("{}.{}", name, ARCHIVE_EXTENSION)),
            executable,
        })
    }
}

/// The explicit name if valid, otherwise the leaf name of the input directory.
fn artifact_name(explicit: Option<&str>, input_dir: &Path) -> Result<String> {
    if let Some(name) = explicit {
        let invalid = name.trim().is_empty()
            || name == "."
            || name == ".."
            || name.contains(|c: char| c == '/' || c == '\\');

        if invalid {
            return Err(Error::InvalidArtifactName {
                name: name.to_string(),
            });
        }
        return Ok(name.to_string());
    }

    // A missing input directory is reported by the build, name it anyway.
    let dir = input_dir
        .canonicalize()
        .unwrap_or_else(|_| input_dir.to_path_buf());

    dir.file_name()
        .and_then(|x| x.to_str())
        .filter(|x| *x != "." && *x != "..")
        .map(str::to_string)
        .ok_or_else(|| Error::NoArtifactName {
            path: input_dir.to_path_buf(),
        })
}

pub fn run(args: Cli) -> Result<()> {
    let base = resolve(&args.directory, args.working_directory.as_deref())
        .map_err(|source| Error::Resolve { source })?;

    let name = artifact_name(args.artifact_name.as_deref(), &args.directory)?;

    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(|source| Error::CurrentDir { source })?,
    };
    let artifacts = Artifacts::new(&output_dir, &name, &args.exe_extension)?;

    if !args.force {
        for path in [&artifacts.archive, &artifacts.executable] {
            if path.exists() {
                return Err(Error::ArtifactExists { path: path.clone() });
            }
        }
    }

    tracing::info!(
        %name,
        archive = %artifacts.archive.display(),
        executable = %artifacts.executable.display(),
        "packing"
    );

    let archive = ArchiveBuilder::new(&base)
        .exclude(&artifacts.archive)
        .exclude(&artifacts.executable)
        .build(&args.directory, &artifacts.archive)
        .map_err(|source| Error::BuildArchive { source })?;

    let stub = Asset::File(args.stub);
    let config = match args.config {
        Some(path) => Asset::File(path),
        None => Asset::embedded(DEFAULT_CONFIG),
    };

    let executable = assemble(&stub, &config, &archive.path, &artifacts.executable)
        .map_err(|source| Error::Assemble { source })?;

    if !args.quiet {
        println!(
            "Created {} ({} files, {} -> {})",
            executable.path.display(),
            archive.entries,
            format_size(archive.bytes),
            format_size(executable.len),
        );
    }

    Ok(())
}
