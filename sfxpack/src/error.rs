use std::path::PathBuf;

use miette::Diagnostic;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("Cannot resolve working directory")]
    #[diagnostic(help("Do the input and working directories exist?"))]
    Resolve {
        #[source]
        source: sfxpack_core::Error,
    },

    #[error("Cannot build archive")]
    BuildArchive {
        #[source]
        source: sfxpack_core::Error,
    },

    #[error("Cannot create self-extracting executable")]
    Assemble {
        #[source]
        source: sfxpack_core::Error,
    },

    #[error("Artifact already exists: `{}`", path.display())]
    #[diagnostic(help("Use -f/--force to overwrite"))]
    ArtifactExists { path: PathBuf },

    #[error("Invalid artifact name `{name}`")]
    #[diagnostic(help("Use a plain file name without directories"))]
    InvalidArtifactName { name: String },

    #[error("Cannot derive an artifact name from `{}`", path.display())]
    #[diagnostic(help("Specify one with -n/--artifact-name"))]
    NoArtifactName { path: PathBuf },

    #[error("Executable extension `{extension}` clashes with the archive")]
    #[diagnostic(help("Choose another --exe-extension"))]
    ExtensionClash { extension: String },

    #[error("Cannot access current directory")]
    CurrentDir {
        #[source]
        source: std::io::Error,
    },
}
