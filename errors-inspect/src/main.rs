//! errors-inspect
//!
//! Prints the error definitions declared in a compiled descriptor set,
//! merged the way `protoc-gen-errors` merges them.
//!
//! Usage:
//!   protoc --include_imports --descriptor_set_out=set.bin proto/*.proto
//!   errors-inspect set.bin
//!   errors-inspect set.bin --file shop/v1/order.proto --format rust

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use protoc_gen_errors::wire::DecodeError;
use protoc_gen_errors::{FileErrors, GeneratorConfig, GeneratorError, descriptor, emit, extract_file};

#[derive(Debug, Parser)]
#[command(name = "errors-inspect", version, about)]
struct Args {
    /// FileDescriptorSet written by `protoc --descriptor_set_out`
    descriptor_set: PathBuf,

    /// Only inspect these proto files; repeatable
    #[arg(long = "file", value_name = "PROTO")]
    files: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Defs)]
    format: Format,

    /// Plugin parameter string, as passed to `--errors_out`
    #[arg(long, default_value = "")]
    param: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One line per definition
    Defs,
    /// The generated Rust source
    Rust,
}

#[derive(Debug, thiserror::Error)]
enum InspectError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a FileDescriptorSet: {0}")]
    Decode(#[from] DecodeError),

    #[error("{0:?} is not in the descriptor set")]
    UnknownFile(String),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    protoc_gen_errors::logging::init();
    let args = Args::parse();

    let result = std::fs::read(&args.descriptor_set)
        .map_err(|source| InspectError::Read {
            path: args.descriptor_set.clone(),
            source,
        })
        .and_then(|bytes| inspect(&bytes, &args, &mut io::stdout().lock()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "inspection failed");
            eprintln!("errors-inspect: {e}");
            ExitCode::FAILURE
        }
    }
}

fn inspect(bytes: &[u8], args: &Args, out: &mut impl Write) -> Result<(), InspectError> {
    let config = GeneratorConfig::from_parameter(&args.param)?;
    let protos = descriptor::descriptor_set_files(bytes)?;

    for name in &args.files {
        if !protos.iter().any(|p| &p.name == name) {
            return Err(InspectError::UnknownFile(name.clone()));
        }
    }

    let selected = protos
        .iter()
        .filter(|p| args.files.is_empty() || args.files.contains(&p.name));

    for proto in selected {
        let errors = extract_file(proto, &config)?;
        if errors.is_empty() {
            tracing::debug!(file = %proto.name, "no error options");
            continue;
        }
        match args.format {
            Format::Defs => write_definitions(&errors, out)?,
            Format::Rust => {
                if let Some(file) = emit::generate(&errors, &config)? {
                    writeln!(out, "// ==> {}", file.name.unwrap_or_default())?;
                    writeln!(out, "{}", file.content.unwrap_or_default())?;
                }
            }
        }
    }

    Ok(())
}

fn write_definitions(errors: &FileErrors, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", errors.file)?;

    let width = errors
        .definitions()
        .map(|d| d.code.len())
        .max()
        .unwrap_or_default();

    for error in &errors.errors {
        let d = &error.definition;
        writeln!(
            out,
            "  {:<width$}  {:<19}  {:<9}  {:?}  [{}]",
            d.code,
            d.status.name(),
            if d.retryable { "retryable" } else { "-" },
            d.message_template,
            error.origin,
        )?;
    }
    Ok(())
}
