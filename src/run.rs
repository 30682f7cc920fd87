use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use console::style;
use qrencode::EcLevel;
use spdlog::debug;

use crate::{
    args::parse_argv,
    error::{Error, Result},
    export::{DEFAULT_SIZE, ImageConfig, QrEncoder},
    output::{is_allowed, resolve_output_path},
    prompt::Prompter,
};

/// Parses `argv`, asks for what is missing, exports the QR Code and reports
/// the outcome on `stdout` or `stderr`.
///
/// Returns the written path, or `None` when a failure was already reported.
/// Errors are left for the caller only when reporting itself is impossible
/// (closed stdin, broken stdout).
pub fn run<I, R, W>(
    argv: I,
    prompter: &mut Prompter<R, W>,
    encoder: &impl QrEncoder,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<Option<PathBuf>>
where
    I: IntoIterator,
    I::Item: Into<String>,
    R: BufRead,
    W: Write,
{
    let parsed = parse_argv(argv);
    if !parsed.args.is_empty() {
        debug!("ignoring positional arguments {:?}", parsed.args);
    }

    let url = match parsed.flags.url() {
        Some(url) if !url.is_empty() => url.to_owned(),
        _ => prompter.require("URL: ", "URL")?,
    };
    let out = match parsed.flags.out() {
        Some(out) if !out.is_empty() => out.to_owned(),
        _ => prompter.require("File name: ", "file name")?,
    };

    let resolved = resolve_output_path(&out, &url);

    // resolve_output_path already falls back to `.eps`, this cannot fire
    if !is_allowed(&resolved.extension) {
        writeln!(
            stderr,
            "{}: Invalid file extension!",
            style("ERROR").red().for_stderr()
        )?;
        return Ok(None);
    }

    let file_path = resolved.to_path_buf();
    let config = ImageConfig {
        format: resolved
            .format()
            .ok_or_else(|| Error::InvalidExtension(resolved.extension.clone()))?,
        size: DEFAULT_SIZE,
        margin: 0,
        ec_level: EcLevel::L,
    };

    match export(encoder, &url, &config, &file_path) {
        Ok(()) => {
            writeln!(
                stdout,
                "{}\n  {}",
                style("Exported QR Code!").green(),
                file_path.display()
            )?;
            Ok(Some(file_path))
        }
        Err(err) => {
            debug!("export failed: {err}");
            writeln!(
                stderr,
                "{}: Writing file!\n  {}",
                style("ERROR").red().for_stderr(),
                file_path.display()
            )?;
            Ok(None)
        }
    }
}

fn export(
    encoder: &impl QrEncoder,
    url: &str,
    config: &ImageConfig,
    file_path: &Path,
) -> Result<()> {
    let data = encoder.encode(url, config)?;
    fs::write(file_path, &data).map_err(|source| Error::Write {
        path: file_path.to_path_buf(),
        source,
    })?;

    let size = humansize::format_size(data.len(), humansize::BINARY);
    debug!(
        "wrote {size} of {} to {}",
        config.format.name(),
        file_path.display()
    );
    Ok(())
}
