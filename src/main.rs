use std::{error::Error, io};

use spdlog::debug;

use urlqr::{export::QrExporter, prompt::Prompter};

fn main() -> Result<(), Box<dyn Error>> {
    // `SPDLOG_RS_LEVEL=debug` shows diagnostics
    spdlog::init_env_level()?;

    let mut prompter = Prompter::stdio();
    let written = urlqr::run(
        std::env::args().skip(1),
        &mut prompter,
        &QrExporter,
        &mut io::stdout(),
        &mut io::stderr(),
    )?;

    debug!("finished, written: {written:?}");

    Ok(())
}
