use std::process::ExitCode;

use anyhow::Context;

use elendil::{ElfImage, FileImage};

fn main() -> ExitCode {
    elendil::logging::init_tracing();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| env!("CARGO_PKG_NAME").into());
    let Some(path) = args.next() else {
        // Missing argument is a usage question, not a failure.
        println!("Usage: {program} <elf binary>");
        return ExitCode::SUCCESS;
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{program}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> anyhow::Result<()> {
    let file = FileImage::open(path).with_context(|| format!("cannot open {path}"))?;
    let image = ElfImage::parse(file.bytes())
        .with_context(|| format!("cannot parse {path} as an ELF-64 binary"))?;
    for line in elendil::render(&image) {
        println!("{line}");
    }
    Ok(())
}
