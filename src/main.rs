mod date;
mod descriptor;
mod finalize;
mod identity;
mod media;
mod pipeline;

use std::path::PathBuf;

use anyhow::bail;
use clap::error::ErrorKind;
use clap::Parser;
use dialoguer::{Confirm, Input};

use crate::date::probe::MdlsProbe;
use crate::identity::UuidSource;
use crate::pipeline::ArchiveOptions;

#[derive(Parser)]
#[command(name = "fcparch", version, about = "Final Cut Pro camera archive maker - turn a folder of media into an .fcarch bundle")]
struct Cli {
    /// Directory of media files to archive
    directory: PathBuf,

    /// Build the descriptor only: no date resolution, no rename, no retagging
    #[arg(long)]
    notouching: bool,
}

fn main() -> anyhow::Result<()> {
    // Help and version requests exit 0; argument mistakes exit 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if !cli.directory.is_dir() {
        bail!("{} is not a directory", cli.directory.display());
    }
    let directory = cli.directory.canonicalize()?;

    // An existing descriptor gates the whole run; declining is a valid
    // outcome, not a failure.
    let descriptor_path = directory.join(descriptor::DESCRIPTOR_FILENAME);
    if descriptor_path.exists() {
        let overwrite = Confirm::new()
            .with_prompt(format!(
                "{} already exists. Overwrite?",
                descriptor_path.display()
            ))
            .default(false)
            .interact()?;
        if !overwrite {
            eprintln!("Keeping the existing descriptor. Nothing was changed.");
            return Ok(());
        }
    }

    let device_name: String = Input::new()
        .with_prompt("Device name")
        .allow_empty(true)
        .interact_text()?;

    let options = ArchiveOptions {
        directory,
        no_touch: cli.notouching,
        device_name,
    };
    let summary = pipeline::process(&options, &mut UuidSource, &MdlsProbe)?;

    eprintln!(
        "Done! {} clips archived in {} (capture date {})",
        summary.clips,
        summary.archive_path.display(),
        summary.archive_date.format("%Y-%m-%d %H:%M:%S"),
    );
    Ok(())
}
