use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;

/// Extension marking a directory as a Final Cut camera archive.
pub const ARCHIVE_EXTENSION: &str = "fcarch";

/// Target name for the archive directory. Names already carrying the
/// extension are left alone, so re-running on an archive is a no-op.
pub fn archive_file_name(dir: &Path) -> PathBuf {
    match dir.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION) => dir.to_path_buf(),
        _ => {
            let mut name = dir
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_default();
            name.push(".");
            name.push(ARCHIVE_EXTENSION);
            dir.with_file_name(name)
        }
    }
}

/// Rename the directory, stamp it with the archive date, and hide the
/// extension in Finder. Runs only after the descriptor is on disk, so
/// failures here are reported with that state made explicit.
pub fn finalize_archive(dir: &Path, archive_date: NaiveDateTime) -> Result<PathBuf> {
    let target = archive_file_name(dir);
    if target != dir {
        fs::rename(dir, &target).with_context(|| {
            format!(
                "renaming {} to {} (descriptor already written)",
                dir.display(),
                target.display()
            )
        })?;
    }
    set_directory_mtime(&target, archive_date)?;
    if let Err(err) = hide_extension(&target) {
        eprintln!("Warning: could not hide the archive extension: {err:#}");
    }
    Ok(target)
}

/// Archive dates are local time; convert back to a UTC epoch for the
/// filesystem.
fn set_directory_mtime(path: &Path, date: NaiveDateTime) -> Result<()> {
    let Some(local) = date.and_local_timezone(chrono::Local).single() else {
        bail!(
            "archive date {date} has no unambiguous local time (descriptor already written)"
        );
    };
    let ft = filetime::FileTime::from_unix_time(local.timestamp(), 0);
    filetime::set_file_mtime(path, ft)
        .with_context(|| format!("setting modification time on {}", path.display()))
}

/// `SetFile -a E` asks Finder to suppress the extension. One attempt;
/// the caller downgrades failure to a warning.
fn hide_extension(path: &Path) -> Result<()> {
    let output = Command::new("SetFile")
        .args(["-a", "E"])
        .arg(path)
        .output()
        .context("running SetFile")?;
    if !output.status.success() {
        bail!("SetFile exited with {}", output.status);
    }
    Ok(())
}
