use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use indicatif::{ProgressBar, ProgressStyle};

use crate::date::{self, probe::MetadataProbe};
use crate::descriptor::ArchiveDescriptor;
use crate::finalize;
use crate::identity::IdentitySource;
use crate::media::{self, ResolvedClip};

/// Per-run options, assembled by the CLI after the prompts.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub directory: PathBuf,
    /// Skip date resolution and all directory mutation
    pub no_touch: bool,
    pub device_name: String,
}

#[derive(Debug)]
pub struct ArchiveSummary {
    pub clips: usize,
    pub archive_date: NaiveDateTime,
    pub archive_path: PathBuf,
}

/// Run the archive pipeline: scan, resolve, aggregate, describe,
/// finalize. Strictly sequential; all accumulating state lives in this
/// one pass.
pub fn process(
    options: &ArchiveOptions,
    ids: &mut dyn IdentitySource,
    probe: &dyn MetadataProbe,
) -> Result<ArchiveSummary> {
    // Stage 1: inventory the card
    eprintln!("=== Stage 1: Scanning media files ===");
    let media = media::scan_directory(&options.directory)?;
    if media.is_empty() {
        eprintln!("Found no media files");
    } else {
        let mut kinds: Vec<&str> = media.iter().map(|m| m.extension.as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        eprintln!("Found {} media files ({})", media.len(), kinds.join(", "));
    }

    // Stage 2: assign identifiers and resolve capture dates
    if options.no_touch {
        eprintln!("=== Stage 2: Resolving capture dates (skipped) ===");
    } else {
        eprintln!("=== Stage 2: Resolving capture dates ===");
    }
    let archive_id = ids.next_id();

    let pb = if options.no_touch {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(media.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} resolving dates")
            .unwrap(),
    );

    let mut clips: Vec<ResolvedClip> = Vec::with_capacity(media.len());
    for m in media {
        let date = if options.no_touch {
            None
        } else {
            Some(date::resolve_date(probe, &m.path, &m.filename)?)
        };
        clips.push(ResolvedClip {
            clip_id: ids.next_id(),
            date,
            media: m,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    // Stage 3: reduce to the archive date and write the descriptor.
    // With resolution disabled, and for a card with no clips, the
    // current wall-clock time stands in.
    let dates: Vec<NaiveDateTime> = clips.iter().filter_map(|c| c.date).collect();
    let archive_date =
        date::earliest_date(&dates).unwrap_or_else(|| chrono::Local::now().naive_local());
    if let Some(oldest) = clips.iter().find(|c| c.date == Some(archive_date)) {
        eprintln!(
            "Archive date {} (oldest clip {})",
            archive_date.format("%Y-%m-%d %H:%M:%S"),
            oldest.media.filename
        );
    }

    eprintln!("=== Stage 3: Writing descriptor ===");
    let descriptor = ArchiveDescriptor::new(
        archive_id,
        Some(archive_date),
        clips.iter().map(|c| c.clip_id.clone()).collect(),
        options.device_name.clone(),
    );
    let descriptor_path = descriptor.write(&options.directory)?;
    eprintln!("Wrote {}", descriptor_path.display());

    // Stage 4: rename + stamp + retag, never before the descriptor
    let archive_path = if options.no_touch {
        eprintln!("=== Stage 4: Finalizing archive (skipped) ===");
        options.directory.clone()
    } else {
        eprintln!("=== Stage 4: Finalizing archive ===");
        finalize::finalize_archive(&options.directory, archive_date)?
    };

    Ok(ArchiveSummary {
        clips: clips.len(),
        archive_date,
        archive_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::probe::FakeProbe;
    use crate::descriptor::DESCRIPTOR_FILENAME;
    use crate::identity::SequentialIds;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn options(directory: PathBuf, no_touch: bool) -> ArchiveOptions {
        ArchiveOptions {
            directory,
            no_touch,
            device_name: "Test Deck".to_string(),
        }
    }

    #[test]
    fn earliest_resolved_date_becomes_the_archive_date() {
        let tmp = tempdir().unwrap();
        let card = tmp.path().join("card");
        fs::create_dir(&card).unwrap();
        File::create(card.join("clip_2021.03.15_14.30.00.mov")).unwrap();
        File::create(card.join("IMG_001.jpg")).unwrap();

        let probe = FakeProbe::new(None);
        let mut ids = SequentialIds(0);
        let summary = process(&options(card.clone(), false), &mut ids, &probe).unwrap();

        // IMG_001.jpg is the only file probed; it falls back to epoch,
        // which wins the earliest-date reduction.
        assert_eq!(probe.calls.get(), 1);
        assert_eq!(summary.clips, 2);
        assert_eq!(summary.archive_path, tmp.path().join("card.fcarch"));
        assert!(!card.exists());

        let plist =
            fs::read_to_string(summary.archive_path.join(DESCRIPTOR_FILENAME)).unwrap();
        assert!(plist.contains("<string>1970 01 01 00 00 00</string>"));
        assert!(plist.contains("<string>ID-0001</string>"));
        assert_eq!(plist.matches("<key>clipID</key>").count(), 2);
        assert!(plist.contains("ID-0002"));
        assert!(plist.contains("ID-0003"));
        assert!(plist.contains("<string>Test Deck</string>"));
    }

    #[test]
    fn no_touch_leaves_the_directory_alone() {
        let tmp = tempdir().unwrap();
        let card = tmp.path().join("card");
        fs::create_dir(&card).unwrap();
        File::create(card.join("IMG_001.jpg")).unwrap();

        let probe = FakeProbe::new(None);
        let mut ids = SequentialIds(0);
        let summary = process(&options(card.clone(), true), &mut ids, &probe).unwrap();

        assert_eq!(probe.calls.get(), 0);
        assert_eq!(summary.archive_path, card);
        assert!(card.is_dir());
        assert!(!tmp.path().join("card.fcarch").exists());

        // The descriptor still carries a wall-clock capture date.
        let plist = fs::read_to_string(card.join(DESCRIPTOR_FILENAME)).unwrap();
        assert!(plist.contains("<key>captureDate</key>"));
        assert_eq!(plist.matches("<key>clipID</key>").count(), 1);
    }

    #[test]
    fn empty_directory_still_produces_an_archive() {
        let tmp = tempdir().unwrap();
        let card = tmp.path().join("card");
        fs::create_dir(&card).unwrap();

        let probe = FakeProbe::new(None);
        let mut ids = SequentialIds(0);
        let summary = process(&options(card, false), &mut ids, &probe).unwrap();

        assert_eq!(summary.clips, 0);
        let plist =
            fs::read_to_string(summary.archive_path.join(DESCRIPTOR_FILENAME)).unwrap();
        assert!(plist.contains("<key>captureDate</key>"));
        assert!(plist.contains("<array>\n\t</array>"));
    }

    #[test]
    fn impossible_filename_date_aborts_before_the_descriptor() {
        let tmp = tempdir().unwrap();
        let card = tmp.path().join("card");
        fs::create_dir(&card).unwrap();
        File::create(card.join("x_20219912_143000.mov")).unwrap();

        let probe = FakeProbe::new(None);
        let mut ids = SequentialIds(0);
        let err = process(&options(card.clone(), false), &mut ids, &probe).unwrap_err();

        assert!(format!("{err:#}").contains("x_20219912_143000.mov"));
        assert!(!card.join(DESCRIPTOR_FILENAME).exists());
        assert!(card.is_dir());
    }
}
