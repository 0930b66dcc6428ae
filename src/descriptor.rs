use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

/// Descriptor format version understood by the archive consumer.
const DESCRIPTOR_VERSION: u32 = 1;

/// Descriptor filename inside the archive directory.
pub const DESCRIPTOR_FILENAME: &str = "FCArchMetadata.plist";

/// The archive metadata document: built once per run, written next to
/// the clips it describes, never read back.
#[derive(Debug)]
pub struct ArchiveDescriptor {
    pub archive_id: String,
    pub archive_date: Option<NaiveDateTime>,
    /// Clip identifiers in discovery order. The only per-clip field
    /// persisted; resolved dates and paths are not written.
    pub clip_ids: Vec<String>,
    pub device_name: String,
    pub is_capture: bool,
}

impl ArchiveDescriptor {
    pub fn new(
        archive_id: String,
        archive_date: Option<NaiveDateTime>,
        clip_ids: Vec<String>,
        device_name: String,
    ) -> Self {
        Self {
            archive_id,
            archive_date,
            clip_ids,
            device_name,
            is_capture: true,
        }
    }

    /// Render the flat XML property list. The device name is written
    /// verbatim; the downstream consumer expects the raw bytes and
    /// escaping would alter every name containing reserved characters.
    pub fn to_plist(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n");
        out.push_str("<plist version=\"1.0\">\n");
        out.push_str("<dict>\n");
        out.push_str(&format!(
            "\t<key>archiveID</key>\n\t<string>{}</string>\n",
            self.archive_id
        ));
        if let Some(date) = &self.archive_date {
            out.push_str(&format!(
                "\t<key>captureDate</key>\n\t<string>{}</string>\n",
                date.format("%Y %m %d %H %M %S")
            ));
        }
        out.push_str(&format!(
            "\t<key>version</key>\n\t<integer>{DESCRIPTOR_VERSION}</integer>\n"
        ));
        out.push_str("\t<key>clips</key>\n\t<array>\n");
        for clip_id in &self.clip_ids {
            out.push_str(&format!(
                "\t\t<dict>\n\t\t\t<key>clipID</key>\n\t\t\t<string>{clip_id}</string>\n\t\t</dict>\n"
            ));
        }
        out.push_str("\t</array>\n");
        out.push_str(&format!(
            "\t<key>deviceName</key>\n\t<string>{}</string>\n",
            self.device_name
        ));
        out.push_str(&format!(
            "\t<key>isCapture</key>\n\t<{}/>\n",
            if self.is_capture { "true" } else { "false" }
        ));
        out.push_str("</dict>\n");
        out.push_str("</plist>\n");
        out
    }

    /// Write the descriptor into the archive directory.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(DESCRIPTOR_FILENAME);
        fs::write(&path, self.to_plist())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}
