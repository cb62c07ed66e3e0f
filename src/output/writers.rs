//! Pack Writers
//!
//! ディレクトリとZIPアーカイブへの書き込み実装。

use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use super::PackEntry;
use crate::error::TrainerPackError;

/// 出力ルートディレクトリへのライター
pub struct DirectoryWriter {
    root: PathBuf,
}

impl DirectoryWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// エントリを`<root>/<path>`に書き込む（既存のファイルは上書き）
    pub fn write(&self, entries: &[PackEntry]) -> Result<usize, TrainerPackError> {
        for entry in entries {
            let target = self.root.join(&entry.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &entry.contents)?;
            debug!("wrote {}", target.display());
        }
        info!("Wrote {} files to '{}'", entries.len(), self.root.display());
        Ok(entries.len())
    }
}

/// ZIPアーカイブへのライター
pub struct ZipPackWriter {
    path: PathBuf,
}

impl ZipPackWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// エントリをZIPアーカイブ（deflate圧縮）として書き込む
    pub fn write(&self, entries: &[PackEntry]) -> Result<usize, TrainerPackError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let count = write_archive(file, entries)?;
        info!("Packaged {} files into '{}'", count, self.path.display());
        Ok(count)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 任意のライターにZIPアーカイブを書き込む
pub(crate) fn write_archive<W: Write + Seek>(
    writer: W,
    entries: &[PackEntry],
) -> Result<usize, TrainerPackError> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        zip.start_file(entry.path.as_str(), options)?;
        zip.write_all(&entry.contents)?;
    }
    zip.finish()?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn entries() -> Vec<PackEntry> {
        vec![
            PackEntry {
                path: "trainers/brock_1.json".to_string(),
                contents: b"{}\n".to_vec(),
            },
            PackEntry {
                path: "mobs/trainers/groups/chickencoopleader_brock_1.json".to_string(),
                contents: b"[]\n".to_vec(),
            },
        ]
    }

    #[test]
    fn test_directory_writer_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let count = DirectoryWriter::new(dir.path()).write(&entries()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("trainers/brock_1.json")).unwrap(),
            "{}\n"
        );
        assert!(dir
            .path()
            .join("mobs/trainers/groups/chickencoopleader_brock_1.json")
            .is_file());
    }

    #[test]
    fn test_write_archive_entries() {
        let mut buffer = Cursor::new(Vec::new());
        assert_eq!(write_archive(&mut buffer, &entries()).unwrap(), 2);

        let mut archive = ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive
            .by_name("trainers/brock_1.json")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "{}\n");
    }

    #[test]
    fn test_zip_writer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/pack.zip");
        let writer = ZipPackWriter::new(&path);
        assert_eq!(writer.write(&entries()).unwrap(), 2);
        assert_eq!(writer.path(), path.as_path());
        assert!(path.is_file());
    }
}
