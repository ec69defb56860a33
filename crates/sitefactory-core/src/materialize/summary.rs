//! Output statistics from a native directory walk

use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// File count and total size of a materialized site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputStats {
    pub file_count: u64,
    pub total_bytes: u64,
}

impl OutputStats {
    /// Walk `root` and accumulate every regular file
    ///
    /// Any unreadable entry fails the whole walk; callers treat that as
    /// "statistics unavailable" rather than a failed build.
    pub fn collect(root: &Path) -> io::Result<Self> {
        let mut stats = Self::default();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                stats.file_count += 1;
                stats.total_bytes += entry.metadata().map_err(io::Error::from)?.len();
            }
        }
        Ok(stats)
    }

    /// Human-readable size, e.g. `1.5 KiB`
    pub fn human_size(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
        let mut size = self.total_bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} {}", self.total_bytes, UNITS[0])
        } else {
            format!("{:.1} {}", size, UNITS[unit])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_counts_files_and_bytes() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("public/css")).unwrap();
        std::fs::write(dir.path().join("public/index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("public/css/site.css"), "body{}").unwrap();
        std::fs::write(dir.path().join("hugo.toml"), "").unwrap();

        let stats = OutputStats::collect(dir.path()).unwrap();
        assert_eq!(stats.file_count, 3);
        assert_eq!(stats.total_bytes, 13 + 6);
    }

    #[test]
    fn test_collect_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        assert!(OutputStats::collect(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_human_size() {
        let small = OutputStats { file_count: 1, total_bytes: 512 };
        assert_eq!(small.human_size(), "512 B");
        let larger = OutputStats { file_count: 1, total_bytes: 1536 };
        assert_eq!(larger.human_size(), "1.5 KiB");
    }
}
