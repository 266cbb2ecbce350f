use std::fs;
use std::path::Path;

use crate::error::ScanError;

/// Image extensions accepted by the scan, compared case-insensitively
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A logo image file found in the scan directory
#[derive(Debug, Clone)]
pub struct LogoFile {
    /// Original filename, extension included
    pub filename: String,
    /// Cleaned lowercase stem used for matching
    pub stem: String,
}

impl LogoFile {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            stem: stem(filename),
        }
    }

    /// Human-readable name derived from the stem: hyphen parts title-cased.
    /// Used for review entries when no known team matches the file.
    pub fn display_name(&self) -> String {
        self.stem
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// Extract the matchable stem from a logo filename.
///
/// Drops the extension, lowercases, and strips scraper artifacts:
/// a `sch-` prefix, a trailing `_sm` size marker, and a trailing
/// `-{digits}` timestamp. `sch-adams-state-17533728611274_sm.jpg`
/// becomes `adams-state`; `Adams State.jpg` becomes `adams state`.
pub fn stem(filename: &str) -> String {
    let base = match filename.rsplit_once('.') {
        Some((base, _ext)) => base,
        None => filename,
    };
    let base = base.to_lowercase();

    let s = base.strip_prefix("sch-").unwrap_or(&base);
    let s = s.strip_suffix("_sm").unwrap_or(s);
    strip_trailing_timestamp(s).to_string()
}

fn strip_trailing_timestamp(s: &str) -> &str {
    if let Some(idx) = s.rfind('-') {
        let tail = &s[idx + 1..];
        if idx > 0 && !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            return &s[..idx];
        }
    }
    s
}

fn is_image_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS
            .iter()
            .any(|e| ext.eq_ignore_ascii_case(e)),
        None => false,
    }
}

/// List logo image files in a directory, non-recursively.
/// Subdirectories and non-image files are skipped. Results are sorted by
/// filename so runs are deterministic.
pub fn scan_logos(dir: &Path) -> Result<Vec<LogoFile>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(dir.display().to_string()));
    }

    let entries = fs::read_dir(dir).map_err(|e| ScanError::ReadFailed {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut logos = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ScanError::ReadFailed {
            path: dir.display().to_string(),
            source: e,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().to_string();
        if is_image_file(&filename) {
            logos.push(LogoFile::new(&filename));
        }
    }

    logos.sort_by(|a, b| a.filename.cmp(&b.filename));
    tracing::info!("Found {} logo files in {}", logos.len(), dir.display());
    Ok(logos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_stem_simple_name() {
        assert_eq!(stem("adams state.jpg"), "adams state");
        assert_eq!(stem("Ferris-State.PNG"), "ferris-state");
    }

    #[test]
    fn test_stem_scraper_pattern() {
        assert_eq!(stem("sch-winston-salem-state-17533728611274_sm.jpg"), "winston-salem-state");
        assert_eq!(stem("sch-adams-state_sm.jpg"), "adams-state");
        assert_eq!(stem("sch-fort-lewis-99.jpeg"), "fort-lewis");
    }

    #[test]
    fn test_stem_keeps_interior_digits() {
        // Only a trailing all-digit segment is a timestamp
        assert_eq!(stem("northeast-10-conference.png"), "northeast-10-conference");
        assert_eq!(stem("route-66.png"), "route");
    }

    #[test]
    fn test_stem_no_extension() {
        assert_eq!(stem("ferris-state"), "ferris-state");
    }

    #[test]
    fn test_display_name() {
        let logo = LogoFile::new("grand-valley-state.jpg");
        assert_eq!(logo.display_name(), "Grand Valley State");

        let logo = LogoFile::new("sch-upper-iowa-123_sm.png");
        assert_eq!(logo.display_name(), "Upper Iowa");
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("a.jpg"));
        assert!(is_image_file("a.JPEG"));
        assert!(is_image_file("a.Png"));
        assert!(!is_image_file("a.gif"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("noext"));
    }

    #[test]
    fn test_scan_logos_filters_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b-team.png", "a-team.jpg", "readme.md", "c-team.gif"] {
            File::create(tmp.path().join(name)).unwrap();
        }
        std::fs::create_dir(tmp.path().join("nested.jpg")).unwrap();

        let logos = scan_logos(tmp.path()).unwrap();
        let names: Vec<&str> = logos.iter().map(|l| l.filename.as_str()).collect();
        assert_eq!(names, vec!["a-team.jpg", "b-team.png"]);
    }

    #[test]
    fn test_scan_logos_missing_dir() {
        let err = scan_logos(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_scan_logos_empty_dir_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(scan_logos(tmp.path()).unwrap().is_empty());
    }
}
