use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DataFileError;

/// Pattern for one rendered entry in the destination data file. Single-quoted
/// values, apostrophes in names escaped as \'.
const ENTRY_PATTERN: &str = r"\{\s*name:\s*'([^']+(?:\\'[^']*)*)',\s*slug:\s*'([^']+)',\s*conference:\s*'([^']+(?:\\'[^']*)*)',\s*division:\s*'([^']+)',\s*logo:\s*'([^']+)',?\s*\}";

/// A record generated by the ingest, ready to splice into the data file
#[derive(Debug, Clone)]
pub struct EntryRecord {
    pub name: String,
    pub slug: String,
    pub conference: String,
    pub division: String,
    pub logo: String,
    /// False when the logo path is a guess that needs manual review
    pub matched: bool,
}

impl EntryRecord {
    /// Render as the single-quoted object literal the data file uses
    pub fn render(&self) -> String {
        let name = self.name.replace('\'', "\\'");
        let conference = self.conference.replace('\'', "\\'");
        let review_comment = if self.matched {
            ""
        } else {
            " // TODO: Verify logo path"
        };

        format!(
            "  {{\n    name: '{}',\n    slug: '{}',\n    conference: '{}',\n    division: '{}',\n    logo: '{}',\n  }},{}",
            name, self.slug, conference, self.division, self.logo, review_comment
        )
    }
}

/// An entry parsed back out of the data file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub name: String,
    pub slug: String,
    pub conference: String,
    pub division: String,
    pub logo: String,
}

impl ParsedEntry {
    /// Filename component of the logo path
    pub fn logo_filename(&self) -> &str {
        self.logo.rsplit('/').next().unwrap_or(&self.logo)
    }

    /// True when the logo value is a known stand-in rather than a real path
    pub fn is_placeholder(&self) -> bool {
        self.logo.contains("TODO") || self.logo.contains("placeholder")
    }
}

/// The destination data file, edited as text. Records live in a trailing
/// array literal; new records splice in before its closing bracket.
#[derive(Debug)]
pub struct DataFile {
    path: PathBuf,
    content: String,
    entry_re: Regex,
}

impl DataFile {
    pub fn load(path: &Path) -> Result<Self, DataFileError> {
        if !path.is_file() {
            return Err(DataFileError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| DataFileError::ReadFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        let entry_re = Regex::new(ENTRY_PATTERN).map_err(DataFileError::Pattern)?;

        Ok(Self {
            path: path.to_path_buf(),
            content,
            entry_re,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse all entries currently present in the file
    pub fn entries(&self) -> Vec<ParsedEntry> {
        self.entry_re
            .captures_iter(&self.content)
            .map(|cap| ParsedEntry {
                name: cap[1].replace("\\'", "'"),
                slug: cap[2].to_string(),
                conference: cap[3].replace("\\'", "'"),
                division: cap[4].to_string(),
                logo: cap[5].to_string(),
            })
            .collect()
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.entries().iter().any(|e| e.name == name)
    }

    /// Splice rendered records in before the final closing bracket.
    /// Returns how many records were written into the buffer.
    pub fn append(&mut self, records: &[EntryRecord]) -> Result<usize, DataFileError> {
        if records.is_empty() {
            return Ok(0);
        }

        let last_bracket = self
            .content
            .rfind(']')
            .ok_or_else(|| DataFileError::NoEntriesArray(self.path.display().to_string()))?;

        let rendered = records
            .iter()
            .map(EntryRecord::render)
            .collect::<Vec<String>>()
            .join("\n");

        let before = &self.content[..last_bracket];
        let after = &self.content[last_bracket..];
        self.content = format!("{},\n{}\n{}", before, rendered, after);

        Ok(records.len())
    }

    /// Rewrite every `logo: '<old>'` occurrence to point at the new path.
    /// Returns true if anything changed.
    pub fn set_logo(&mut self, old_logo: &str, new_logo: &str) -> Result<bool, DataFileError> {
        let pattern = format!(r"logo:\s*'{}'", regex::escape(old_logo));
        let re = Regex::new(&pattern).map_err(DataFileError::Pattern)?;

        if !re.is_match(&self.content) {
            return Ok(false);
        }
        let replacement = format!("logo: '{}'", new_logo);
        self.content = re
            .replace_all(&self.content, regex::NoExpand(&replacement))
            .into_owned();
        Ok(true)
    }

    pub fn save(&self) -> Result<(), DataFileError> {
        fs::write(&self.path, &self.content).map_err(|e| DataFileError::WriteFailed {
            path: self.path.display().to_string(),
            source: e,
        })?;
        tracing::info!("Wrote {}", self.path.display());
        Ok(())
    }
}
