use anyhow::Context;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;

use crate::datafile::{DataFile, EntryRecord};
use crate::error::AppResult;
use crate::matching::{matches, slug};
use crate::scan::scan_logos;
use crate::teams::TeamList;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Division label stamped on every generated record
    pub division: String,
    /// Skip the final write
    pub dry_run: bool,
}

/// Outcome of an `add` run
#[derive(Debug, Default)]
pub struct AddSummary {
    pub logos_scanned: usize,
    /// Logos matched to a known team
    pub matched: usize,
    /// Records derived from the filename alone, flagged for review
    pub fallback: usize,
    /// Teams with no logo on disk, written with a placeholder path
    pub placeholder: usize,
    /// Records dropped because the team is already in the data file
    pub skipped_existing: usize,
    pub appended: usize,
}

/// Outcome of a `fix` run
#[derive(Debug, Default)]
pub struct FixSummary {
    pub already_correct: usize,
    pub fixed: usize,
    /// Teams whose logo could not be located
    pub not_found: Vec<String>,
}

/// One record whose logo file is absent
#[derive(Debug)]
pub struct MissingLogo {
    pub name: String,
    pub logo: String,
}

/// Outcome of a `check` run
#[derive(Debug, Default)]
pub struct CheckReport {
    pub total: usize,
    pub missing: Vec<MissingLogo>,
}

/// Root-relative path stored in the data file for a logo filename
fn logo_web_path(logo_dir: &Path, filename: &str) -> String {
    let dir_name = logo_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("/{}/{}", dir_name, filename)
}

fn team_matches_stem(stem: &str, name: &str, common: &str) -> bool {
    matches(stem, name) || matches(stem, common)
}

/// Scan the logo directory, match files against the team list, and splice
/// the generated records into the data file.
///
/// Two passes, file-driven first:
/// 1. each logo claims the first team it matches; logos that match nothing
///    (or a team that is already claimed) become filename-derived review
///    records;
/// 2. teams left without a logo are probed against unclaimed files by slug
///    containment and written with a placeholder path when that also fails.
pub fn run_add(
    logo_dir: &Path,
    data_path: &Path,
    teams: &TeamList,
    opts: &IngestOptions,
) -> AppResult<AddSummary> {
    let logos = scan_logos(logo_dir).context("scanning logo directory")?;
    let mut file = DataFile::load(data_path).context("loading data file")?;

    let mut summary = AddSummary {
        logos_scanned: logos.len(),
        ..Default::default()
    };

    // The logo x team sweep is pure, so it parallelizes without coordination
    let first_match: Vec<Option<usize>> = logos
        .par_iter()
        .map(|logo| {
            teams
                .iter()
                .position(|t| team_matches_stem(&logo.stem, &t.name, &t.common))
        })
        .collect();

    let mut claimed_teams: HashSet<usize> = HashSet::new();
    let mut used_logos: HashSet<&str> = HashSet::new();
    let mut records: Vec<EntryRecord> = Vec::new();

    // Pass 1: one record per logo file
    for (logo, team_idx) in logos.iter().zip(&first_match) {
        match team_idx {
            Some(idx) if !claimed_teams.contains(idx) => {
                claimed_teams.insert(*idx);
                used_logos.insert(logo.filename.as_str());
                let team = &teams.teams[*idx];
                tracing::info!("Matched {} -> {}", logo.filename, team.name);
                records.push(EntryRecord {
                    name: team.name.clone(),
                    slug: slug(&team.name),
                    conference: team.conference.clone(),
                    division: opts.division.clone(),
                    logo: logo_web_path(logo_dir, &logo.filename),
                    matched: true,
                });
                summary.matched += 1;
            }
            _ => {
                // No team (or team taken): keep the file, flag for review
                let display_name = logo.display_name();
                tracing::warn!(
                    "No team match for {}, creating entry from filename",
                    logo.filename
                );
                used_logos.insert(logo.filename.as_str());
                records.push(EntryRecord {
                    name: display_name,
                    slug: slug(&logo.stem),
                    conference: "Unknown".to_string(),
                    division: opts.division.clone(),
                    logo: logo_web_path(logo_dir, &logo.filename),
                    matched: false,
                });
                summary.fallback += 1;
            }
        }
    }

    // Pass 2: teams that no logo claimed
    for (idx, team) in teams.iter().enumerate() {
        if claimed_teams.contains(&idx) {
            continue;
        }
        let team_slug = slug(&team.name);
        let probe = logos.iter().find(|logo| {
            !used_logos.contains(logo.filename.as_str())
                && (logo.stem == team_slug
                    || logo.stem.contains(&team_slug)
                    || team_slug.contains(&logo.stem))
        });

        let (logo_path, found) = match probe {
            Some(logo) => {
                used_logos.insert(logo.filename.as_str());
                (logo_web_path(logo_dir, &logo.filename), true)
            }
            None => (
                logo_web_path(logo_dir, &format!("{}.jpg", team_slug)),
                false,
            ),
        };
        if !found {
            summary.placeholder += 1;
        } else {
            summary.matched += 1;
        }
        records.push(EntryRecord {
            name: team.name.clone(),
            slug: team_slug,
            conference: team.conference.clone(),
            division: opts.division.clone(),
            logo: logo_path,
            matched: found,
        });
    }

    // Drop records for teams the data file already carries
    let fresh: Vec<EntryRecord> = records
        .into_iter()
        .filter(|r| {
            if file.has_entry(&r.name) {
                tracing::debug!("Skipping {}, already present", r.name);
                summary.skipped_existing += 1;
                false
            } else {
                true
            }
        })
        .collect();

    summary.appended = file.append(&fresh).context("appending records")?;

    if opts.dry_run {
        tracing::info!("Dry run, not writing {}", data_path.display());
    } else {
        file.save().context("writing data file")?;
    }

    Ok(summary)
}

/// Repair records whose logo file is absent or a placeholder by re-matching
/// against the files actually present in the logo directory.
pub fn run_fix(
    logo_dir: &Path,
    data_path: &Path,
    dry_run: bool,
) -> AppResult<FixSummary> {
    let logos = scan_logos(logo_dir).context("scanning logo directory")?;
    let mut file = DataFile::load(data_path).context("loading data file")?;

    let mut summary = FixSummary::default();
    let mut used_logos: HashSet<String> = HashSet::new();

    for entry in file.entries() {
        let on_disk = logo_dir.join(entry.logo_filename()).is_file();
        if on_disk && !entry.is_placeholder() {
            summary.already_correct += 1;
            continue;
        }

        let candidate = logos
            .iter()
            .find(|logo| !used_logos.contains(&logo.filename) && matches(&logo.stem, &entry.name));

        match candidate {
            Some(logo) => {
                let new_path = logo_web_path(logo_dir, &logo.filename);
                if file
                    .set_logo(&entry.logo, &new_path)
                    .context("rewriting logo path")?
                {
                    tracing::info!("Fixed {} -> {}", entry.name, logo.filename);
                    used_logos.insert(logo.filename.clone());
                    summary.fixed += 1;
                } else {
                    summary.not_found.push(entry.name.clone());
                }
            }
            None => {
                tracing::warn!("No logo found for {}", entry.name);
                summary.not_found.push(entry.name.clone());
            }
        }
    }

    if summary.fixed > 0 && !dry_run {
        file.save().context("writing data file")?;
    } else if dry_run {
        tracing::info!("Dry run, not writing {}", data_path.display());
    }

    Ok(summary)
}

/// Report records whose logo file does not exist. Read-only.
pub fn run_check(logo_dir: &Path, data_path: &Path) -> AppResult<CheckReport> {
    let file = DataFile::load(data_path).context("loading data file")?;

    let mut report = CheckReport::default();
    for entry in file.entries() {
        report.total += 1;
        let on_disk = logo_dir.join(entry.logo_filename()).is_file();
        if entry.is_placeholder() || !on_disk {
            report.missing.push(MissingLogo {
                name: entry.name,
                logo: entry.logo,
            });
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::Team;
    use std::fs;

    fn team(name: &str, common: &str, conference: &str) -> Team {
        Team {
            name: name.to_string(),
            common: common.to_string(),
            conference: conference.to_string(),
        }
    }

    fn write_data_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("college-data.ts");
        fs::write(
            &path,
            "export const collegeEntries: CollegeEntry[] = [\n]\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_logo_web_path() {
        assert_eq!(
            logo_web_path(Path::new("public/d2 college football logos"), "adams-state.jpg"),
            "/d2 college football logos/adams-state.jpg"
        );
    }

    #[test]
    fn test_add_claims_each_team_once() {
        let tmp = tempfile::tempdir().unwrap();
        let logo_dir = tmp.path().join("logos");
        fs::create_dir(&logo_dir).unwrap();
        // Two files that both match Ferris State; the second falls back
        fs::write(logo_dir.join("ferris-state-a.jpg"), b"").unwrap();
        fs::write(logo_dir.join("ferris-state-b.jpg"), b"").unwrap();
        let data_path = write_data_file(tmp.path());

        let teams = TeamList {
            teams: vec![team(
                "Ferris State University",
                "Ferris State",
                "Great Lakes Intercollegiate Athletic Conference",
            )],
        };
        let opts = IngestOptions {
            division: "D2".to_string(),
            dry_run: false,
        };
        let summary = run_add(&logo_dir, &data_path, &teams, &opts).unwrap();

        assert_eq!(summary.logos_scanned, 2);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.fallback, 1);
        assert_eq!(summary.appended, 2);
    }

    #[test]
    fn test_add_dry_run_leaves_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let logo_dir = tmp.path().join("logos");
        fs::create_dir(&logo_dir).unwrap();
        fs::write(logo_dir.join("adams-state.jpg"), b"").unwrap();
        let data_path = write_data_file(tmp.path());
        let before = fs::read_to_string(&data_path).unwrap();

        let teams = TeamList {
            teams: vec![team(
                "Adams State University",
                "Adams State",
                "Rocky Mountain Athletic Conference",
            )],
        };
        let opts = IngestOptions {
            division: "D2".to_string(),
            dry_run: true,
        };
        let summary = run_add(&logo_dir, &data_path, &teams, &opts).unwrap();

        assert_eq!(summary.appended, 1);
        assert_eq!(fs::read_to_string(&data_path).unwrap(), before);
    }

    #[test]
    fn test_add_placeholder_for_team_without_logo() {
        let tmp = tempfile::tempdir().unwrap();
        let logo_dir = tmp.path().join("logos");
        fs::create_dir(&logo_dir).unwrap();
        let data_path = write_data_file(tmp.path());

        let teams = TeamList {
            teams: vec![team(
                "Walsh University",
                "Walsh",
                "Great Midwest Athletic Conference",
            )],
        };
        let opts = IngestOptions {
            division: "D2".to_string(),
            dry_run: false,
        };
        let summary = run_add(&logo_dir, &data_path, &teams, &opts).unwrap();

        assert_eq!(summary.placeholder, 1);
        let content = fs::read_to_string(&data_path).unwrap();
        assert!(content.contains("/logos/walsh-university.jpg"));
        assert!(content.contains("// TODO: Verify logo path"));
    }

    #[test]
    fn test_check_reports_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let logo_dir = tmp.path().join("logos");
        fs::create_dir(&logo_dir).unwrap();
        fs::write(logo_dir.join("present.jpg"), b"").unwrap();

        let data_path = tmp.path().join("college-data.ts");
        fs::write(
            &data_path,
            "export const collegeEntries: CollegeEntry[] = [\n  {\n    name: 'Here University',\n    slug: 'here-university',\n    conference: 'C',\n    division: 'D2',\n    logo: '/logos/present.jpg',\n  },\n  {\n    name: 'Gone University',\n    slug: 'gone-university',\n    conference: 'C',\n    division: 'D2',\n    logo: '/logos/gone.jpg',\n  },\n]\n",
        )
        .unwrap();

        let report = run_check(&logo_dir, &data_path).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].name, "Gone University");
    }
}
