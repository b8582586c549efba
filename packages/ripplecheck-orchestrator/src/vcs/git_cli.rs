//! Shells out to `git` for the staged-diff view, grounded in the
//! teacher's `GitExecutor` (plain `std::process::Command`, no `git2`).

use super::{FileStatus, StagedFile, StagedHunk, VcsCollaborator};
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct GitCliCollaborator {
    repo_path: PathBuf,
}

impl GitCliCollaborator {
    pub fn new(repo_path: impl AsRef<Path>) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .ok()?;
        if output.status.success() {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            None
        }
    }
}

impl VcsCollaborator for GitCliCollaborator {
    #[tracing::instrument(skip(self))]
    fn staged_files(&self) -> Vec<StagedFile> {
        let Some(output) = self.run(&["diff", "--staged", "--name-status", "-z"]) else {
            tracing::warn!("git diff --staged failed, treating staged set as empty");
            return Vec::new();
        };
        parse_name_status(&output)
    }

    fn staged_content(&self, path: &str) -> Option<String> {
        self.run(&["show", &format!(":{path}")])
    }

    #[tracing::instrument(skip(self))]
    fn staged_hunks(&self) -> Vec<StagedHunk> {
        let Some(output) = self.run(&["diff", "--staged", "--unified=0"]) else {
            tracing::warn!("git diff --staged --unified=0 failed, treating hunk set as empty");
            return Vec::new();
        };
        parse_unified_hunks(&output)
    }
}

fn parse_name_status(output: &str) -> Vec<StagedFile> {
    let fields: Vec<&str> = output.split('\0').filter(|f| !f.is_empty()).collect();
    let mut files = Vec::new();
    let mut i = 0;
    while i < fields.len() {
        let code = fields[i];
        let Some(status) = code.chars().next().and_then(FileStatus::from_code) else {
            i += 1;
            continue;
        };
        match status {
            FileStatus::Renamed | FileStatus::Copied => {
                if i + 2 >= fields.len() {
                    break;
                }
                files.push(StagedFile {
                    status,
                    path: fields[i + 2].to_string(),
                    old_path: Some(fields[i + 1].to_string()),
                });
                i += 3;
            }
            _ => {
                if i + 1 >= fields.len() {
                    break;
                }
                files.push(StagedFile {
                    status,
                    path: fields[i + 1].to_string(),
                    old_path: None,
                });
                i += 2;
            }
        }
    }
    files
}

/// Parses `@@ -oldStart,oldCount +newStart,newCount @@` hunk headers out of
/// a `diff --unified=0` stream, one current file tracked via `+++ b/<path>`
/// lines. Pure-deletion hunks (`newCount == 0`) are excluded.
fn parse_unified_hunks(diff_text: &str) -> Vec<StagedHunk> {
    let mut hunks = Vec::new();
    let mut current_path: Option<String> = None;

    for line in diff_text.lines() {
        if let Some(path) = line.strip_prefix("+++ b/") {
            current_path = Some(path.to_string());
            continue;
        }
        if let Some(rest) = line.strip_prefix("@@ ") {
            let Some(path) = &current_path else { continue };
            let Some(new_side) = rest.split("@@").next().and_then(|s| s.split_whitespace().nth(1)) else {
                continue;
            };
            let Some(spec) = new_side.strip_prefix('+') else { continue };
            let (start_str, count_str) = spec.split_once(',').unwrap_or((spec, "1"));
            let (Ok(start), Ok(count)) = (start_str.parse::<u32>(), count_str.parse::<u32>()) else {
                continue;
            };
            if count == 0 {
                continue;
            }
            hunks.push(StagedHunk {
                path: path.clone(),
                new_start_line: start,
                new_line_count: count,
            });
        }
    }
    hunks
}
