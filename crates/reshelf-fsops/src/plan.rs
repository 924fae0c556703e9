//! Pure plan construction. Nothing here touches the filesystem.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::model::{
    Action, Candidate, Emptiness, EntryKind, OperationKind, Plan, SkipReason, Snapshot,
};
use crate::rename::{DerivedName, RenameRule};

/// What the facade observed about the move target before planning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetListing {
    /// Whether the target folder exists.
    pub exists: bool,
    /// Base names already present in the target.
    pub names: HashSet<OsString>,
}

/// Plan a keyword move of matching files into `target`.
#[must_use]
pub fn plan_move(
    snapshot: &Snapshot,
    candidates: &[Candidate],
    target: &Path,
    listing: &TargetListing,
) -> Plan {
    let mut actions = Vec::new();
    if !listing.exists {
        actions.push(Action::CreateDir {
            path: target.to_path_buf(),
        });
    }

    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut matched = 0usize;
    for candidate in candidates.iter().filter(|candidate| candidate.matched) {
        matched += 1;
        let source = &candidate.entry.path;
        let dest = target.join(&candidate.entry.name);
        if &dest == source {
            continue;
        }
        if listing.names.contains(&candidate.entry.name) || claimed.contains(&dest) {
            actions.push(Action::Skip {
                path: source.clone(),
                dest: Some(dest),
                reason: SkipReason::Collision,
            });
            continue;
        }
        claimed.insert(dest.clone());
        actions.push(Action::Move {
            source: source.clone(),
            dest,
        });
    }

    Plan {
        operation: OperationKind::Move,
        matched,
        actions,
        issues: snapshot.issues.clone(),
    }
}

/// Plan a batch rename of the regular files directly inside the snapshot root.
///
/// Destinations already present in the folder, even ones an earlier rename
/// would vacate, count as collisions.
#[must_use]
pub fn plan_rename(snapshot: &Snapshot, rule: &RenameRule) -> Plan {
    let files: Vec<_> = snapshot
        .entries
        .iter()
        .filter(|entry| entry.depth == 1 && entry.kind == EntryKind::File)
        .collect();
    let existing: HashSet<&OsStr> = snapshot
        .entries
        .iter()
        .filter(|entry| entry.depth == 1)
        .map(|entry| entry.name.as_os_str())
        .collect();
    let names: Vec<&OsStr> = files.iter().map(|entry| entry.name.as_os_str()).collect();
    let derived = rule.derive_names(&names);

    let mut claimed: HashSet<String> = HashSet::new();
    let mut actions = Vec::with_capacity(files.len());
    for (entry, derived) in files.iter().zip(derived) {
        let source = entry.path.clone();
        let new_name = match derived {
            DerivedName::Skip(reason) => {
                actions.push(Action::Skip {
                    path: source,
                    dest: None,
                    reason,
                });
                continue;
            }
            DerivedName::Name(name) => name,
        };
        let dest = snapshot.root.join(&new_name);
        if entry.name.as_os_str() == OsStr::new(&new_name) {
            actions.push(Action::Skip {
                path: source,
                dest: None,
                reason: SkipReason::Unchanged,
            });
        } else if existing.contains(OsStr::new(&new_name)) || claimed.contains(&new_name) {
            actions.push(Action::Skip {
                path: source,
                dest: Some(dest),
                reason: SkipReason::Collision,
            });
        } else {
            claimed.insert(new_name);
            actions.push(Action::Rename { source, dest });
        }
    }

    Plan {
        operation: OperationKind::Rename,
        matched: files.len(),
        actions,
        issues: snapshot.issues.clone(),
    }
}

/// Plan removal of matching empty directories.
///
/// Recursive snapshots order deletions deepest first, stable within a depth.
#[must_use]
pub fn plan_delete(snapshot: &Snapshot, candidates: &[Candidate]) -> Plan {
    let mut ordered: Vec<(usize, Action)> = candidates
        .iter()
        .filter(|candidate| candidate.matched)
        .map(|candidate| {
            let path = candidate.entry.path.clone();
            let action = match candidate.emptiness {
                Some(Emptiness::Empty) => Action::Delete { path },
                Some(Emptiness::Unreadable) => Action::Skip {
                    path,
                    dest: None,
                    reason: SkipReason::Unreadable,
                },
                Some(Emptiness::NotEmpty) | None => Action::Skip {
                    path,
                    dest: None,
                    reason: SkipReason::NotEmpty,
                },
            };
            (candidate.entry.depth, action)
        })
        .collect();
    if snapshot.recursive {
        ordered.sort_by_key(|(depth, _)| Reverse(*depth));
    }

    Plan {
        operation: OperationKind::Delete,
        matched: ordered.len(),
        actions: ordered.into_iter().map(|(_, action)| action).collect(),
        issues: snapshot.issues.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;

    type TestResult = anyhow::Result<()>;

    fn entry(root: &str, relative: &str, kind: EntryKind) -> Entry {
        let path = Path::new(root).join(relative);
        Entry {
            name: path
                .file_name()
                .map(OsStr::to_os_string)
                .unwrap_or_default(),
            depth: Path::new(relative).components().count(),
            path,
            kind,
        }
    }

    fn snapshot(root: &str, recursive: bool, entries: Vec<Entry>) -> Snapshot {
        Snapshot {
            root: PathBuf::from(root),
            recursive,
            entries,
            issues: Vec::new(),
        }
    }

    fn candidate(entry: Entry, matched: bool, emptiness: Option<Emptiness>) -> Candidate {
        Candidate {
            entry,
            matched,
            emptiness,
        }
    }

    #[test]
    fn move_creates_missing_target_first() {
        let snap = snapshot("/docs", false, Vec::new());
        let candidates = vec![
            candidate(entry("/docs", "report_A.txt", EntryKind::File), true, None),
            candidate(entry("/docs", "draft_B.txt", EntryKind::File), false, None),
        ];
        let plan = plan_move(
            &snap,
            &candidates,
            Path::new("/docs/archive"),
            &TargetListing::default(),
        );
        assert_eq!(plan.matched, 1);
        assert_eq!(
            plan.actions,
            vec![
                Action::CreateDir {
                    path: PathBuf::from("/docs/archive"),
                },
                Action::Move {
                    source: PathBuf::from("/docs/report_A.txt"),
                    dest: PathBuf::from("/docs/archive/report_A.txt"),
                },
            ]
        );
    }

    #[test]
    fn move_skips_existing_and_claimed_destinations() {
        let snap = snapshot("/r", true, Vec::new());
        let candidates = vec![
            candidate(entry("/r", "a/ep.mkv", EntryKind::File), true, None),
            candidate(entry("/r", "b/ep.mkv", EntryKind::File), true, None),
            candidate(entry("/r", "c/taken.mkv", EntryKind::File), true, None),
        ];
        let listing = TargetListing {
            exists: true,
            names: [OsString::from("taken.mkv")].into_iter().collect(),
        };
        let plan = plan_move(&snap, &candidates, Path::new("/t"), &listing);
        let reasons: Vec<_> = plan
            .actions
            .iter()
            .map(Action::kind_label)
            .collect();
        assert_eq!(reasons, vec!["move", "skip", "skip"]);
        assert!(matches!(
            &plan.actions[1],
            Action::Skip {
                reason: SkipReason::Collision,
                dest: Some(dest),
                ..
            } if dest == Path::new("/t/ep.mkv")
        ));
    }

    #[test]
    fn move_into_own_folder_plans_nothing() {
        let snap = snapshot("/docs", false, Vec::new());
        let candidates = vec![candidate(
            entry("/docs", "report.txt", EntryKind::File),
            true,
            None,
        )];
        let listing = TargetListing {
            exists: true,
            names: [OsString::from("report.txt")].into_iter().collect(),
        };
        let plan = plan_move(&snap, &candidates, Path::new("/docs"), &listing);
        assert_eq!(plan.matched, 1);
        assert!(plan.actions.is_empty());
    }

    #[test]
    fn rename_detects_unchanged_existing_and_claimed_names() -> TestResult {
        let snap = snapshot(
            "/f",
            false,
            vec![
                entry("/f", "Show_E01.mkv", EntryKind::File),
                entry("/f", "show EP01 v2.mkv", EntryKind::File),
                entry("/f", "show EP02.mkv", EntryKind::File),
                entry("/f", "show EP02 copy.mkv", EntryKind::File),
                entry("/f", "sub", EntryKind::Directory),
            ],
        );
        let rule = RenameRule::new("Show_", "E{num}")?;
        let plan = plan_rename(&snap, &rule);
        assert_eq!(plan.matched, 4);
        let labels: Vec<_> = plan
            .actions
            .iter()
            .map(|action| match action {
                Action::Skip { reason, .. } => reason.as_str(),
                other => other.kind_label(),
            })
            .collect();
        assert_eq!(labels, vec!["unchanged", "collision", "rename", "collision"]);
        Ok(())
    }

    #[test]
    fn rename_reports_unchanged_names() -> TestResult {
        let snap = snapshot("/f", false, vec![entry("/f", "X_.txt", EntryKind::File)]);
        let plan = plan_rename(&snap, &RenameRule::new("X_", "")?);
        assert!(matches!(
            plan.actions.as_slice(),
            [Action::Skip {
                reason: SkipReason::Unchanged,
                ..
            }]
        ));
        Ok(())
    }

    #[test]
    fn recursive_delete_orders_deepest_first() {
        let snap = snapshot("/r", true, Vec::new());
        let candidates = vec![
            candidate(
                entry("/r", "old", EntryKind::Directory),
                true,
                Some(Emptiness::Empty),
            ),
            candidate(
                entry("/r", "old/old_b", EntryKind::Directory),
                true,
                Some(Emptiness::Empty),
            ),
            candidate(
                entry("/r", "keep", EntryKind::Directory),
                false,
                None,
            ),
            candidate(
                entry("/r", "old_full", EntryKind::Directory),
                true,
                Some(Emptiness::NotEmpty),
            ),
        ];
        let plan = plan_delete(&snap, &candidates);
        assert_eq!(plan.matched, 3);
        assert_eq!(
            plan.actions,
            vec![
                Action::Delete {
                    path: PathBuf::from("/r/old/old_b"),
                },
                Action::Delete {
                    path: PathBuf::from("/r/old"),
                },
                Action::Skip {
                    path: PathBuf::from("/r/old_full"),
                    dest: None,
                    reason: SkipReason::NotEmpty,
                },
            ]
        );
    }

    #[test]
    fn identical_inputs_produce_identical_plans() -> TestResult {
        let snap = snapshot(
            "/f",
            false,
            vec![
                entry("/f", "a.txt", EntryKind::File),
                entry("/f", "b.txt", EntryKind::File),
            ],
        );
        let rule = RenameRule::new("Doc_", "{n}")?;
        assert_eq!(plan_rename(&snap, &rule), plan_rename(&snap, &rule));
        Ok(())
    }
}
