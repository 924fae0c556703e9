//! Keyword predicates and directory emptiness.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use crate::model::{Candidate, Emptiness, Entry, EntryKind, Snapshot};

/// Case-sensitive substring test against a base name.
#[must_use]
pub fn keyword_matches(name: &OsStr, keyword: &str) -> bool {
    name.to_string_lossy().contains(keyword)
}

/// Regular files of the snapshot, flagged by keyword match.
#[must_use]
pub fn file_candidates(snapshot: &Snapshot, keyword: &str) -> Vec<Candidate> {
    snapshot
        .entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .map(|entry| Candidate {
            entry: entry.clone(),
            matched: keyword_matches(&entry.name, keyword),
            emptiness: None,
        })
        .collect()
}

/// Directories of the snapshot, flagged by keyword match, with emptiness for matches.
///
/// Non-recursive snapshots probe each matching directory on disk. Recursive
/// snapshots resolve emptiness bottom-up: a matching directory is empty when
/// each of its children is itself a matching, empty directory.
#[must_use]
pub fn directory_candidates(snapshot: &Snapshot, keyword: &str) -> Vec<Candidate> {
    let matched: Vec<bool> = snapshot
        .entries
        .iter()
        .map(|entry| entry.is_dir() && keyword_matches(&entry.name, keyword))
        .collect();
    let emptiness = if snapshot.recursive {
        resolve_emptiness(snapshot, &matched)
    } else {
        snapshot
            .entries
            .iter()
            .zip(&matched)
            .map(|(entry, matched)| matched.then(|| probe_emptiness(&entry.path)))
            .collect()
    };

    snapshot
        .entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.is_dir())
        .map(|(index, entry)| Candidate {
            entry: entry.clone(),
            matched: matched[index],
            emptiness: emptiness[index],
        })
        .collect()
}

/// Read a directory and report whether it holds anything.
#[must_use]
pub fn probe_emptiness(path: &Path) -> Emptiness {
    match fs::read_dir(path) {
        Ok(mut entries) => {
            if entries.next().is_none() {
                Emptiness::Empty
            } else {
                Emptiness::NotEmpty
            }
        }
        Err(_) => Emptiness::Unreadable,
    }
}

fn resolve_emptiness(snapshot: &Snapshot, matched: &[bool]) -> Vec<Option<Emptiness>> {
    let entries = &snapshot.entries;
    let children = children_by_parent(entries);
    let mut removable = vec![false; entries.len()];
    let mut emptiness = vec![None; entries.len()];

    // Pre-order puts every child after its parent; walking backwards settles children first.
    for index in (0..entries.len()).rev() {
        if !matched[index] {
            continue;
        }
        let path = entries[index].path.as_path();
        let state = if snapshot.is_unreadable(path) {
            Emptiness::Unreadable
        } else if snapshot.has_unreadable_child(path) {
            Emptiness::NotEmpty
        } else if children
            .get(path)
            .is_none_or(|kids| kids.iter().all(|&kid| removable[kid]))
        {
            Emptiness::Empty
        } else {
            Emptiness::NotEmpty
        };
        removable[index] = state == Emptiness::Empty;
        emptiness[index] = Some(state);
    }
    emptiness
}

fn children_by_parent(entries: &[Entry]) -> HashMap<&Path, Vec<usize>> {
    let mut children: HashMap<&Path, Vec<usize>> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Some(parent) = entry.path.parent() {
            children.entry(parent).or_default().push(index);
        }
    }
    children
}
