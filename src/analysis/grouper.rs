//! Package grouping and duplicate detection

use crate::domain::{LockEntry, MajorKey, MinorKey, PackageGroup};
use semver::Version;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Total order on optional resolved versions; unversioned entries sort last
pub fn compare_versions(a: Option<&Version>, b: Option<&Version>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Group entries by package name, in order of first appearance.
///
/// Members are sorted by resolved version; entries with equal versions
/// keep their file order.
pub fn group_entries(entries: &[LockEntry]) -> Vec<PackageGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<PackageGroup> = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        let slot = *index.entry(entry.package.as_str()).or_insert_with(|| {
            groups.push(PackageGroup::new(entry.package.clone()));
            groups.len() - 1
        });
        groups[slot].members.push(idx);
    }

    for group in &mut groups {
        group.members.sort_by(|&a, &b| {
            compare_versions(entries[a].version.as_ref(), entries[b].version.as_ref())
                .then(entries[a].span.start.cmp(&entries[b].span.start))
        });
        detect_duplicates(group, entries);
    }

    groups
}

/// Fill `duplicate_majors` and `duplicate_minors` for a group
fn detect_duplicates(group: &mut PackageGroup, entries: &[LockEntry]) {
    if !group.has_multiple() {
        return;
    }

    let mut majors: BTreeMap<MajorKey, usize> = BTreeMap::new();
    let mut minors: BTreeMap<MinorKey, usize> = BTreeMap::new();

    for &idx in &group.members {
        let Some(version) = entries[idx].version.as_ref() else {
            continue;
        };
        *majors.entry(MajorKey::of(version)).or_default() += 1;
        *minors.entry(MinorKey::of(version)).or_default() += 1;
    }

    group.duplicate_majors = majors
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key)
        .collect();
    group.duplicate_minors = minors
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key)
        .collect();
}
