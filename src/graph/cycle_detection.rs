use crate::core::name::Name;
use crate::graph::referral_map::ReferralMap;
use std::collections::{HashMap, HashSet};

/// A loop in the referral relation: each name was referred by the next,
/// and the last was referred by the first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReferralCycle {
    /// Names on the loop, rotated so the smallest name comes first.
    pub names: Vec<Name>,
}

impl ReferralCycle {
    /// Number of names (and links) in this cycle.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True for a deal that names itself as its referrer.
    pub fn is_self_referral(&self) -> bool {
        self.names.len() == 1
    }
}

/// Detect every cycle in the referral map.
///
/// Each name has at most one parent, so every component contains at most
/// one cycle and a single walk per unvisited name finds it. Returns cycles
/// in canonical form, sorted.
///
/// # Algorithm
///
/// Walk parent links from each unvisited name, tagging names with the id of
/// the walk that reached them. Running into a name tagged by the current
/// walk closes a cycle; running into an older tag or a root ends the walk.
pub fn find_cycles(map: &ReferralMap) -> Vec<ReferralCycle> {
    let mut starts: Vec<&Name> = map.links().map(|(name, _)| name).collect();
    starts.sort();

    let mut walk_of: HashMap<&Name, usize> = HashMap::new();
    let mut cycles = Vec::new();

    for (walk, start) in starts.into_iter().enumerate() {
        if walk_of.contains_key(start) {
            continue;
        }
        let mut path: Vec<&Name> = Vec::new();
        let mut current = start;
        loop {
            if let Some(&seen) = walk_of.get(current) {
                if seen == walk {
                    let at = path.iter().position(|n| *n == current).unwrap_or(0);
                    cycles.push(ReferralCycle {
                        names: canonical_form(&path[at..]),
                    });
                }
                break;
            }
            walk_of.insert(current, walk);
            path.push(current);
            match map.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    deduplicate_cycles(&mut cycles);
    cycles.sort();
    cycles
}

/// Remove duplicate cycles (same names in rotated order).
fn deduplicate_cycles(cycles: &mut Vec<ReferralCycle>) {
    let mut seen: HashSet<Vec<Name>> = HashSet::new();
    cycles.retain(|cycle| seen.insert(cycle.names.clone()));
}

/// Normalize a cycle to its canonical (smallest rotation) form.
fn canonical_form(names: &[&Name]) -> Vec<Name> {
    let n = names.len();
    let mut best: Vec<Name> = names.iter().map(|&name| name.clone()).collect();
    for i in 1..n {
        let rotated: Vec<Name> = names[i..]
            .iter()
            .chain(names[..i].iter())
            .map(|&name| name.clone())
            .collect();
        if rotated < best {
            best = rotated;
        }
    }
    best
}
