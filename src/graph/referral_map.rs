use crate::core::deal::DealSet;
use crate::core::name::Name;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors surfaced while resolving a referral chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Following parent links from `start` revisited a name.
    /// `cycle` lists the names on the loop in walk order.
    #[error("referral cycle reached from '{start}': {}", format_cycle(.cycle))]
    Cycle { start: Name, cycle: Vec<Name> },
}

fn format_cycle(cycle: &[Name]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(Name::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}

/// The `name -> referred_by` relation of a deal set.
///
/// Each name has at most one parent. A name that is not a key has no known
/// referrer and is therefore the root of every chain that reaches it.
///
/// [`find_root`](ReferralMap::find_root) compresses paths as it goes: every
/// name visited on the way up is re-pointed directly at the root, so later
/// lookups through the same chain take a single step. There is no union
/// operation; the parent relation comes from the input.
///
/// # Examples
///
/// ```
/// use referral_breakdown::core::name::Name;
/// use referral_breakdown::graph::referral_map::ReferralMap;
///
/// let mut map = ReferralMap::new();
/// map.insert(Name::new("B"), Name::new("A"));
/// map.insert(Name::new("C"), Name::new("B"));
///
/// assert_eq!(map.find_root(&Name::new("C")).unwrap(), Name::new("A"));
/// // C now points straight at the root.
/// assert_eq!(map.parent(&Name::new("C")), Some(&Name::new("A")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferralMap {
    /// name -> referrer
    parents: HashMap<Name, Name>,
}

impl ReferralMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the map from every deal that carries a referrer.
    pub fn from_deals(deals: &DealSet) -> Self {
        let mut map = Self::new();
        for deal in deals.referred() {
            if let Some(referrer) = deal.referred_by() {
                map.insert(deal.name().clone(), referrer.clone());
            }
        }
        debug!(
            "built referral map with {} links from {} deals",
            map.len(),
            deals.len()
        );
        map
    }

    /// Record that `name` was referred by `referrer`, replacing any
    /// previous parent.
    pub fn insert(&mut self, name: Name, referrer: Name) -> Option<Name> {
        self.parents.insert(name, referrer)
    }

    /// The current parent of `name`, if it has one.
    pub fn parent(&self, name: &Name) -> Option<&Name> {
        self.parents.get(name)
    }

    /// True if `name` has a known referrer (i.e. it is not a root).
    pub fn contains(&self, name: &Name) -> bool {
        self.parents.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// All (name, parent) links.
    pub fn links(&self) -> impl Iterator<Item = (&Name, &Name)> {
        self.parents.iter()
    }

    /// Find the initial referrer of `name`.
    ///
    /// Walks parent links until it reaches a name that is not a key, then
    /// points every visited name at that root. Returns `name` itself when
    /// it has no parent.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Cycle`] if the walk revisits a name. The map is left
    /// untouched in that case.
    pub fn find_root(&mut self, name: &Name) -> Result<Name, ResolveError> {
        let mut path: Vec<Name> = Vec::new();
        let mut on_path: HashSet<Name> = HashSet::new();
        let mut current = name.clone();

        while let Some(parent) = self.parents.get(&current) {
            let parent = parent.clone();
            if !on_path.insert(current.clone()) {
                let at = path.iter().position(|n| *n == current).unwrap_or(0);
                let cycle = path.split_off(at);
                warn!("referral cycle detected starting from '{}'", name);
                return Err(ResolveError::Cycle {
                    start: name.clone(),
                    cycle,
                });
            }
            path.push(current);
            current = parent;
        }

        // Compress: the last visited name already points at the root.
        if path.len() > 1 {
            for visited in &path[..path.len() - 1] {
                self.parents.insert(visited.clone(), current.clone());
            }
        }
        Ok(current)
    }
}

impl FromIterator<(Name, Name)> for ReferralMap {
    fn from_iter<T: IntoIterator<Item = (Name, Name)>>(iter: T) -> Self {
        Self {
            parents: iter.into_iter().collect(),
        }
    }
}
