//! Paradigm depth: longest chain of strictly growing explained sets.

use puzzle_rules::{DescriptorId, Paradigm, ParadigmId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::is_strict_subset;
use crate::belief::Observations;
use crate::engine::explained_set;

/// Label every paradigm with the length of the longest chain of paradigms
/// below it, ordered by strict inclusion of explained sets under O*.
///
/// Minimal paradigms get 0.
pub fn compute_depths(
    paradigms: &BTreeMap<ParadigmId, Paradigm>,
    o_star: &Observations,
) -> BTreeMap<ParadigmId, usize> {
    let explained: BTreeMap<&ParadigmId, BTreeSet<DescriptorId>> = paradigms
        .iter()
        .map(|(id, p)| (id, explained_set(o_star, p)))
        .collect();

    let mut memo = HashMap::new();
    let mut visiting = HashSet::new();
    paradigms
        .keys()
        .map(|id| (id.clone(), depth_of(id, &explained, &mut memo, &mut visiting)))
        .collect()
}

fn depth_of<'a>(
    id: &'a ParadigmId,
    explained: &BTreeMap<&'a ParadigmId, BTreeSet<DescriptorId>>,
    memo: &mut HashMap<&'a ParadigmId, usize>,
    visiting: &mut HashSet<&'a ParadigmId>,
) -> usize {
    if let Some(depth) = memo.get(id) {
        return *depth;
    }
    // Strict inclusion cannot cycle, but never recurse into an open frame.
    if !visiting.insert(id) {
        return 0;
    }

    let own = &explained[id];
    let below: Vec<&'a ParadigmId> = explained
        .iter()
        .filter(|(_, other)| is_strict_subset(other, own))
        .map(|(other, _)| *other)
        .collect();

    let depth = below
        .into_iter()
        .map(|other| depth_of(other, explained, memo, visiting) + 1)
        .max()
        .unwrap_or(0);

    visiting.remove(id);
    memo.insert(id, depth);
    depth
}
