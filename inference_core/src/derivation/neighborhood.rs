//! Neighbor relation and shift thresholds under O*.

use puzzle_rules::{DescriptorId, Paradigm, ParadigmId};
use std::collections::{BTreeMap, BTreeSet};

use super::is_strict_subset;
use crate::belief::Observations;
use crate::engine::{anomaly_set, explained_set, resolve};

/// Compute N(P) for every paradigm.
///
/// P' is a neighbor of P when it carries strictly less tension, leaves a
/// strictly smaller part of P's anomalies unresolved, keeps a maximal
/// remaining set among such candidates, and does not explain strictly more
/// than another surviving candidate. Paradigms without anomalies have no
/// neighbors.
pub fn compute_neighborhoods(
    paradigms: &BTreeMap<ParadigmId, Paradigm>,
    o_star: &Observations,
) -> BTreeMap<ParadigmId, BTreeSet<ParadigmId>> {
    let anomalies: BTreeMap<&ParadigmId, BTreeSet<DescriptorId>> = paradigms
        .iter()
        .map(|(id, p)| (id, anomaly_set(o_star, p)))
        .collect();
    let explained: BTreeMap<&ParadigmId, BTreeSet<DescriptorId>> = paradigms
        .iter()
        .map(|(id, p)| (id, explained_set(o_star, p)))
        .collect();

    let mut result = BTreeMap::new();
    for id in paradigms.keys() {
        let own = &anomalies[id];
        if own.is_empty() {
            result.insert(id.clone(), BTreeSet::new());
            continue;
        }

        // Strictly less tension and a strictly smaller remaining anomaly set.
        let candidates: Vec<(&ParadigmId, BTreeSet<DescriptorId>)> = paradigms
            .keys()
            .filter(|other| *other != id)
            .filter(|other| anomalies[other].len() < own.len())
            .map(|other| {
                let remaining: BTreeSet<DescriptorId> =
                    own.intersection(&anomalies[other]).cloned().collect();
                (other, remaining)
            })
            .filter(|(_, remaining)| is_strict_subset(remaining, own))
            .collect();

        // Keep only maximal remaining sets.
        let maximal: Vec<&ParadigmId> = candidates
            .iter()
            .filter(|(_, remaining)| {
                !candidates
                    .iter()
                    .any(|(_, other)| is_strict_subset(remaining, other))
            })
            .map(|(other, _)| *other)
            .collect();

        // Drop candidates that explain strictly more than another survivor.
        let neighbors: BTreeSet<ParadigmId> = maximal
            .iter()
            .filter(|candidate| {
                !maximal
                    .iter()
                    .any(|other| is_strict_subset(&explained[other], &explained[*candidate]))
            })
            .map(|candidate| (*candidate).clone())
            .collect();

        result.insert(id.clone(), neighbors);
    }
    result
}

/// Compute the shift threshold N(T) for every paradigm.
///
/// N(T) is the smallest number of anomalies any source S with T in N(S)
/// resolves under O*. `None` when nothing points to T. An authored threshold
/// is returned unchanged. Reads the `neighbors` already stored on each paradigm.
pub fn compute_shift_thresholds(
    paradigms: &BTreeMap<ParadigmId, Paradigm>,
    o_star: &Observations,
) -> BTreeMap<ParadigmId, Option<usize>> {
    paradigms
        .iter()
        .map(|(id, target)| {
            if target.has_authored_threshold() {
                return (id.clone(), target.shift_threshold);
            }
            let derived = paradigms
                .values()
                .filter(|source| source.neighbors.contains(id))
                .map(|source| resolve(o_star, source, target))
                .min();
            (id.clone(), derived)
        })
        .collect()
}
