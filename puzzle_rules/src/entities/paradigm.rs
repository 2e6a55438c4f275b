//! Paradigm definitions - candidate explanations of the story.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::{DescriptorId, ParadigmId};
use crate::error::{RulesError, RulesResult};

/// A directed, weighted propagation edge inside one paradigm's belief space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub source: DescriptorId,
    pub target: DescriptorId,
    /// Pull strength in (0, 1].
    pub weight: f64,
}

/// A candidate explanation of the story.
///
/// Predictions, the conceivable set, and relations are validated once in
/// [`ParadigmBuilder::build`] and never change afterwards. The derived
/// annotations (`neighbors`, `shift_threshold`, `depth`) are written by the
/// derivation pass before play starts.
#[derive(Debug, Clone, Serialize)]
pub struct Paradigm {
    pub id: ParadigmId,
    pub name: String,

    p_pred: BTreeMap<DescriptorId, bool>,
    conceivable: BTreeSet<DescriptorId>,
    relations: Vec<Relation>,

    /// Direct, non-redundant improvements over this paradigm.
    pub neighbors: BTreeSet<ParadigmId>,
    /// Minimum resolved anomalies before a shift into this paradigm is licensed.
    pub shift_threshold: Option<usize>,
    /// Position in the explanatory partial order, 0 = shallowest.
    pub depth: usize,

    threshold_authored: bool,
}

impl Paradigm {
    /// Start building a paradigm.
    pub fn builder(id: impl Into<ParadigmId>, name: impl Into<String>) -> ParadigmBuilder {
        ParadigmBuilder {
            id: id.into(),
            name: name.into(),
            predictions: Vec::new(),
            conceivable: None,
            relations: Vec::new(),
            shift_threshold: None,
        }
    }

    /// The paradigm's prediction for a descriptor, if it has one.
    pub fn prediction(&self, descriptor: &str) -> Option<bool> {
        self.p_pred.get(descriptor).copied()
    }

    /// All predictions, keyed by descriptor.
    pub fn predictions(&self) -> &BTreeMap<DescriptorId, bool> {
        &self.p_pred
    }

    /// Descriptors this paradigm can actively reason about during play.
    pub fn conceivable(&self) -> &BTreeSet<DescriptorId> {
        &self.conceivable
    }

    /// Check if a descriptor is conceivable under this paradigm.
    pub fn is_conceivable(&self, descriptor: &str) -> bool {
        self.conceivable.contains(descriptor)
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Relations leaving `descriptor`, in declaration order.
    pub fn relations_from<'a>(&'a self, descriptor: &'a str) -> impl Iterator<Item = &'a Relation> {
        self.relations
            .iter()
            .filter(move |rel| rel.source.as_str() == descriptor)
    }

    /// Descriptors predicted true (D+).
    pub fn predicts_true(&self) -> impl Iterator<Item = &DescriptorId> {
        self.p_pred.iter().filter(|(_, v)| **v).map(|(d, _)| d)
    }

    /// Descriptors predicted false (D-).
    pub fn predicts_false(&self) -> impl Iterator<Item = &DescriptorId> {
        self.p_pred.iter().filter(|(_, v)| !**v).map(|(d, _)| d)
    }

    /// Whether the shift threshold came from the puzzle file rather than derivation.
    pub fn has_authored_threshold(&self) -> bool {
        self.threshold_authored
    }
}

/// Builder that validates a paradigm on [`build`](ParadigmBuilder::build).
#[derive(Debug, Clone)]
pub struct ParadigmBuilder {
    id: ParadigmId,
    name: String,
    predictions: Vec<(DescriptorId, bool)>,
    conceivable: Option<Vec<DescriptorId>>,
    relations: Vec<Relation>,
    shift_threshold: Option<usize>,
}

impl ParadigmBuilder {
    /// Add a prediction for a descriptor.
    pub fn predict(mut self, descriptor: impl Into<DescriptorId>, value: bool) -> Self {
        self.predictions.push((descriptor.into(), value));
        self
    }

    /// Add multiple predictions.
    pub fn predictions<I, D>(mut self, predictions: I) -> Self
    where
        I: IntoIterator<Item = (D, bool)>,
        D: Into<DescriptorId>,
    {
        self.predictions
            .extend(predictions.into_iter().map(|(d, v)| (d.into(), v)));
        self
    }

    /// Restrict the conceivable set. Defaults to every predicted descriptor.
    pub fn conceivable<I, D>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DescriptorId>,
    {
        self.conceivable = Some(descriptors.into_iter().map(Into::into).collect());
        self
    }

    /// Add a propagation edge.
    pub fn relation(
        mut self,
        source: impl Into<DescriptorId>,
        target: impl Into<DescriptorId>,
        weight: f64,
    ) -> Self {
        self.relations.push(Relation {
            source: source.into(),
            target: target.into(),
            weight,
        });
        self
    }

    /// Set an authored shift threshold, which derivation will not overwrite.
    pub fn shift_threshold(mut self, threshold: usize) -> Self {
        self.shift_threshold = Some(threshold);
        self
    }

    /// Validate and build the paradigm.
    pub fn build(self) -> RulesResult<Paradigm> {
        let mut p_pred = BTreeMap::new();
        for (descriptor, value) in self.predictions {
            match p_pred.get(&descriptor) {
                Some(existing) if *existing != value => {
                    return Err(RulesError::ConflictingPrediction {
                        paradigm: self.id,
                        descriptor,
                    });
                }
                _ => {
                    p_pred.insert(descriptor, value);
                }
            }
        }

        let conceivable: BTreeSet<DescriptorId> = match self.conceivable {
            Some(list) => list.into_iter().collect(),
            None => p_pred.keys().cloned().collect(),
        };

        let missing: Vec<_> = conceivable
            .iter()
            .filter(|d| !p_pred.contains_key(*d))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RulesError::ConceivableWithoutPrediction {
                paradigm: self.id,
                descriptors: missing,
            });
        }

        for rel in &self.relations {
            for endpoint in [&rel.source, &rel.target] {
                if !conceivable.contains(endpoint) {
                    return Err(RulesError::RelationOutsideConceivable {
                        paradigm: self.id,
                        descriptor: endpoint.clone(),
                    });
                }
            }
            if !(rel.weight > 0.0 && rel.weight <= 1.0) {
                return Err(RulesError::InvalidRelationWeight {
                    paradigm: self.id,
                    source_id: rel.source.clone(),
                    target: rel.target.clone(),
                    weight: rel.weight,
                });
            }
        }

        Ok(Paradigm {
            id: self.id,
            name: self.name,
            p_pred,
            conceivable,
            relations: self.relations,
            neighbors: BTreeSet::new(),
            shift_threshold: self.shift_threshold,
            depth: 0,
            threshold_authored: self.shift_threshold.is_some(),
        })
    }
}
