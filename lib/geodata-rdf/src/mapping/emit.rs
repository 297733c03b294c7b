use crate::mapping::coerce::{
    split_codes, to_boolean, to_date, to_integer, to_reference, to_year, DatePolicy,
};
use crate::mapping::rule::{MappingRule, ObjectMap, ParcelMapping, ValueKind};
use crate::vocab::geo;
use crate::{AttributeValue, CantonMapping, CoercionError, ParcelRecord};
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{Literal, NamedNode, Term, Triple};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// The order in which the triples are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TripleOrder {
    /// One block per rule, each block covering all records.
    #[default]
    ByColumn,
    /// All triples of a record before the next record.
    ByRecord,
}

/// Options of the mapping engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MappingOptions {
    pub date_policy: DatePolicy,
}

/// Counters collected while mapping records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MappingStats {
    /// Number of records that have been read.
    pub records: usize,
    /// Records without a usable identifier. They produce no triples.
    pub skipped_records: usize,
    /// Present values that could not be coerced to the target datatype.
    pub rejected_values: usize,
    /// Canton codes that are not part of the canton mapping.
    pub unmapped_cantons: usize,
}

/// A group of triples that have been produced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripleBlock {
    /// The predicate or class IRI the block was produced for, or `records`.
    pub label: String,
    pub triples: Vec<Triple>,
}

impl TripleBlock {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            triples: Vec::new(),
        }
    }
}

/// The result of mapping all records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub blocks: Vec<TripleBlock>,
    pub stats: MappingStats,
}

impl Emission {
    /// Iterates over the triples of all blocks in order.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.blocks.iter().flat_map(|block| block.triples.iter())
    }

    /// Returns the total number of triples.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|block| block.triples.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies a [ParcelMapping] to parcel records.
///
/// Both strategies ([Self::emit_by_column] and [Self::emit_by_record]) produce the same set of
/// triples. Only the order differs.
pub struct TripleEmitter<'map> {
    mapping: &'map ParcelMapping,
    cantons: &'map CantonMapping,
    options: MappingOptions,
}

impl<'map> TripleEmitter<'map> {
    pub fn new(
        mapping: &'map ParcelMapping,
        cantons: &'map CantonMapping,
        options: MappingOptions,
    ) -> Self {
        Self {
            mapping,
            cantons,
            options,
        }
    }

    /// Maps `records` in the given `order`.
    pub fn emit(&self, records: &[ParcelRecord], order: TripleOrder) -> Emission {
        info!(records = records.len(), "Generating triples");
        let emission = match order {
            TripleOrder::ByColumn => self.emit_by_column(records),
            TripleOrder::ByRecord => self.emit_by_record(records),
        };

        for block in &emission.blocks {
            debug!(block = %block.label, triples = block.triples.len(), "Emitted block");
        }
        let stats = &emission.stats;
        if stats.skipped_records > 0 {
            warn!(
                skipped = stats.skipped_records,
                "Skipped records without a usable identifier"
            );
        }
        if stats.rejected_values > 0 {
            warn!(
                rejected = stats.rejected_values,
                "Dropped values that could not be coerced"
            );
        }
        info!(
            triples = emission.len(),
            unmapped_cantons = stats.unmapped_cantons,
            "Generated triples"
        );
        emission
    }

    /// Produces one block per rule in declaration order, followed by the management units.
    pub fn emit_by_column(&self, records: &[ParcelRecord]) -> Emission {
        let mut stats = MappingStats {
            records: records.len(),
            ..MappingStats::default()
        };

        // Subjects are derived once and shared by all rules.
        let subjects = records
            .iter()
            .map(|record| self.subject(record, &mut stats))
            .collect::<Vec<_>>();

        let mut blocks = Vec::with_capacity(self.mapping.rules().len() + 1);
        for rule in self.mapping.rules() {
            let mut block = TripleBlock::new(rule.predicate.as_str());
            for (record, subject) in records.iter().zip(&subjects) {
                if let Some(subject) = subject {
                    self.apply_rule(rule, subject, record, &mut block.triples, &mut stats);
                }
            }
            blocks.push(block);
        }
        let identified = records
            .iter()
            .zip(&subjects)
            .filter_map(|(record, subject)| subject.as_ref().map(|_| record));
        blocks.push(self.unit_block(identified));

        Emission { blocks, stats }
    }

    /// Produces all triples of a record before moving to the next one, followed by the
    /// management units.
    pub fn emit_by_record(&self, records: &[ParcelRecord]) -> Emission {
        let mut stats = MappingStats::default();
        let mut block = TripleBlock::new("records");
        for record in records {
            self.emit_record(record, &mut block.triples, &mut stats);
        }
        let units = self.management_units(records);

        Emission {
            blocks: vec![block, units],
            stats,
        }
    }

    /// Appends the triples of a single record to `output` in rule order.
    ///
    /// The management unit types are not part of the result as they are deduplicated across
    /// all records.
    pub fn emit_record(
        &self,
        record: &ParcelRecord,
        output: &mut Vec<Triple>,
        stats: &mut MappingStats,
    ) {
        stats.records += 1;
        let Some(subject) = self.subject(record, stats) else {
            return;
        };
        for rule in self.mapping.rules() {
            self.apply_rule(rule, &subject, record, output, stats);
        }
    }

    /// Returns one `rdf:type` triple per distinct management unit in order of first
    /// appearance.
    ///
    /// Records without a usable identifier are ignored. Invalid unit identifiers are already
    /// counted by the reference rule and are skipped here.
    pub fn management_units(&self, records: &[ParcelRecord]) -> TripleBlock {
        self.unit_block(
            records
                .iter()
                .filter(|record| self.resolve_subject(record).is_ok()),
        )
    }

    fn unit_block<'r>(&self, records: impl Iterator<Item = &'r ParcelRecord>) -> TripleBlock {
        let units = self.mapping.management_units();
        let mut block = TripleBlock::new(units.class.as_str());
        let mut seen = HashSet::new();

        for value in records.filter_map(|r| r.get(&units.column)) {
            if !seen.insert(value.to_string().trim().to_owned()) {
                continue;
            }
            if let Ok(unit) = to_reference(&units.namespace, value) {
                block
                    .triples
                    .push(Triple::new(unit, rdf::TYPE, units.class.clone()));
            }
        }

        block
    }

    fn subject(&self, record: &ParcelRecord, stats: &mut MappingStats) -> Option<NamedNode> {
        match self.resolve_subject(record) {
            Ok(subject) => Some(subject),
            Err(None) => {
                debug!(column = %self.mapping.subject().column, "Record has no identifier");
                stats.skipped_records += 1;
                None
            }
            Err(Some(error)) => {
                debug!(%error, "Record has an invalid identifier");
                stats.skipped_records += 1;
                None
            }
        }
    }

    /// Fails with `None` if the identifier is missing.
    fn resolve_subject(&self, record: &ParcelRecord) -> Result<NamedNode, Option<CoercionError>> {
        let subject_map = self.mapping.subject();
        let id = record.get(&subject_map.column).ok_or(None)?;
        to_reference(&subject_map.namespace, id).map_err(Some)
    }

    fn apply_rule(
        &self,
        rule: &MappingRule,
        subject: &NamedNode,
        record: &ParcelRecord,
        output: &mut Vec<Triple>,
        stats: &mut MappingStats,
    ) {
        let (column, kind) = match &rule.object {
            ObjectMap::Constant(object) => {
                output.push(Triple::new(
                    subject.clone(),
                    rule.predicate.clone(),
                    object.clone(),
                ));
                return;
            }
            ObjectMap::Column { column, kind } => (column, kind),
        };
        let Some(value) = record.get(column) else {
            return;
        };
        let mut push = |object: Term| {
            output.push(Triple::new(subject.clone(), rule.predicate.clone(), object));
        };

        let result = match kind {
            ValueKind::Reference { namespace } => {
                to_reference(namespace, value).map(|iri| push(iri.into()))
            }
            ValueKind::MultiReference { namespace } => {
                multi_reference(namespace, value, &mut push)
            }
            ValueKind::CantonLookup => {
                let code = value.to_string();
                match self.cantons.get(code.trim()) {
                    Some(canton) => push(canton.into_owned().into()),
                    None => {
                        debug!(code = %code, "Canton code is not mapped");
                        stats.unmapped_cantons += 1;
                    }
                }
                Ok(())
            }
            ValueKind::Wkt => {
                push(Literal::new_typed_literal(value.to_string(), geo::WKT_LITERAL).into());
                Ok(())
            }
            ValueKind::Integer => to_integer(value).map(|v| push(Literal::from(v).into())),
            ValueKind::Year => {
                to_year(value).map(|v| push(Literal::new_typed_literal(v, xsd::G_YEAR).into()))
            }
            ValueKind::Boolean => to_boolean(value).map(|v| push(Literal::from(v).into())),
            ValueKind::Date => to_date(value, self.options.date_policy)
                .map(|v| push(Literal::new_typed_literal(v, xsd::DATE).into())),
        };

        if let Err(error) = result {
            reject(column, &error, stats);
        }
    }
}

/// Emits one reference per code. An invalid code does not prevent the others.
fn multi_reference(
    namespace: &str,
    value: &AttributeValue,
    push: &mut impl FnMut(Term),
) -> Result<(), CoercionError> {
    let codes = value.to_string();
    let mut first_error = None;
    for code in split_codes(&codes) {
        match to_reference(namespace, &AttributeValue::from(code)) {
            Ok(iri) => push(iri.into()),
            Err(error) => {
                first_error.get_or_insert(error);
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn reject(column: &str, error: &CoercionError, stats: &mut MappingStats) {
    debug!(column, %error, "Dropping value");
    stats.rejected_values += 1;
}
