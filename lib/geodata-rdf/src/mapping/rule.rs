use crate::vocab::geo;
use crate::{Vocabulary, GEOMETRY_COLUMN};
use oxrdf::vocab::rdf;
use oxrdf::NamedNode;

/// Column names of the parcel layer.
pub mod columns {
    pub const ID: &str = "t_id";
    pub const LAND_USE_CODE: &str = "lnf_code";
    pub const AREA: &str = "flaeche_m2";
    pub const TREES: &str = "anzahl_baeume";
    pub const MANAGEMENT_DEGREE: &str = "bewirtschaftungsgrad";
    pub const REFERENCE_YEAR: &str = "bezugsjahr";
    pub const COMMITMENT_START: &str = "verpflichtung_von";
    pub const COMMITMENT_END: &str = "verpflichtung_bis";
    pub const ELIGIBLE: &str = "beitragsberechtigt";
    pub const USED_IN_CONTRIBUTION_YEAR: &str = "nutzung_im_beitragsjahr";
    pub const NATURE_PROTECTION: &str = "nhg";
    pub const MOWING_DATE: &str = "schnittzeitpunkt";
    pub const PROGRAMS: &str = "code_programm";
    pub const FARM: &str = "identifikator_be";
    pub const CANTON: &str = "kanton";
}

/// Describes how a column value is turned into an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `<namespace><value>`
    Reference { namespace: String },
    /// One `<namespace><code>` per code of a semicolon-delimited list.
    MultiReference { namespace: String },
    /// The canton IRI of a canton code. Unknown codes produce nothing.
    CantonLookup,
    /// A `geo:wktLiteral`.
    Wkt,
    /// An `xsd:integer`.
    Integer,
    /// An `xsd:gYear`.
    Year,
    /// An `xsd:boolean`.
    Boolean,
    /// An `xsd:date`.
    Date,
}

/// The object part of a [MappingRule].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectMap {
    /// The same IRI for every record.
    Constant(NamedNode),
    /// Derived from the value of a column.
    Column { column: String, kind: ValueKind },
}

/// Maps a record to zero or more triples with the same predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingRule {
    pub predicate: NamedNode,
    pub object: ObjectMap,
}

impl MappingRule {
    /// Creates a rule with a constant object.
    pub fn constant(predicate: impl Into<NamedNode>, object: impl Into<NamedNode>) -> Self {
        Self {
            predicate: predicate.into(),
            object: ObjectMap::Constant(object.into()),
        }
    }

    /// Creates a rule that reads `column`.
    pub fn column(
        predicate: impl Into<NamedNode>,
        column: impl Into<String>,
        kind: ValueKind,
    ) -> Self {
        Self {
            predicate: predicate.into(),
            object: ObjectMap::Column {
                column: column.into(),
                kind,
            },
        }
    }

    /// Returns the source column, if any.
    pub fn column_name(&self) -> Option<&str> {
        match &self.object {
            ObjectMap::Constant(_) => None,
            ObjectMap::Column { column, .. } => Some(column),
        }
    }
}

/// Derives the subject IRI of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectMap {
    pub column: String,
    pub namespace: String,
}

/// Declares the type of entities that are referenced by a column.
///
/// Each distinct value yields exactly one `rdf:type` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTypeMap {
    pub column: String,
    pub namespace: String,
    pub class: NamedNode,
}

/// The complete set of rules that turn parcel records into triples.
///
/// Rules are applied in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelMapping {
    subject: SubjectMap,
    rules: Vec<MappingRule>,
    management_units: EntityTypeMap,
}

impl ParcelMapping {
    pub fn new(
        subject: SubjectMap,
        rules: Vec<MappingRule>,
        management_units: EntityTypeMap,
    ) -> Self {
        Self {
            subject,
            rules,
            management_units,
        }
    }

    /// The rules for the agricultural parcel layer.
    pub fn standard(vocabulary: &Vocabulary) -> Self {
        let v = vocabulary;
        let rules = vec![
            MappingRule::constant(rdf::TYPE, v.term("Cultivation")),
            MappingRule::column(
                v.term("cultivationtype"),
                columns::LAND_USE_CODE,
                ValueKind::Reference {
                    namespace: v.cultivation_type_namespace(),
                },
            ),
            MappingRule::column(geo::AS_WKT, GEOMETRY_COLUMN, ValueKind::Wkt),
            MappingRule::column(v.term("area"), columns::AREA, ValueKind::Integer),
            MappingRule::column(v.term("trees"), columns::TREES, ValueKind::Integer),
            MappingRule::column(
                v.term("managementDegree"),
                columns::MANAGEMENT_DEGREE,
                ValueKind::Integer,
            ),
            MappingRule::column(
                v.term("referenceYear"),
                columns::REFERENCE_YEAR,
                ValueKind::Year,
            ),
            MappingRule::column(
                v.term("commitmentStart"),
                columns::COMMITMENT_START,
                ValueKind::Year,
            ),
            MappingRule::column(
                v.term("commitmentEnd"),
                columns::COMMITMENT_END,
                ValueKind::Year,
            ),
            MappingRule::column(v.term("eligible"), columns::ELIGIBLE, ValueKind::Boolean),
            MappingRule::column(
                v.term("usedInContributionYear"),
                columns::USED_IN_CONTRIBUTION_YEAR,
                ValueKind::Boolean,
            ),
            MappingRule::column(
                v.term("natureProtection"),
                columns::NATURE_PROTECTION,
                ValueKind::Boolean,
            ),
            MappingRule::column(v.term("movingDate"), columns::MOWING_DATE, ValueKind::Date),
            MappingRule::column(
                v.term("program"),
                columns::PROGRAMS,
                ValueKind::MultiReference {
                    namespace: v.program_namespace(),
                },
            ),
            MappingRule::column(
                v.term("managementUnit"),
                columns::FARM,
                ValueKind::Reference {
                    namespace: v.farm_namespace(),
                },
            ),
            MappingRule::column(v.term("canton"), columns::CANTON, ValueKind::CantonLookup),
        ];

        Self::new(
            SubjectMap {
                column: columns::ID.to_owned(),
                namespace: v.cultivation_namespace(),
            },
            rules,
            EntityTypeMap {
                column: columns::FARM.to_owned(),
                namespace: v.farm_namespace(),
                class: v.term("ManagementUnit"),
            },
        )
    }

    pub fn subject(&self) -> &SubjectMap {
        &self.subject
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn management_units(&self) -> &EntityTypeMap {
        &self.management_units
    }

    /// Returns every source column that the mapping reads, without the geometry.
    pub fn attribute_columns(&self) -> Vec<&str> {
        let mut result: Vec<&str> = vec![self.subject.column.as_str()];
        let referenced = self
            .rules
            .iter()
            .filter_map(MappingRule::column_name)
            .chain([self.management_units.column.as_str()]);
        for column in referenced {
            if column != GEOMETRY_COLUMN && !result.contains(&column) {
                result.push(column);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_mapping_starts_with_type_rule() {
        let mapping = ParcelMapping::standard(&Vocabulary::default());
        assert_eq!(
            mapping.rules()[0],
            MappingRule::constant(
                rdf::TYPE,
                NamedNode::new_unchecked("https://agriculture.ld.admin.ch/crops/Cultivation")
            )
        );
        assert_eq!(mapping.rules().len(), 16);
    }

    #[test]
    fn attribute_columns_are_distinct_and_skip_geometry() {
        let mapping = ParcelMapping::standard(&Vocabulary::default());
        let names = mapping.attribute_columns();

        assert_eq!(names[0], columns::ID);
        assert!(!names.contains(&GEOMETRY_COLUMN));
        assert_eq!(names.iter().filter(|c| **c == columns::FARM).count(), 1);
        assert_eq!(names.len(), 15);
    }
}
