use crate::VocabularyError;
use oxiri::Iri;
use oxrdf::NamedNode;

/// The base IRI of the agricultural crops vocabulary.
pub const DEFAULT_BASE_IRI: &str = "https://agriculture.ld.admin.ch/crops/";

/// [GeoSPARQL](https://www.ogc.org/standard/geosparql/) terms.
pub mod geo {
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://www.opengis.net/ont/geosparql#";
    /// `geo:asWKT`
    pub const AS_WKT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/geosparql#asWKT");
    /// `geo:wktLiteral`
    pub const WKT_LITERAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/geosparql#wktLiteral");
}

/// The namespaces used for the generated triples.
///
/// Every namespace is derived from a single base IRI that is validated once. The vocabulary is
/// passed explicitly to the mapping engine and the serializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vocabulary {
    base: String,
}

impl Vocabulary {
    /// Creates a new [Vocabulary] from `base`.
    ///
    /// The base must be an absolute IRI that ends with `/` or `#` such that local names can be
    /// appended.
    pub fn new(base: impl Into<String>) -> Result<Self, VocabularyError> {
        let base = base.into();
        if let Err(source) = Iri::parse(base.as_str()) {
            return Err(VocabularyError::InvalidIri { iri: base, source });
        }
        if !base.ends_with('/') && !base.ends_with('#') {
            return Err(VocabularyError::MissingSeparator(base));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the term `local` in the base namespace.
    ///
    /// `local` must only contain characters that are valid in an IRI.
    pub fn term(&self, local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("{}{local}", self.base))
    }

    /// Namespace of the parcel subjects.
    pub fn cultivation_namespace(&self) -> String {
        format!("{}cultivation/", self.base)
    }

    /// Namespace of the land-use codes.
    pub fn cultivation_type_namespace(&self) -> String {
        format!("{}cultivationtype/", self.base)
    }

    /// Namespace of the management units (farms).
    pub fn farm_namespace(&self) -> String {
        format!("{}farm/", self.base)
    }

    /// Namespace of the contribution program codes.
    pub fn program_namespace(&self) -> String {
        format!("{}program/", self.base)
    }

    /// Returns the prefixes that are declared in pretty Turtle output.
    ///
    /// The nested namespaces get no prefix of their own. The Turtle serializer abbreviates with
    /// the first matching prefix in IRI order, which is always the base.
    pub fn prefixes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#".to_owned()),
            ("xsd", "http://www.w3.org/2001/XMLSchema#".to_owned()),
            ("geo", geo::NAMESPACE.to_owned()),
            ("crops", self.base.clone()),
        ]
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_IRI.to_owned(),
        }
    }
}
