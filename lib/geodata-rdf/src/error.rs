use gdal::errors::GdalError;
use oxrdf::IriParseError;
use reqwest::StatusCode;
use std::path::PathBuf;

/// An error returned if a [`Vocabulary`](crate::Vocabulary) cannot be built from a base IRI.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("Invalid base IRI '{iri}'")]
    InvalidIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
    #[error("The base IRI '{0}' must end with '/' or '#'")]
    MissingSeparator(String),
}

/// An error raised while resolving the canton mapping.
///
/// All of these errors are fatal for a conversion run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CantonError {
    /// The request could not be sent or its body could not be read.
    #[error("Could not query the canton data from '{endpoint}'")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint answered with a non-success status code.
    #[error("Canton query to '{endpoint}' was not OK. Actual: {status}")]
    Status { endpoint: String, status: StatusCode },
    /// The response was not valid CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A required column is missing in the CSV header.
    #[error("The canton data has no '{0}' column")]
    MissingColumn(&'static str),
    /// A canton identifier is not a valid IRI.
    #[error("Invalid canton IRI '{iri}'")]
    InvalidIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
}

/// An error raised while loading parcels from a GeoPackage.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("Could not open the GeoPackage '{}'", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: GdalError,
    },
    #[error("The layer '{layer}' does not exist")]
    MissingLayer {
        layer: String,
        #[source]
        source: GdalError,
    },
    #[error("The layer '{0}' has no coordinate reference system")]
    MissingSpatialRef(String),
    #[error("The identifier column '{column}' does not exist in layer '{layer}'")]
    MissingIdColumn { column: String, layer: String },
    #[error(transparent)]
    Gdal(#[from] GdalError),
}

/// A present attribute value that cannot be turned into an RDF term.
///
/// These are not fatal. The value is dropped and counted.
#[derive(Debug, thiserror::Error)]
pub enum CoercionError {
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),
    #[error("'{0}' is not a year")]
    NotAYear(String),
    #[error("'{0}' is not a boolean")]
    NotABoolean(String),
    #[error("'{0}' is not a valid xsd:date")]
    InvalidDate(String),
    #[error("'{iri}' is not a valid IRI")]
    InvalidIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
}
