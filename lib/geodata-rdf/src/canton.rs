use crate::CantonError;
use oxrdf::{NamedNode, NamedNodeRef};
use reqwest::header::ACCEPT;
use std::collections::HashMap;
use std::io::{Read, Write};
use tracing::info;

/// The public LINDAS endpoint of the Swiss federal administration.
pub const DEFAULT_ENDPOINT: &str = "https://lindas.admin.ch/query";

/// Selects every canton together with its abbreviation.
pub const CANTON_QUERY: &str = "\
PREFIX ch: <https://schema.ld.admin.ch/>
PREFIX schema: <http://schema.org/>
SELECT * WHERE { ?canton a ch:Canton ; schema:alternateName ?code . }
";

const CODE_COLUMN: &str = "code";
const CANTON_COLUMN: &str = "canton";

/// Maps canton codes (e.g., `BE`) to canton IRIs.
///
/// The mapping is built once per run and read-only afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CantonMapping {
    cantons: HashMap<String, NamedNode>,
}

impl CantonMapping {
    /// Queries `endpoint` for all cantons.
    ///
    /// The query is sent as a single GET request that asks for a CSV response. There are no
    /// retries.
    pub async fn fetch(client: &reqwest::Client, endpoint: &str) -> Result<Self, CantonError> {
        info!(endpoint, "Fetching canton data");
        let request_error = |source| CantonError::Request {
            endpoint: endpoint.to_owned(),
            source,
        };

        let response = client
            .get(endpoint)
            .query(&[("query", CANTON_QUERY)])
            .header(ACCEPT, "text/csv")
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(CantonError::Status {
                endpoint: endpoint.to_owned(),
                status: response.status(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        let mapping = Self::from_csv(body.as_ref())?;
        info!(cantons = mapping.len(), "Fetched canton data");
        Ok(mapping)
    }

    /// Reads a CSV table with a `code` and a `canton` column.
    ///
    /// Other columns are ignored. If a code appears more than once, the last row wins.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, CantonError> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?;
        let code_idx = column_index(headers, CODE_COLUMN)?;
        let canton_idx = column_index(headers, CANTON_COLUMN)?;

        let mut cantons = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let (Some(code), Some(canton)) = (record.get(code_idx), record.get(canton_idx))
            else {
                continue;
            };

            let canton = canton.trim();
            let iri = NamedNode::new(canton).map_err(|source| CantonError::InvalidIri {
                iri: canton.to_owned(),
                source,
            })?;
            cantons.insert(code.trim().to_owned(), iri);
        }

        Ok(Self { cantons })
    }

    /// Writes the mapping in the same CSV shape that [Self::from_csv] reads, ordered by code.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), CantonError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record([CANTON_COLUMN, CODE_COLUMN])?;

        let mut entries = self.cantons.iter().collect::<Vec<_>>();
        entries.sort_unstable_by_key(|(code, _)| code.as_str());
        for (code, canton) in entries {
            writer.write_record([canton.as_str(), code.as_str()])?;
        }

        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Returns the canton IRI for `code`.
    pub fn get(&self, code: &str) -> Option<NamedNodeRef<'_>> {
        self.cantons.get(code).map(NamedNode::as_ref)
    }

    pub fn len(&self) -> usize {
        self.cantons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cantons.is_empty()
    }
}

impl FromIterator<(String, NamedNode)> for CantonMapping {
    fn from_iter<T: IntoIterator<Item = (String, NamedNode)>>(iter: T) -> Self {
        Self {
            cantons: iter.into_iter().collect(),
        }
    }
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, CantonError> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or(CantonError::MissingColumn(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
canton,code
https://ld.admin.ch/canton/2,BE
https://ld.admin.ch/canton/1,ZH
";

    #[test]
    fn reads_code_and_canton_columns() {
        let mapping = CantonMapping::from_csv(CSV.as_bytes()).unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.get("BE").map(|iri| iri.as_str()),
            Some("https://ld.admin.ch/canton/2")
        );
        assert_eq!(mapping.get("GE"), None);
    }

    #[test]
    fn column_order_does_not_matter() {
        let csv = "code,canton\nBE,https://ld.admin.ch/canton/2\n";
        let mapping = CantonMapping::from_csv(csv.as_bytes()).unwrap();
        assert!(mapping.get("BE").is_some());
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "canton,name\nhttps://ld.admin.ch/canton/2,Bern\n";
        assert!(matches!(
            CantonMapping::from_csv(csv.as_bytes()),
            Err(CantonError::MissingColumn("code"))
        ));
    }

    #[test]
    fn invalid_iri_is_an_error() {
        let csv = "canton,code\nnot an iri,BE\n";
        assert!(matches!(
            CantonMapping::from_csv(csv.as_bytes()),
            Err(CantonError::InvalidIri { .. })
        ));
    }

    #[test]
    fn empty_response_yields_empty_mapping() {
        let mapping = CantonMapping::from_csv("canton,code\n".as_bytes()).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn write_csv_is_sorted_and_readable() {
        let mapping = CantonMapping::from_csv(CSV.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        mapping.write_csv(&mut buffer).unwrap();

        let written = String::from_utf8(buffer).unwrap();
        assert_eq!(written, CSV);
        assert_eq!(CantonMapping::from_csv(written.as_bytes()).unwrap(), mapping);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let result =
            CantonMapping::fetch(&reqwest::Client::new(), "http://127.0.0.1:9/query").await;
        assert!(matches!(result, Err(CantonError::Request { .. })));
    }
}
