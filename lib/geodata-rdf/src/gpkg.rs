use crate::mapping::ParcelMapping;
use crate::{AttributeValue, LoadError, ParcelRecord, GEOMETRY_COLUMN};
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use gdal::vector::{FieldValue, LayerAccess};
use gdal::Dataset;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// EPSG code of WGS84.
pub const WGS84_EPSG: u32 = 4326;

/// The default layer of the parcel GeoPackage.
pub const DEFAULT_LAYER: &str = "nutzungsflaechen";

/// Loads all features of `layer_name` into memory.
///
/// Only the columns referenced by `mapping` are read. Geometries are transformed to WGS84 in
/// longitude/latitude order and stored as WKT in [GEOMETRY_COLUMN].
pub fn load_parcels(
    path: &Path,
    layer_name: &str,
    mapping: &ParcelMapping,
) -> Result<Vec<ParcelRecord>, LoadError> {
    info!(path = %path.display(), layer = layer_name, "Reading GeoPackage");
    let dataset = Dataset::open(path).map_err(|source| LoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    let mut layer = dataset
        .layer_by_name(layer_name)
        .map_err(|source| LoadError::MissingLayer {
            layer: layer_name.to_owned(),
            source,
        })?;

    let mut source_srs = layer
        .spatial_ref()
        .ok_or_else(|| LoadError::MissingSpatialRef(layer_name.to_owned()))?;
    source_srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    let mut target_srs = SpatialRef::from_epsg(WGS84_EPSG)?;
    target_srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    let transform = CoordTransform::new(&source_srs, &target_srs)?;

    let layer_fields = layer
        .defn()
        .fields()
        .enumerate()
        .map(|(idx, field)| (field.name(), idx))
        .collect::<HashMap<_, _>>();
    let id_column = mapping.subject().column.as_str();
    if !layer_fields.contains_key(id_column) {
        return Err(LoadError::MissingIdColumn {
            column: id_column.to_owned(),
            layer: layer_name.to_owned(),
        });
    }

    let mut fields = Vec::new();
    for column in mapping.attribute_columns() {
        match layer_fields.get(column) {
            Some(idx) => fields.push((column, *idx)),
            None => warn!(column, layer = layer_name, "Column does not exist, treating it as null"),
        }
    }

    let mut records = Vec::new();
    for feature in layer.features() {
        let mut record = ParcelRecord::new();
        for (column, _) in &fields {
            if let Some(value) = feature.field(column)?.and_then(attribute_value) {
                record.insert(*column, value);
            }
        }
        if let Some(geometry) = feature.geometry() {
            let wkt = geometry.transform(&transform)?.wkt()?;
            record.insert(GEOMETRY_COLUMN, wkt);
        }
        records.push(record);
    }

    info!(records = records.len(), "Read GeoPackage");
    Ok(records)
}

/// Converts an OGR field value. List types other than string lists are not supported.
fn attribute_value(value: FieldValue) -> Option<AttributeValue> {
    match value {
        FieldValue::IntegerValue(value) => Some(AttributeValue::Integer(i64::from(value))),
        FieldValue::Integer64Value(value) => Some(AttributeValue::Integer(value)),
        FieldValue::RealValue(value) => Some(AttributeValue::Real(value)),
        FieldValue::StringValue(value) => Some(AttributeValue::Text(value)),
        FieldValue::DateValue(value) => Some(AttributeValue::Date(value)),
        FieldValue::DateTimeValue(value) => Some(AttributeValue::Date(value.date_naive())),
        FieldValue::StringListValue(values) => Some(AttributeValue::Text(values.join(";"))),
        _ => None,
    }
}
