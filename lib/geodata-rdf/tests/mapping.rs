use geodata_rdf::mapping::{
    columns, DatePolicy, MappingOptions, ParcelMapping, TripleEmitter, TripleOrder,
};
use geodata_rdf::{
    write_turtle, CantonMapping, NamedNode, OutputStyle, ParcelRecord, Triple, Vocabulary,
};
use insta::assert_snapshot;
use std::collections::HashSet;

const BASE: &str = "https://agriculture.ld.admin.ch/crops/";

fn cantons() -> CantonMapping {
    [
        ("BE", "https://ld.admin.ch/canton/2"),
        ("ZH", "https://ld.admin.ch/canton/1"),
    ]
    .into_iter()
    .map(|(code, iri)| (code.to_owned(), NamedNode::new_unchecked(iri)))
    .collect()
}

fn parcel(id: i64) -> ParcelRecord {
    ParcelRecord::new().with(columns::ID, id)
}

fn full_parcel() -> ParcelRecord {
    parcel(1)
        .with(columns::LAND_USE_CODE, 601)
        .with(
            "geometry",
            "POLYGON ((7.4 46.9, 7.5 46.9, 7.5 47, 7.4 46.9))",
        )
        .with(columns::AREA, 1234.7)
        .with(columns::MANAGEMENT_DEGREE, 2)
        .with(columns::REFERENCE_YEAR, 2020.0)
        .with(columns::COMMITMENT_START, 2019)
        .with(columns::ELIGIBLE, 1)
        .with(columns::USED_IN_CONTRIBUTION_YEAR, "nein")
        .with(columns::MOWING_DATE, "2023-06-15")
        .with(columns::PROGRAMS, "A; B;Non; ")
        .with(columns::FARM, "BE-42")
        .with(columns::CANTON, "BE")
}

fn emit(records: &[ParcelRecord], order: TripleOrder) -> Vec<Triple> {
    emit_with(records, order, MappingOptions::default())
}

fn emit_with(records: &[ParcelRecord], order: TripleOrder, options: MappingOptions) -> Vec<Triple> {
    let mapping = ParcelMapping::standard(&Vocabulary::default());
    let cantons = cantons();
    TripleEmitter::new(&mapping, &cantons, options)
        .emit(records, order)
        .triples()
        .cloned()
        .collect()
}

fn to_turtle(triples: &[Triple]) -> String {
    let buffer = write_turtle(
        Vec::new(),
        triples,
        OutputStyle::Statements,
        &Vocabulary::default(),
    )
    .unwrap();
    String::from_utf8(buffer).unwrap()
}

fn count_predicate(triples: &[Triple], local: &str) -> usize {
    let predicate = format!("{BASE}{local}");
    triples
        .iter()
        .filter(|t| t.predicate.as_str() == predicate)
        .count()
}

#[test]
fn full_parcel_statements() {
    let output = to_turtle(&emit(&[full_parcel()], TripleOrder::ByColumn));

    assert_snapshot!(output, @r#"
<https://agriculture.ld.admin.ch/crops/cultivation/1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://agriculture.ld.admin.ch/crops/Cultivation> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/cultivationtype> <https://agriculture.ld.admin.ch/crops/cultivationtype/601> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <http://www.opengis.net/ont/geosparql#asWKT> "POLYGON ((7.4 46.9, 7.5 46.9, 7.5 47, 7.4 46.9))"^^<http://www.opengis.net/ont/geosparql#wktLiteral> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/area> "1234"^^<http://www.w3.org/2001/XMLSchema#integer> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/managementDegree> "2"^^<http://www.w3.org/2001/XMLSchema#integer> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/referenceYear> "2020"^^<http://www.w3.org/2001/XMLSchema#gYear> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/commitmentStart> "2019"^^<http://www.w3.org/2001/XMLSchema#gYear> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/eligible> "true"^^<http://www.w3.org/2001/XMLSchema#boolean> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/usedInContributionYear> "false"^^<http://www.w3.org/2001/XMLSchema#boolean> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/movingDate> "2023-06-15"^^<http://www.w3.org/2001/XMLSchema#date> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/program> <https://agriculture.ld.admin.ch/crops/program/A> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/program> <https://agriculture.ld.admin.ch/crops/program/B> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/managementUnit> <https://agriculture.ld.admin.ch/crops/farm/BE-42> .
<https://agriculture.ld.admin.ch/crops/cultivation/1> <https://agriculture.ld.admin.ch/crops/canton> <https://ld.admin.ch/canton/2> .
<https://agriculture.ld.admin.ch/crops/farm/BE-42> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://agriculture.ld.admin.ch/crops/ManagementUnit> .
"#);
}

#[test]
fn null_attributes_produce_no_triples() {
    let triples = emit(&[parcel(7)], TripleOrder::ByColumn);

    assert_eq!(
        triples,
        [Triple::new(
            NamedNode::new_unchecked(format!("{BASE}cultivation/7")),
            oxrdf::vocab::rdf::TYPE,
            NamedNode::new_unchecked(format!("{BASE}Cultivation")),
        )]
    );
}

#[test]
fn optional_predicate_count_matches_non_null_count() {
    let records = [
        parcel(1).with(columns::TREES, 12),
        parcel(2),
        parcel(3).with(columns::TREES, f64::NAN),
        parcel(4).with(columns::TREES, 0.0),
        parcel(5).with(columns::TREES, ""),
    ];
    let triples = emit(&records, TripleOrder::ByColumn);

    assert_eq!(count_predicate(&triples, "trees"), 2);
    assert_eq!(count_predicate(&triples, "area"), 0);
}

#[test]
fn management_units_are_declared_once() {
    let records = [
        parcel(1).with(columns::FARM, "BE-42"),
        parcel(2).with(columns::FARM, "BE-7"),
        parcel(3).with(columns::FARM, "BE-42"),
        parcel(4).with(columns::FARM, " BE-42 "),
        parcel(5),
    ];
    let triples = emit(&records, TripleOrder::ByColumn);

    let declared = triples
        .iter()
        .filter(|t| t.object.to_string() == format!("<{BASE}ManagementUnit>"))
        .map(|t| t.subject.to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        declared,
        [format!("<{BASE}farm/BE-42>"), format!("<{BASE}farm/BE-7>")]
    );
    assert_eq!(count_predicate(&triples, "managementUnit"), 4);
}

#[test]
fn program_codes_are_split() {
    let triples = emit(
        &[parcel(1).with(columns::PROGRAMS, "A; B;Non; ")],
        TripleOrder::ByColumn,
    );
    assert_eq!(count_predicate(&triples, "program"), 2);
}

#[test]
fn only_sentinel_program_produces_nothing() {
    let triples = emit(
        &[parcel(1).with(columns::PROGRAMS, "Non")],
        TripleOrder::ByColumn,
    );
    assert_eq!(count_predicate(&triples, "program"), 0);
}

#[test]
fn unmapped_canton_is_dropped_silently() {
    let mapping = ParcelMapping::standard(&Vocabulary::default());
    let cantons = cantons();
    let emission = TripleEmitter::new(&mapping, &cantons, MappingOptions::default()).emit(
        &[parcel(1).with(columns::CANTON, "XX")],
        TripleOrder::ByColumn,
    );

    let triples = emission.triples().cloned().collect::<Vec<_>>();
    assert_eq!(count_predicate(&triples, "canton"), 0);
    assert_eq!(emission.stats.unmapped_cantons, 1);
    assert_eq!(emission.stats.rejected_values, 0);
}

#[test]
fn empty_input_produces_empty_output() {
    let mapping = ParcelMapping::standard(&Vocabulary::default());
    let cantons = cantons();
    let emission = TripleEmitter::new(&mapping, &cantons, MappingOptions::default())
        .emit(&[], TripleOrder::ByColumn);

    assert!(emission.is_empty());
    assert_eq!(to_turtle(&emission.triples().cloned().collect::<Vec<_>>()), "");
}

#[test]
fn output_is_deterministic() {
    let records = [
        full_parcel(),
        parcel(2).with(columns::FARM, "BE-7"),
        parcel(3).with(columns::FARM, "BE-42"),
    ];

    let first = to_turtle(&emit(&records, TripleOrder::ByColumn));
    let second = to_turtle(&emit(&records, TripleOrder::ByColumn));
    assert_eq!(first, second);
}

#[test]
fn column_and_record_order_produce_the_same_triples() {
    let records = [
        full_parcel(),
        parcel(2)
            .with(columns::FARM, "BE-7")
            .with(columns::CANTON, "ZH")
            .with(columns::NATURE_PROTECTION, true),
        parcel(3).with(columns::FARM, "BE-42"),
        ParcelRecord::new().with(columns::AREA, 10),
    ];

    let by_column = emit(&records, TripleOrder::ByColumn);
    let by_record = emit(&records, TripleOrder::ByRecord);

    assert_eq!(by_column.len(), by_record.len());
    assert_eq!(
        by_column.iter().collect::<HashSet<_>>(),
        by_record.iter().collect::<HashSet<_>>()
    );
    assert_ne!(by_column, by_record);
}

#[test]
fn record_order_keeps_rule_order_within_a_record() {
    let records = [
        parcel(1).with(columns::AREA, 10).with(columns::TREES, 3),
        parcel(2).with(columns::AREA, 20),
    ];
    let predicates = emit(&records, TripleOrder::ByRecord)
        .iter()
        .map(|t| t.predicate.as_str().trim_start_matches(BASE).to_owned())
        .collect::<Vec<_>>();

    assert_eq!(
        predicates,
        [
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
            "area",
            "trees",
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
            "area",
        ]
    );
}

#[test]
fn records_without_identifier_are_skipped() {
    let mapping = ParcelMapping::standard(&Vocabulary::default());
    let cantons = cantons();
    let emitter = TripleEmitter::new(&mapping, &cantons, MappingOptions::default());
    let records = [
        ParcelRecord::new()
            .with(columns::AREA, 10)
            .with(columns::FARM, "ORPHAN"),
        parcel(2),
    ];

    for order in [TripleOrder::ByColumn, TripleOrder::ByRecord] {
        let emission = emitter.emit(&records, order);
        assert_eq!(emission.len(), 1);
        assert_eq!(emission.stats.records, 2);
        assert_eq!(emission.stats.skipped_records, 1);
    }
}

#[test]
fn management_units_of_skipped_records_are_not_declared() {
    let mapping = ParcelMapping::standard(&Vocabulary::default());
    let cantons = cantons();
    let emitter = TripleEmitter::new(&mapping, &cantons, MappingOptions::default());
    let records = [
        ParcelRecord::new().with(columns::FARM, "ORPHAN"),
        parcel(2).with(columns::FARM, "BE-7"),
    ];

    let units = emitter.management_units(&records);
    assert_eq!(units.label, format!("{BASE}ManagementUnit"));
    assert_eq!(units.triples.len(), 1);
    assert_eq!(units.triples[0].subject.to_string(), format!("<{BASE}farm/BE-7>"));

    let emission = emitter.emit(&records[..1], TripleOrder::ByColumn);
    assert!(emission.is_empty());
}

#[test]
fn uncoercible_values_are_dropped_and_counted() {
    let mapping = ParcelMapping::standard(&Vocabulary::default());
    let cantons = cantons();
    let emission = TripleEmitter::new(&mapping, &cantons, MappingOptions::default()).emit(
        &[parcel(1)
            .with(columns::AREA, "lots")
            .with(columns::REFERENCE_YEAR, 20_200)
            .with(columns::ELIGIBLE, "maybe")
            .with(columns::FARM, "BE 42")],
        TripleOrder::ByColumn,
    );

    // Only the type of the parcel remains.
    assert_eq!(emission.len(), 1);
    // The invalid farm is counted once, by the reference rule.
    assert_eq!(emission.stats.rejected_values, 4);
}

#[test]
fn strict_dates_drop_malformed_values() {
    let records = [
        parcel(1).with(columns::MOWING_DATE, "15.06.2023"),
        parcel(2).with(columns::MOWING_DATE, "2023-06-15"),
    ];

    let permissive = emit(&records, TripleOrder::ByColumn);
    let strict = emit_with(
        &records,
        TripleOrder::ByColumn,
        MappingOptions {
            date_policy: DatePolicy::Strict,
        },
    );

    assert_eq!(count_predicate(&permissive, "movingDate"), 2);
    assert_eq!(count_predicate(&strict, "movingDate"), 1);
}

#[test]
fn custom_base_iri_is_used_everywhere() {
    let vocabulary = Vocabulary::new("http://example.com/agri/").unwrap();
    let mapping = ParcelMapping::standard(&vocabulary);
    let cantons = cantons();
    let emission = TripleEmitter::new(&mapping, &cantons, MappingOptions::default())
        .emit(&[parcel(1).with(columns::FARM, "F1")], TripleOrder::ByColumn);

    for triple in emission.triples() {
        assert!(triple.subject.to_string().starts_with("<http://example.com/agri/"));
    }
}
