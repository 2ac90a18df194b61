//! Integration tests for the dataset writer.

use std::path::Path;

use serde_json::Value;

use cldfkit::{
    ArgValue, Catalog, CldfError, CommandArgs, Dataset, DatasetSpec, DatasetWriter, Row,
    SourceRepository, StaticEnvironment, DCAT_DISTRIBUTION,
};

/// A minimal valid ValueTable row.
fn value_row(id: &str, language: &str, parameter: &str, value: &str) -> Row {
    [
        ("ID", id),
        ("Language_ID", language),
        ("Parameter_ID", parameter),
        ("Value", value),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
    .collect()
}

fn structure_writer(outdir: &Path) -> DatasetWriter {
    DatasetWriter::with_spec(outdir, DatasetSpec::new("StructureDataset").unwrap())
        .unwrap()
        .environment(StaticEnvironment::new("rust", "1.75.0"))
}

fn read_metadata(outdir: &Path) -> Value {
    let text = std::fs::read_to_string(outdir.join("StructureDataset-metadata.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

// =============================================================================
// Writing rows
// =============================================================================

#[test]
fn test_scope_writes_rows_in_insertion_order() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    structure_writer(&out)
        .scope(|writer| {
            let values = writer.objects.table_mut("ValueTable");
            values.push(value_row("1", "lang1", "param1", "yes"));
            values.push(value_row("2", "lang1", "param2", "no"));
            Ok(())
        })
        .unwrap();

    let written = std::fs::read_to_string(out.join("values.csv")).unwrap();
    assert_eq!(
        written,
        "ID,Language_ID,Parameter_ID,Value,Code_ID,Comment,Source\n\
         1,lang1,param1,yes,,,\n\
         2,lang1,param2,no,,,\n"
    );
}

#[test]
fn test_data_filename_override_renames_table_file() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    let spec = DatasetSpec::builder("StructureDataset")
        .data_filename("ValueTable", "data.csv")
        .build()
        .unwrap();
    DatasetWriter::with_spec(&out, spec)
        .unwrap()
        .environment(StaticEnvironment::new("rust", "1.75.0"))
        .scope(|writer| {
            writer
                .objects
                .table_mut("ValueTable")
                .push(value_row("1", "lang1", "param1", "yes"));
            Ok(())
        })
        .unwrap();

    assert!(out.join("data.csv").exists());
    assert!(!out.join("values.csv").exists());

    let metadata = read_metadata(&out);
    assert_eq!(metadata["tables"][0]["url"], "data.csv");
}

#[test]
fn test_source_list_cells_join_with_separator() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    structure_writer(&out)
        .scope(|writer| {
            let mut row = value_row("1", "lang1", "param1", "yes");
            row.insert(
                "Source".to_string(),
                serde_json::json!(["Meier2005", "Smith2010"]),
            );
            writer.objects.table_mut("ValueTable").push(row);
            Ok(())
        })
        .unwrap();

    let written = std::fs::read_to_string(out.join("values.csv")).unwrap();
    assert!(written.contains("Meier2005;Smith2010"));
}

// =============================================================================
// Provenance
// =============================================================================

#[test]
fn test_rdf_type_is_dcat_distribution() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    structure_writer(&out).scope(|_| Ok(())).unwrap();

    let metadata = read_metadata(&out);
    assert_eq!(metadata["rdf:type"], DCAT_DISTRIBUTION);
}

#[test]
fn test_only_catalog_args_reach_was_derived_from() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    let mut args = CommandArgs::new();
    args.insert("verbose", ArgValue::Flag(true));
    args.insert(
        "glottolog",
        ArgValue::Catalog(
            Catalog::new("glottolog", "https://example.org/glottolog").with_version("v4.8"),
        ),
    );
    args.insert("outdir", ArgValue::Text("cldf".to_string()));

    structure_writer(&out)
        .args(args)
        .scope(|_| Ok(()))
        .unwrap();

    let metadata = read_metadata(&out);
    let derived = metadata["prov:wasDerivedFrom"].as_array().unwrap();
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0]["dc:title"], "glottolog");
    assert_eq!(derived[0]["dc:created"], "v4.8");
}

#[test]
fn test_source_repository_precedes_catalogs() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    let mut args = CommandArgs::new();
    args.insert(
        "concepticon",
        ArgValue::Catalog(Catalog::new("concepticon", "https://example.org/concepticon")),
    );

    structure_writer(&out)
        .source(SourceRepository::new("https://example.org/mydataset").with_version("v1.0-3-gabc"))
        .args(args)
        .scope(|_| Ok(()))
        .unwrap();

    let metadata = read_metadata(&out);
    let derived = metadata["prov:wasDerivedFrom"].as_array().unwrap();
    assert_eq!(derived.len(), 2);
    assert_eq!(derived[0]["rdf:about"], "https://example.org/mydataset");
    assert_eq!(derived[0]["dc:created"], "v1.0-3-gabc");
    assert_eq!(derived[1]["dc:title"], "concepticon");
}

#[test]
fn test_no_sources_means_no_was_derived_from() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    structure_writer(&out).scope(|_| Ok(())).unwrap();

    let metadata = read_metadata(&out);
    assert!(metadata.get("prov:wasDerivedFrom").is_none());
}

#[test]
fn test_generated_by_without_package_listing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    structure_writer(&out).scope(|_| Ok(())).unwrap();

    let metadata = read_metadata(&out);
    let generated = metadata["prov:wasGeneratedBy"].as_array().unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0]["dc:title"], "rust");
    assert_eq!(generated[0]["dc:description"], "1.75.0");
    assert!(!out.join("requirements.txt").exists());
}

#[test]
fn test_generated_by_with_package_listing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    structure_writer(&out)
        .environment(
            StaticEnvironment::new("rust", "1.75.0").with_packages("serde v1.0.200\ncsv v1.3.0\n"),
        )
        .scope(|_| Ok(()))
        .unwrap();

    let metadata = read_metadata(&out);
    let generated = metadata["prov:wasGeneratedBy"].as_array().unwrap();
    assert_eq!(generated.len(), 2);
    assert_eq!(generated[1]["dc:relation"], "requirements.txt");

    let listing = std::fs::read_to_string(out.join("requirements.txt")).unwrap();
    assert!(listing.contains("serde v1.0.200"));
}

// =============================================================================
// Scope exit semantics
// =============================================================================

#[test]
fn test_failed_scope_still_writes_accumulated_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    let result = structure_writer(&out).scope(|writer| {
        writer
            .objects
            .table_mut("ValueTable")
            .push(value_row("1", "lang1", "param1", "yes"));
        Err::<(), _>(CldfError::Config("boom".to_string()))
    });

    match result {
        Err(CldfError::Config(message)) => assert_eq!(message, "boom"),
        other => panic!("expected the scope's own error, got {:?}", other),
    }
    let written = std::fs::read_to_string(out.join("values.csv")).unwrap();
    assert!(written.contains("1,lang1,param1,yes"));
}

#[test]
fn test_dropped_writer_flushes_best_effort() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    {
        let mut writer = structure_writer(&out);
        writer
            .objects
            .table_mut("ValueTable")
            .push(value_row("1", "lang1", "param1", "yes"));
    }

    assert!(out.join("values.csv").exists());
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_outdir_created_one_level_deep_only() {
    let tmp = tempfile::tempdir().unwrap();

    assert!(structure_writer(&tmp.path().join("cldf")).flush().is_ok());

    let nested = tmp.path().join("missing").join("cldf");
    match DatasetWriter::with_spec(&nested, DatasetSpec::new("StructureDataset").unwrap()) {
        Err(CldfError::Io { path, .. }) => assert_eq!(path, nested),
        other => panic!("expected Io error for nested outdir, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_default_writer_uses_generic_module() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    let writer = DatasetWriter::new(&out)
        .unwrap()
        .environment(StaticEnvironment::new("rust", "1.75.0"));
    assert_eq!(writer.cldf().module_id(), "Generic");
    writer.scope(|_| Ok(())).unwrap();

    assert!(out.join("Generic-metadata.json").exists());
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn test_written_dataset_validates_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    structure_writer(&out)
        .scope(|writer| {
            let values = writer.objects.table_mut("ValueTable");
            values.push(value_row("1", "lang1", "param1", "yes"));
            values.push(value_row("2", "lang2", "param1", "no"));
            Ok(())
        })
        .unwrap();

    let dataset = Dataset::from_metadata(out.join("StructureDataset-metadata.json")).unwrap();
    let issues = dataset.validate().unwrap();
    assert!(issues.is_empty(), "unexpected findings: {:?}", issues);

    let summary = dataset.to_string();
    assert!(summary.contains("<cldf:v1.0:StructureDataset"));
    assert!(summary.contains("values.csv: 2 rows"));
}

#[test]
fn test_validate_reports_duplicate_ids_and_empty_required() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("cldf");

    structure_writer(&out)
        .scope(|writer| {
            let values = writer.objects.table_mut("ValueTable");
            values.push(value_row("1", "lang1", "param1", "yes"));
            values.push(value_row("1", "lang2", "param1", ""));
            Ok(())
        })
        .unwrap();

    let dataset = Dataset::from_metadata(out.join("StructureDataset-metadata.json")).unwrap();
    let issues = dataset.validate().unwrap();
    assert!(issues.iter().any(|i| i.contains("duplicate primary key")));
    assert!(issues.iter().any(|i| i.contains("required column 'Value'")));
}
