use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;

use workshop_finder::ingestion::parquet::ingest_parquet_from_path;
use workshop_finder::types::Value;
use workshop_finder::IngestionError;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("workshop-finder-{name}-{nanos}.parquet"))
}

fn utf8_column(name: &str) -> Arc<Type> {
    Arc::new(
        Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
            .with_repetition(Repetition::REQUIRED)
            .with_converted_type(ConvertedType::UTF8)
            .build()
            .unwrap(),
    )
}

fn int64_column(name: &str) -> Arc<Type> {
    Arc::new(
        Type::primitive_type_builder(name, PhysicalType::INT64)
            .with_repetition(Repetition::REQUIRED)
            .build()
            .unwrap(),
    )
}

/// Writes two workshops. Column order: Pincode (INT64), Channel, Body Shop, [State], Name.
fn write_workshops_parquet(path: &PathBuf, include_state: bool) {
    let mut fields = vec![
        int64_column("Pincode"),
        utf8_column("Channel"),
        utf8_column("Body Shop"),
    ];
    if include_state {
        fields.push(utf8_column("State"));
    }
    fields.push(utf8_column("Name"));

    let schema = Arc::new(
        Type::group_type_builder("schema")
            .with_fields(fields)
            .build()
            .unwrap(),
    );
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let text_columns: Vec<[&str; 2]> = {
        let mut cols = vec![["Dealer", "Independent"], ["Yes", "No"]];
        if include_state {
            cols.push(["DL", "MH"]);
        }
        cols.push(["Speedy Motors", "Harbour Wheels"]);
        cols
    };

    let mut rg = writer.next_row_group().unwrap();
    let mut text_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int64ColumnWriter(w) => {
                w.write_batch(&[110001_i64, 400001_i64], None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let values: Vec<ByteArray> = text_columns[text_idx].iter().map(|s| ByteArray::from(*s)).collect();
                w.write_batch(&values, None, None).unwrap();
                text_idx += 1;
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn ingest_parquet_happy_path() {
    let path = tmp_file("workshops");
    write_workshops_parquet(&path, true);

    let ds = ingest_parquet_from_path(&path).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.columns(), ["pincode", "channel", "body shop", "state", "name"]);

    let second = &ds.records()[1];
    assert_eq!(second.pincode.as_deref(), Some("400001"));
    assert_eq!(second.channel.as_deref(), Some("Independent"));
    assert_eq!(second.body_shop.as_deref(), Some("No"));
    assert_eq!(second.state.as_deref(), Some("MH"));
    assert_eq!(second.get("name"), Some(Value::Utf8("Harbour Wheels".to_string())));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_errors_on_missing_required_column() {
    let path = tmp_file("missing");
    write_workshops_parquet(&path, false);

    let err = ingest_parquet_from_path(&path).unwrap_err();
    assert!(matches!(err, IngestionError::MissingColumns { ref missing } if missing == &["state"]));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_errors_on_missing_file() {
    let err = ingest_parquet_from_path(tmp_file("never-written")).unwrap_err();
    assert!(matches!(err, IngestionError::Parquet(_) | IngestionError::Io(_)));
}
