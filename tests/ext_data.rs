use std::fs;

use opt_convert::engine::{DataDeclaration, VectorStorage};
use opt_convert::ext_data::{file_prefix, DataItem, DataKind, DataStore, DataValue, Table};
use opt_convert::ConvertError;

mod common;
use common::write;

const SCALARS: &str = "!Demand
100
!Capacity
250
";

const COST: &str = "!Cost
!i,j,value
1,1,5
1,2,7
2,1,3";

fn declarations() -> Vec<DataDeclaration> {
    vec![
        DataDeclaration::Constant("Demand".to_string()),
        DataDeclaration::Constant("Capacity".to_string()),
        DataDeclaration::Constant("NotInFile".to_string()),
        DataDeclaration::Vector {
            name: "Cost".to_string(),
            storage: VectorStorage::Sparse,
        },
        DataDeclaration::Vector {
            name: "NoFile".to_string(),
            storage: VectorStorage::Dense,
        },
        DataDeclaration::IndexSet("Nodes".to_string()),
    ]
}

fn model_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "plant_ScalarData.dat", SCALARS);
    write(dir.path(), "plant_Cost.dat", COST);
    write(dir.path(), "plant_Nodes.dat", "!Nodes\n!n\nA\nB\n");
    dir
}

fn table(value: &DataValue) -> &Table {
    match value {
        DataValue::Table(table) => table,
        DataValue::Scalar(s) => panic!("expected a table, got scalar {}", s),
    }
}

#[test]
fn discovery_tracks_only_present_data() {
    let dir = model_dir();
    let store = DataStore::discover(&dir.path().join("plant.mpl"), &declarations()).unwrap();
    let names: Vec<&str> = store.names().collect();
    assert_eq!(names, ["Capacity", "Cost", "Demand", "Nodes"]);

    assert_eq!(
        store.get("Demand").unwrap().value(),
        &DataValue::Scalar("100".to_string())
    );
    let cost = table(store.get("Cost").unwrap().value());
    assert_eq!(cost.keys(), ["i", "j", "value"]);
    assert_eq!(cost.rows().len(), 3);
    assert_eq!(cost.get(1, "value"), Some("7"));
    assert_eq!(cost.record(2), Some(vec![("i", "2"), ("j", "1"), ("value", "3")]));
    assert_eq!(store.get("Nodes").unwrap().kind(), DataKind::IndexSparse);
    assert_eq!(table(store.get("Nodes").unwrap().value()).rows().len(), 2);
}

#[test]
fn scalar_set_rewrites_only_its_value() {
    let dir = model_dir();
    let mut store = DataStore::discover(&dir.path().join("plant.mpl"), &declarations()).unwrap();
    store
        .set("Capacity", DataValue::Scalar("300".to_string()))
        .unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("plant_ScalarData.dat")).unwrap(),
        "!Demand\n100\n!Capacity\n300\n"
    );
}

#[test]
fn table_round_trip() {
    let dir = model_dir();
    let prefix = file_prefix(&dir.path().join("plant.mpl"), "plant");
    let mut item = DataItem::load("Cost", DataKind::VectorSparse, &prefix).unwrap();

    let mut cost = Table::new(vec!["i", "j", "value"]);
    cost.push_row(vec!["2", "2", "9"]).unwrap();
    cost.push_row(vec!["1", "1", "4"]).unwrap();
    item.set(DataValue::Table(cost.clone())).unwrap();

    assert_eq!(
        fs::read_to_string(item.path()).unwrap(),
        "!Cost\n!i,j,value\n2,2,9\n1,1,4"
    );
    let reloaded = DataItem::load("Cost", DataKind::VectorSparse, &prefix).unwrap();
    assert_eq!(reloaded.value(), &DataValue::Table(cost));
}

#[test]
fn export_under_another_name() {
    let dir = model_dir();
    let store = DataStore::discover(&dir.path().join("plant.mpl"), &declarations()).unwrap();
    let new_prefix = file_prefix(&dir.path().join("copy.mpl"), "copy");
    let written = store.export_all(&new_prefix).unwrap();
    assert_eq!(written.len(), 4);
    assert_eq!(
        fs::read_to_string(dir.path().join("copy_ScalarData.dat")).unwrap(),
        SCALARS
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("copy_Cost.dat")).unwrap(),
        COST
    );
}

#[test]
fn wrong_table_header() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m_Cost.dat", "!Price\n!i,value\n1,2");
    let prefix = file_prefix(&dir.path().join("m.mpl"), "m");
    let result = DataItem::load("Cost", DataKind::VectorSparse, &prefix);
    assert!(matches!(result, Err(ConvertError::Malformed { .. })));

    write(dir.path(), "m_Cost.dat", "!Cost\ni,value\n1,2");
    let result = DataItem::load("Cost", DataKind::VectorSparse, &prefix);
    assert!(matches!(result, Err(ConvertError::Malformed { .. })));

    write(dir.path(), "m_Cost.dat", "!Cost\n!i,value\n1,2,3");
    let result = DataItem::load("Cost", DataKind::VectorSparse, &prefix);
    assert!(matches!(result, Err(ConvertError::Malformed { .. })));
}

#[test]
fn scalar_without_value_line() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m_ScalarData.dat", "!Demand");
    let prefix = file_prefix(&dir.path().join("m.mpl"), "m");
    let result = DataItem::load("Demand", DataKind::Scalar, &prefix);
    assert!(matches!(result, Err(ConvertError::Malformed { .. })));
}

#[test]
fn dense_vectors_are_refused() {
    let dir = model_dir();
    let declarations = vec![DataDeclaration::Vector {
        name: "Cost".to_string(),
        storage: VectorStorage::Dense,
    }];
    let result = DataStore::discover(&dir.path().join("plant.mpl"), &declarations);
    assert!(matches!(result, Err(ConvertError::DenseData(_))));
}

#[test]
fn string_data_in_files_are_refused() {
    let dir = model_dir();
    let declarations = vec![DataDeclaration::String("Demand".to_string())];
    let result = DataStore::discover(&dir.path().join("plant.mpl"), &declarations);
    assert!(matches!(result, Err(ConvertError::StringData(_))));

    let declarations = vec![DataDeclaration::String("Label".to_string())];
    let store = DataStore::discover(&dir.path().join("plant.mpl"), &declarations).unwrap();
    assert!(store.is_empty());
}

#[test]
fn set_checks_name_and_kind() {
    let dir = model_dir();
    let mut store = DataStore::discover(&dir.path().join("plant.mpl"), &declarations()).unwrap();
    assert!(matches!(
        store.set("Unknown", DataValue::Scalar("1".to_string())),
        Err(ConvertError::UnknownDataItem(_))
    ));
    assert!(matches!(
        store.set("Demand", DataValue::Table(Table::new(vec!["i"]))),
        Err(ConvertError::DataKindMismatch(_))
    ));
    assert_eq!(
        fs::read_to_string(dir.path().join("plant_ScalarData.dat")).unwrap(),
        SCALARS
    );
}

#[test]
fn rows_must_match_keys() {
    let mut table = Table::new(vec!["i", "value"]);
    assert!(table.push_row(vec!["1"]).is_err());
    assert!(table.push_row(vec!["1", "2"]).is_ok());
    assert_eq!(table.rows().len(), 1);
}

#[test]
fn values_must_fit_the_file_format() {
    let mut labels = Table::new(vec!["i", "label"]);
    for cell in &["a,b", "a\nb", "a\r"] {
        assert!(
            matches!(labels.push_row(vec!["1", *cell]), Err(ConvertError::Malformed { .. })),
            "{:?}",
            cell
        );
    }
    assert!(labels.rows().is_empty());
    labels.push_row(vec!["1", "a b"]).unwrap();

    let dir = model_dir();
    let mut store = DataStore::discover(&dir.path().join("plant.mpl"), &declarations()).unwrap();
    assert!(matches!(
        store.set("Demand", DataValue::Scalar("1\n2".to_string())),
        Err(ConvertError::Malformed { .. })
    ));
    assert!(matches!(
        store.set("Cost", DataValue::Table(Table::new(vec!["i,j", "value"]))),
        Err(ConvertError::Malformed { .. })
    ));
    assert_eq!(
        fs::read_to_string(dir.path().join("plant_ScalarData.dat")).unwrap(),
        SCALARS
    );
    assert_eq!(fs::read_to_string(dir.path().join("plant_Cost.dat")).unwrap(), COST);
}

#[test]
fn indented_lines_are_not_markers() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m_ScalarData.dat", "  !Demand\n100\n!Capacity\n7\n");
    let declarations = vec![
        DataDeclaration::Constant("Demand".to_string()),
        DataDeclaration::Constant("Capacity".to_string()),
    ];
    let store = DataStore::discover(&dir.path().join("m.mpl"), &declarations).unwrap();
    let names: Vec<&str> = store.names().collect();
    assert_eq!(names, ["Capacity"]);
    assert_eq!(
        store.get("Capacity").unwrap().value(),
        &DataValue::Scalar("7".to_string())
    );

    write(dir.path(), "m_Cost.dat", "  !Cost\n!i,value\n1,2");
    let prefix = file_prefix(&dir.path().join("m.mpl"), "m");
    let result = DataItem::load("Cost", DataKind::VectorSparse, &prefix);
    assert!(matches!(result, Err(ConvertError::Malformed { .. })));
}
