use super::common::*;
use crate::catalog::{CatalogImporter, CatalogSeed, ImportError, PriceRow};
use crate::records::RecordKind;

#[test]
fn coefficients_import_trims_and_drops_blank_notes() {
    let csv = "code,name,coefficient,notes\n\
tang_tret, Tầng trệt ,1.0,\n\
mai_btct,Mái BTCT,0.5,Tính trên diện tích sàn mái\n";

    let drafts = CatalogImporter::coefficients_from_reader(csv.as_bytes()).expect("csv parses");

    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].name, "Tầng trệt");
    assert!(drafts[0].notes.is_none());
    assert_eq!(drafts[1].coefficient, 0.5);
    assert_eq!(
        drafts[1].notes.as_deref(),
        Some("Tính trên diện tích sàn mái")
    );
}

#[test]
fn malformed_coefficient_rows_are_reported() {
    let csv = "code,name,coefficient,notes\nmai_ton,Mái tôn,abc,\n";
    let err = CatalogImporter::coefficients_from_reader(csv.as_bytes()).expect_err("bad number");
    assert!(matches!(err, ImportError::Csv(_)));
}

#[test]
fn price_rows_seed_a_catalog_by_name() {
    let csv = "construction_type,build_package,investment_level,price_per_m2,description\n\
Nhà phố,Phần thô,Trung bình,5600000,Bảng giá 2025\n\
Biệt thự,Trọn gói,Cao cấp,11500000,\n";
    let rows = CatalogImporter::prices_from_reader(csv.as_bytes()).expect("csv parses");
    assert_eq!(rows[1], PriceRow::new("Biệt thự", "Trọn gói", "Cao cấp", 11_500_000));

    let service = empty_service();
    let summary = CatalogSeed::standard()
        .with_unit_prices(rows)
        .apply(&service)
        .expect("seed applies");

    assert_eq!(summary.unit_prices, 2);
    let matrix = service.price_matrix().expect("matrix");
    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix[0].price_per_m2, 5_600_000);
    assert_eq!(matrix[0].description.as_deref(), Some("Bảng giá 2025"));
}

#[test]
fn price_rows_with_unknown_names_fail_the_seed() {
    let rows = vec![PriceRow::new("Chung cư", "Phần thô", "Trung bình", 5_000_000)];
    let service = empty_service();

    let err = CatalogSeed::standard()
        .with_unit_prices(rows)
        .apply(&service)
        .expect_err("unknown type");

    match err {
        ImportError::UnknownReference { row, kind, name } => {
            assert_eq!(row, 1);
            assert_eq!(kind, RecordKind::ConstructionType);
            assert_eq!(name, "Chung cư");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_export_file_is_an_io_error() {
    let err = CatalogImporter::prices_from_path("/nonexistent/homebuild/prices.csv")
        .expect_err("file missing");
    assert!(matches!(err, ImportError::Io(_)));
}
