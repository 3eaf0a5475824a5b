use chrono::Utc;

use super::*;
use crate::records::Timestamps;

fn coefficients() -> CoefficientTable {
    [
        (codes::GROUND_FLOOR, 1.0),
        (codes::UPPER_FLOOR, 1.0),
        (codes::LOFT, 0.65),
        (codes::ROOF_METAL, 0.3),
        (codes::ROOF_CONCRETE, 0.5),
        (codes::ROOF_TILE, 0.7),
        (codes::BALCONY, 0.5),
        (codes::TERRACE, 0.5),
        (codes::GARDEN, 0.3),
        (codes::STAIR_ROOF, 1.0),
        (codes::BASEMENT_1_0_1_2, 1.5),
        (codes::BASEMENT_1_2_1_7, 1.7),
        (codes::BASEMENT_1_7_2_0, 2.0),
        (codes::BASEMENT_OVER_2_0, 2.5),
        (codes::FOUNDATION_ISOLATED, 0.2),
        (codes::FOUNDATION_STRIP, 0.5),
        (codes::FOUNDATION_PILE, 0.3),
    ]
    .into_iter()
    .map(|(code, value)| (code.to_string(), value))
    .collect()
}

fn key(level: &str) -> PriceKey {
    PriceKey {
        construction_type_id: RecordId::from("ct-000001"),
        build_package_id: RecordId::from("pkg-000001"),
        investment_level_id: RecordId::from(level),
    }
}

fn price(id: &str, level: &str, price_per_m2: u64) -> UnitPrice {
    let key = key(level);
    UnitPrice {
        id: RecordId::from(id),
        construction_type_id: key.construction_type_id,
        build_package_id: key.build_package_id,
        investment_level_id: key.investment_level_id,
        price_per_m2,
        description: None,
        stamps: Timestamps::new(Utc::now()),
    }
}

/// Nhà phố / Phần thô priced at "Trung bình" and "Cao cấp".
fn prices() -> Vec<UnitPrice> {
    vec![
        price("price-000001", "lvl-000001", 5_500_000),
        price("price-000002", "lvl-000002", 6_200_000),
    ]
}

fn town_house(width: f64, length: f64, floors: u8) -> EstimateRequest {
    EstimateRequest::new(width, length, floors).with_selection(key("lvl-000001"))
}

fn engine() -> EstimationEngine {
    EstimationEngine::new(AdditionalFactors::standard())
}

fn estimate(request: &EstimateRequest) -> Estimate {
    engine()
        .estimate(request, &coefficients(), &prices())
        .expect("estimate succeeds")
}

#[test]
fn two_storey_town_house_matches_published_example() {
    let result = estimate(&town_house(5.0, 15.0, 2));

    assert_eq!(result.footprint, 75.0);
    assert_eq!(result.weighted_area, 150.0);
    assert_eq!(result.base_price_per_m2, 5_500_000);
    assert_eq!(result.frontage_multiplier, 1.0);
    assert_eq!(result.alley_multiplier, 1.0);
    assert_eq!(result.basement_multiplier, 1.0);
    assert_eq!(result.estimated_cost, 825_000_000);
    assert_eq!(result.unit_price_id.as_str(), "price-000001");
}

#[test]
fn ground_floor_only_weighs_the_footprint() {
    let result = estimate(&town_house(4.5, 18.0, 1));

    assert_eq!(result.components.len(), 1);
    assert_eq!(result.components[0].kind, ComponentKind::GroundFloor);
    assert_eq!(result.weighted_area, result.footprint);
}

#[test]
fn weighted_area_is_monotonic_in_each_declared_area() {
    type Setter = fn(&mut EstimateRequest, f64);
    let setters: [(&str, Setter); 7] = [
        ("loft", |r, v| r.loft_area = v),
        ("balcony", |r, v| r.balcony_area = v),
        ("terrace", |r, v| r.terrace_area = v),
        ("garden", |r, v| r.garden_area = v),
        ("stair roof", |r, v| r.stair_roof_area = v),
        ("roof", |r, v| {
            r.roof = Some(RoofKind::Concrete);
            r.roof_area = Some(v);
        }),
        ("basement", |r, v| {
            r.basement = Some(BasementDepth::Shallow);
            r.basement_area = Some(v);
        }),
    ];

    for (name, set) in setters {
        let mut previous = 0.0;
        for area in [0.0, 5.0, 12.5, 40.0, 120.0] {
            let mut request = town_house(5.0, 20.0, 3);
            set(&mut request, area);
            let result = estimate(&request);
            assert!(result.weighted_area >= 0.0);
            assert!(
                result.weighted_area >= previous,
                "{name}: weighted area dropped at {area} m²"
            );
            previous = result.weighted_area;
        }
    }
}

#[test]
fn roof_defaults_to_footprint_area() {
    let mut request = town_house(5.0, 15.0, 2);
    request.roof = Some(RoofKind::Concrete);

    let result = estimate(&request);
    let roof = result
        .components
        .iter()
        .find(|line| line.kind == ComponentKind::Roof)
        .expect("roof line present");

    assert_eq!(roof.code, "mai_btct");
    assert_eq!(roof.area, 75.0);
    assert_eq!(roof.weighted_area, 37.5);
    assert_eq!(result.weighted_area, 187.5);
}

#[test]
fn higher_investment_level_never_costs_less() {
    let standard = estimate(&town_house(5.0, 15.0, 3));
    let premium = estimate(&town_house(5.0, 15.0, 3).with_selection(key("lvl-000002")));

    assert!(premium.estimated_cost >= standard.estimated_cost);
    assert_eq!(premium.base_price_per_m2, 6_200_000);
}

#[test]
fn shallow_basement_raises_area_and_price() {
    let without = estimate(&town_house(5.0, 15.0, 2));
    let mut request = town_house(5.0, 15.0, 2);
    request.basement = Some(BasementDepth::Shallow);
    let with = estimate(&request);

    let basement = with
        .components
        .iter()
        .find(|line| line.kind == ComponentKind::Basement)
        .expect("basement line present");
    assert_eq!(basement.coefficient, 1.5);
    assert_eq!(basement.weighted_area, 112.5);
    assert_eq!(with.basement_multiplier, 1.5);
    assert_eq!(with.weighted_area, 262.5);
    assert_eq!(with.estimated_cost, 2_165_625_000);
    assert!(with.estimated_cost > without.estimated_cost);
}

#[test]
fn site_conditions_multiply_the_unit_price() {
    let mut request = town_house(5.0, 15.0, 2);
    request.frontage = FrontageCount::Two;
    request.alley = AlleyClass::Narrow;

    let result = estimate(&request);
    assert_eq!(result.frontage_multiplier, 1.03);
    assert_eq!(result.alley_multiplier, 1.06);
    let expected = (150.0 * (5_500_000.0 * 1.03 * 1.06_f64)).round() as u64;
    assert_eq!(result.estimated_cost, expected);
}

#[test]
fn missing_selection_is_a_validation_error() {
    let mut request = town_house(5.0, 15.0, 2);
    request.investment_level_id = None;

    let err = engine()
        .estimate(&request, &coefficients(), &prices())
        .expect_err("selection required");
    assert!(matches!(err, EstimationError::Validation(ref v) if v.field == "investmentLevelId"));
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn degenerate_dimensions_are_rejected() {
    let cases = [
        (town_house(0.0, 15.0, 2), "width"),
        (town_house(5.0, f64::INFINITY, 2), "length"),
        (town_house(5.0, 15.0, 0), "floors"),
        (
            EstimateRequest {
                garden_area: -1.0,
                ..town_house(5.0, 15.0, 2)
            },
            "gardenArea",
        ),
        (
            EstimateRequest {
                roof_area: Some(f64::NAN),
                ..town_house(5.0, 15.0, 2)
            },
            "roofArea",
        ),
    ];

    for (request, field) in cases {
        let err = engine()
            .estimate(&request, &coefficients(), &prices())
            .expect_err("invalid request");
        assert!(
            matches!(err, EstimationError::Validation(ref v) if v.field == field),
            "expected {field} to be rejected, got {err}"
        );
    }
}

#[test]
fn unpriced_triple_is_not_found_instead_of_defaulting() {
    let request = town_house(5.0, 15.0, 2).with_selection(key("lvl-000009"));

    let err = engine()
        .estimate(&request, &coefficients(), &prices())
        .expect_err("no price for level");
    assert!(matches!(err, EstimationError::UnitPriceNotFound(ref key)
        if key.investment_level_id.as_str() == "lvl-000009"));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
fn declared_component_without_coefficient_is_reported() {
    let mut request = town_house(5.0, 15.0, 2);
    request.foundation = Some(FoundationKind::Pile);
    let table: CoefficientTable = [
        (codes::GROUND_FLOOR.to_string(), 1.0),
        (codes::UPPER_FLOOR.to_string(), 1.0),
    ]
    .into_iter()
    .collect();

    let err = engine()
        .estimate(&request, &table, &prices())
        .expect_err("pile coefficient missing");
    assert!(matches!(err, EstimationError::MissingCoefficient(ref code) if code == "mong_coc"));
}

#[test]
fn request_deserializes_from_camel_case_with_defaults() {
    let request: EstimateRequest = serde_json::from_value(serde_json::json!({
        "width": 5,
        "length": 15,
        "floors": 2,
        "roof": "tile",
        "basement": "very_deep",
        "frontage": "two",
        "alley": "medium",
        "constructionTypeId": "ct-000001",
    }))
    .expect("request parses");

    assert_eq!(request.roof, Some(RoofKind::Tile));
    assert_eq!(request.basement, Some(BasementDepth::VeryDeep));
    assert_eq!(request.frontage, FrontageCount::Two);
    assert_eq!(request.alley, AlleyClass::Medium);
    assert_eq!(request.loft_area, 0.0);
    assert!(request.build_package_id.is_none());
}

#[test]
fn factor_classes_parse_from_cli_spellings() {
    assert_eq!("2".parse::<FrontageCount>(), Ok(FrontageCount::Two));
    assert_eq!("5".parse::<FrontageCount>(), Ok(FrontageCount::ThreeOrMore));
    assert!("0".parse::<FrontageCount>().is_err());
    assert_eq!("very-deep".parse::<BasementDepth>(), Ok(BasementDepth::VeryDeep));
    assert_eq!("BTCT".parse::<RoofKind>(), Ok(RoofKind::Concrete));
    assert!("glass".parse::<RoofKind>().is_err());
}

#[test]
fn zero_area_basement_leaves_the_price_alone() {
    let plain = estimate(&town_house(5.0, 15.0, 2));
    let mut request = town_house(5.0, 15.0, 2);
    request.basement = Some(BasementDepth::Shallow);
    request.basement_area = Some(0.0);

    let result = estimate(&request);
    assert!(result
        .components
        .iter()
        .all(|line| line.kind != ComponentKind::Basement));
    assert_eq!(result.basement_multiplier, 1.0);
    assert_eq!(result.estimated_cost, plain.estimated_cost);
}

#[test]
fn overflowing_dimensions_are_rejected_instead_of_saturating() {
    let cases = [
        (town_house(1e300, 1e300, 2), "length"),
        (town_house(1e150, 1e150, 2), "estimatedCost"),
        (
            EstimateRequest {
                loft_area: f64::MAX,
                ..town_house(5.0, 15.0, 2)
            },
            "estimatedCost",
        ),
        (
            EstimateRequest {
                loft_area: f64::MAX,
                terrace_area: f64::MAX,
                ..town_house(5.0, 15.0, 2)
            },
            "weightedArea",
        ),
    ];

    for (request, field) in cases {
        let err = engine()
            .estimate(&request, &coefficients(), &prices())
            .expect_err("too large to price");
        assert!(
            matches!(err, EstimationError::Validation(ref v) if v.field == field),
            "expected {field} to be rejected, got {err}"
        );
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
