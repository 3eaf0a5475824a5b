use crate::infra::{build_catalog, format_vnd};
use clap::Args;
use homebuild::catalog::CatalogService;
use homebuild::config::AppConfig;
use homebuild::error::AppError;
use homebuild::estimation::{
    AlleyClass, BasementDepth, Estimate, EstimateRequest, FoundationKind, FrontageCount,
    RoofKind,
};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Lot width in metres
    #[arg(long)]
    pub(crate) width: f64,
    /// Lot length in metres
    #[arg(long)]
    pub(crate) length: f64,
    /// Number of floors including the ground floor
    #[arg(long)]
    pub(crate) floors: u8,
    /// Construction type name, e.g. "Nhà phố"
    #[arg(long = "type")]
    pub(crate) construction_type: String,
    /// Build package name, e.g. "Phần thô"
    #[arg(long = "package")]
    pub(crate) build_package: String,
    /// Investment level name, e.g. "Trung bình"
    #[arg(long = "level")]
    pub(crate) investment_level: String,
    /// Loft area in m²
    #[arg(long, default_value_t = 0.0)]
    pub(crate) loft_area: f64,
    /// Roof kind: metal, concrete or tile
    #[arg(long)]
    pub(crate) roof: Option<RoofKind>,
    /// Roof area in m² (defaults to the footprint)
    #[arg(long)]
    pub(crate) roof_area: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) balcony_area: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) terrace_area: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) garden_area: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) stair_roof_area: f64,
    /// Basement depth class: shallow, medium, deep or very_deep
    #[arg(long)]
    pub(crate) basement: Option<BasementDepth>,
    /// Basement area in m² (defaults to the footprint)
    #[arg(long)]
    pub(crate) basement_area: Option<f64>,
    /// Foundation kind: isolated, strip or pile
    #[arg(long)]
    pub(crate) foundation: Option<FoundationKind>,
    /// Number of street-facing sides
    #[arg(long, default_value = "1")]
    pub(crate) frontage: FrontageCount,
    /// Access road class: wide, medium or narrow
    #[arg(long, default_value = "wide")]
    pub(crate) alley: AlleyClass,
}

impl EstimateArgs {
    fn request(&self, service: &CatalogService) -> Result<EstimateRequest, AppError> {
        let key = service.select_by_names(
            &self.construction_type,
            &self.build_package,
            &self.investment_level,
        )?;

        Ok(EstimateRequest {
            loft_area: self.loft_area,
            roof: self.roof,
            roof_area: self.roof_area,
            balcony_area: self.balcony_area,
            terrace_area: self.terrace_area,
            garden_area: self.garden_area,
            stair_roof_area: self.stair_roof_area,
            basement: self.basement,
            basement_area: self.basement_area,
            foundation: self.foundation,
            frontage: self.frontage,
            alley: self.alley,
            ..EstimateRequest::new(self.width, self.length, self.floors)
        }
        .with_selection(key))
    }
}

fn load_catalog() -> Result<CatalogService, AppError> {
    let config = AppConfig::load()?;
    let (service, _) = build_catalog(&config.catalog, config.paging)?;
    Ok(service)
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let service = load_catalog()?;
    let request = args.request(&service)?;
    let estimate = service.estimate(&request)?;

    println!(
        "Estimate for {} / {} / {}",
        args.construction_type, args.build_package, args.investment_level
    );
    for line in render_estimate(&estimate) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_price_matrix() -> Result<(), AppError> {
    let service = load_catalog()?;
    let rows = service.price_matrix()?;

    println!("Unit price matrix ({} rows)", rows.len());
    for row in rows {
        println!(
            "- {} | {} | {}: {}/m²{}",
            row.construction_type.name,
            row.build_package.name,
            row.investment_level.name,
            format_vnd(row.price_per_m2),
            row.description
                .map(|text| format!(" ({text})"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

pub(crate) fn render_estimate(estimate: &Estimate) -> Vec<String> {
    let mut lines = vec![format!("Footprint: {:.2} m²", estimate.footprint)];
    lines.push("Weighted area:".to_string());
    for component in &estimate.components {
        lines.push(format!(
            "  - {} ({}): {:.2} m² × {} = {:.2} m²",
            component.label,
            component.code,
            component.area,
            component.coefficient,
            component.weighted_area
        ));
    }
    lines.push(format!("  Total: {:.2} m²", estimate.weighted_area));
    lines.push(format!(
        "Unit price {}: {}/m²",
        estimate.unit_price_id,
        format_vnd(estimate.base_price_per_m2)
    ));
    lines.push(format!(
        "Multipliers: frontage {} | alley {} | basement {}",
        estimate.frontage_multiplier, estimate.alley_multiplier, estimate.basement_multiplier
    ));
    lines.push(format!(
        "Adjusted price: {}/m²",
        format_vnd(estimate.adjusted_price_per_m2.round() as u64)
    ));
    lines.push(format!("Estimated cost: {}", format_vnd(estimate.estimated_cost)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use homebuild::config::{CatalogConfig, PagingConfig};

    fn args() -> EstimateArgs {
        EstimateArgs {
            width: 5.0,
            length: 15.0,
            floors: 2,
            construction_type: "nhà phố".to_string(),
            build_package: "Phần thô".to_string(),
            investment_level: "Trung bình".to_string(),
            loft_area: 0.0,
            roof: None,
            roof_area: None,
            balcony_area: 0.0,
            terrace_area: 0.0,
            garden_area: 0.0,
            stair_roof_area: 0.0,
            basement: None,
            basement_area: None,
            foundation: None,
            frontage: FrontageCount::One,
            alley: AlleyClass::Wide,
        }
    }

    #[test]
    fn named_selection_prices_the_published_example() {
        let (service, _) =
            build_catalog(&CatalogConfig::default(), PagingConfig::default()).expect("catalog");
        let request = args().request(&service).expect("names resolve");
        let estimate = service.estimate(&request).expect("estimate");

        let lines = render_estimate(&estimate);
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Estimated cost: 825.000.000 VND")
        );
        assert!(lines.iter().any(|line| line.contains("tang_lau")));
    }

    #[test]
    fn unknown_name_is_reported() {
        let (service, _) =
            build_catalog(&CatalogConfig::default(), PagingConfig::default()).expect("catalog");
        let mut args = args();
        args.investment_level = "Siêu sang".to_string();

        let err = args.request(&service).expect_err("unknown level");
        assert!(err.to_string().contains("Siêu sang"));
    }
}
