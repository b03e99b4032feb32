//! FILENAME: tests/test_display_heatmap.rs
//! Integration tests for percentage display and heatmap coloring.

mod common;

use common::{approx_eq, SalesFixture, SmallFixture};
use model::Color;
use pivot_engine::{
    color_for, compute_pivot, contrast_text_color, display_grid, to_display_value,
    AggregationType, ColorScheme, ContrastPreset, HeatmapOptions, HeatmapRange,
    PivotConfiguration, ShowValuesAs,
};

fn small_sum() -> pivot_engine::PivotResult {
    let config = PivotConfiguration::new("region", "sales").with_column("product");
    compute_pivot(&SmallFixture::dataset(), &config).unwrap()
}

// ============================================================================
// DISPLAY TRANSFORM
// ============================================================================

#[test]
fn test_percent_of_grand_total_example() {
    let result = small_sum();
    let value = to_display_value(
        result.cell("A", "X"),
        "A",
        "X",
        ShowValuesAs::PercentOfGrandTotal,
        &result,
    )
    .unwrap();
    assert!((value - 28.571428).abs() < 1e-4);
}

#[test]
fn test_raw_mode_passes_through() {
    let result = small_sum();
    assert_eq!(
        to_display_value(Some(20.0), "A", "Y", ShowValuesAs::Normal, &result),
        Some(20.0)
    );
    assert_eq!(
        to_display_value(None, "B", "Y", ShowValuesAs::PercentOfRowTotal, &result),
        None
    );
}

#[test]
fn test_row_and_column_percentages() {
    let result = small_sum();
    assert_eq!(
        to_display_value(Some(10.0), "A", "X", ShowValuesAs::PercentOfRowTotal, &result),
        Some(10.0 / 30.0 * 100.0)
    );
    assert_eq!(
        to_display_value(Some(5.0), "B", "X", ShowValuesAs::PercentOfColumnTotal, &result),
        Some(5.0 / 15.0 * 100.0)
    );
    // Unknown keys have no denominator
    assert_eq!(
        to_display_value(Some(5.0), "Z", "X", ShowValuesAs::PercentOfRowTotal, &result),
        None
    );
}

#[test]
fn test_percent_of_row_sums_to_hundred_under_sum() {
    let config = PivotConfiguration::new("Region", "Sales").with_column("Product");
    let result = compute_pivot(&SalesFixture::dataset(), &config).unwrap();
    let grid = display_grid(&result, ShowValuesAs::PercentOfRowTotal);

    for (r, row) in grid.cells.iter().enumerate() {
        let total: f64 = row.iter().flatten().sum();
        assert!(approx_eq(total, 100.0), "row {} sums to {}", result.row_keys[r], total);
        assert_eq!(grid.row_totals[r], Some(100.0));
    }
}

#[test]
fn test_percentages_are_not_clamped() {
    let config = PivotConfiguration::new("Region", "Sales").with_column("Product");
    let result = compute_pivot(&SalesFixture::dataset(), &config).unwrap();

    // Pears column total is 20 with a -40 contribution from South
    let south = to_display_value(
        result.cell("South", "Pears"),
        "South",
        "Pears",
        ShowValuesAs::PercentOfColumnTotal,
        &result,
    );
    assert_eq!(south, Some(-200.0));
    let east = to_display_value(
        result.cell("East", "Pears"),
        "East",
        "Pears",
        ShowValuesAs::PercentOfColumnTotal,
        &result,
    );
    assert_eq!(east, Some(300.0));
}

#[test]
fn test_zero_denominator_is_null() {
    let mut ds = SmallFixture::dataset();
    ds.push_row(model::SourceRow::new(vec!["C".into(), "X".into(), 4.0.into()]));
    ds.push_row(model::SourceRow::new(vec!["C".into(), "Y".into(), (-4.0).into()]));
    let config = PivotConfiguration::new("region", "sales").with_column("product");
    let result = compute_pivot(&ds, &config).unwrap();

    assert_eq!(result.row_total("C"), Some(0.0));
    assert_eq!(
        to_display_value(result.cell("C", "X"), "C", "X", ShowValuesAs::PercentOfRowTotal, &result),
        None
    );
}

#[test]
fn test_display_grid_totals() {
    let result = small_sum();
    let grid = display_grid(&result, ShowValuesAs::PercentOfGrandTotal);

    assert_eq!(grid.grand_total, Some(100.0));
    assert_eq!(grid.cell(1, 1), None);
    assert!(approx_eq(grid.row_totals[0].unwrap(), 30.0 / 35.0 * 100.0));
    assert!(approx_eq(grid.col_totals[1].unwrap(), 20.0 / 35.0 * 100.0));

    let raw = display_grid(&result, ShowValuesAs::Normal);
    assert_eq!(raw.grand_total, Some(35.0));
    assert_eq!(raw.cell(0, 1), Some(20.0));
}

#[test]
fn test_display_does_not_mutate_result() {
    let result = small_sum();
    let before = result.clone();
    let _ = display_grid(&result, ShowValuesAs::PercentOfColumnTotal);
    assert_eq!(result, before);
}

// ============================================================================
// HEATMAP
// ============================================================================

#[test]
fn test_heatmap_range_modes() {
    let result = small_sum();

    let raw = display_grid(&result, ShowValuesAs::Normal);
    assert_eq!(
        HeatmapRange::for_display(raw.values(), ShowValuesAs::Normal),
        Some(HeatmapRange { min: 5.0, max: 20.0 })
    );

    let pct = display_grid(&result, ShowValuesAs::PercentOfRowTotal);
    assert_eq!(
        HeatmapRange::for_display(pct.values(), ShowValuesAs::PercentOfRowTotal),
        Some(HeatmapRange::PERCENT)
    );
}

#[test]
fn test_degenerate_range_has_no_color() {
    for scheme in ColorScheme::ALL {
        assert_eq!(color_for(42.0, 5.0, 5.0, scheme), Color::transparent());
    }
}

#[test]
fn test_single_cell_grid_is_uncolored() {
    let config = PivotConfiguration::new("region", "sales").with_aggregation(AggregationType::Sum);
    let mut ds = SmallFixture::dataset();
    ds.rows.truncate(1);
    let result = compute_pivot(&ds, &config).unwrap();
    let grid = display_grid(&result, ShowValuesAs::Normal);
    let range = HeatmapRange::for_display(grid.values(), ShowValuesAs::Normal);

    assert_eq!(range, Some(HeatmapRange { min: 10.0, max: 10.0 }));
    assert_eq!(HeatmapOptions::default().paint(grid.cell(0, 0), range), None);
}

#[test]
fn test_heatmap_paint_uses_scheme_and_contrast() {
    let options = HeatmapOptions {
        scheme: ColorScheme::Green,
        contrast: ContrastPreset::Hex,
    };
    let range = Some(HeatmapRange { min: 0.0, max: 100.0 });

    let hot = options.paint(Some(100.0), range).unwrap();
    assert_eq!(hot.background, ColorScheme::Green.stops().high);
    assert_eq!(hot.text, contrast_text_color(hot.background, ContrastPreset::Hex));
    assert_eq!(hot.text, Color::white());

    let cold = options.paint(Some(0.0), range).unwrap();
    assert_eq!(cold.text, Color::black());
}
