//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the pivot-engine integration tests.

#![allow(dead_code)]

use model::{CellValue, Dataset, SourceRow};

pub const EPSILON: f64 = 1e-9;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// The three-row dataset used throughout the examples.
pub struct SmallFixture;

impl SmallFixture {
    pub fn dataset() -> Dataset {
        let mut ds = Dataset::new(vec![
            "region".to_string(),
            "product".to_string(),
            "sales".to_string(),
        ]);
        ds.push_row(SourceRow::new(vec!["A".into(), "X".into(), 10.0.into()]));
        ds.push_row(SourceRow::new(vec!["A".into(), "Y".into(), 20.0.into()]));
        ds.push_row(SourceRow::new(vec!["B".into(), "X".into(), 5.0.into()]));
        ds
    }
}

/// A larger sales table with gaps, text numbers and signed values.
pub struct SalesFixture;

impl SalesFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Sales", "Quantity"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Apples", "Q1", 100.0, 10.0),
            ("North", "Apples", "Q2", 150.0, 15.0),
            ("North", "Oranges", "Q1", 80.0, 8.0),
            ("South", "Apples", "Q1", 200.0, 20.0),
            ("South", "Oranges", "Q2", 250.0, 25.0),
            ("South", "Pears", "Q3", -40.0, 4.0),
            ("East", "Pears", "Q1", 60.0, 6.0),
            ("East", "Oranges", "Q4", 90.0, 9.0),
            ("West", "Apples", "Q2", 120.0, 12.0),
            ("West", "Apples", "Q3", 30.0, 3.0),
        ]
    }

    pub fn dataset() -> Dataset {
        let fields = Self::headers().into_iter().map(String::from).collect();
        let mut ds = Dataset::new(fields);
        for (region, product, quarter, sales, quantity) in Self::data() {
            ds.push_row(SourceRow::new(vec![
                region.into(),
                product.into(),
                quarter.into(),
                sales.into(),
                quantity.into(),
            ]));
        }
        // Text-encoded number, a non-numeric value and a blank region
        ds.push_row(SourceRow::new(vec![
            "East".into(),
            "Apples".into(),
            "Q2".into(),
            " 45 ".into(),
            CellValue::Empty,
        ]));
        ds.push_row(SourceRow::new(vec![
            "West".into(),
            "Pears".into(),
            "Q4".into(),
            "pending".into(),
            1.0.into(),
        ]));
        ds.push_row(SourceRow::new(vec![
            CellValue::Empty,
            "Oranges".into(),
            "Q1".into(),
            70.0.into(),
            7.0.into(),
        ]));
        ds
    }
}
