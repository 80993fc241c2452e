//! Column schemas for the keyword shortcut tables.
//!
//! Each supported keyword has a fixed list of named, typed columns in item
//! order. The `date` column is implicit and always comes first.

use polars::prelude::*;

/// Logical type of a projected column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    /// Low-cardinality strings (well names, status flags)
    Category,
    Text,
}

impl ColumnKind {
    /// Polars type of the finished column
    pub fn dtype(&self) -> DataType {
        match self {
            ColumnKind::Int => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Category => DataType::Categorical(None, Default::default()),
            ColumnKind::Text => DataType::String,
        }
    }
}

/// One named item of a keyword record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Value substituted for a defaulted item
    pub default: Option<&'static str>,
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        default: None,
    }
}

const fn col_or(name: &'static str, kind: ColumnKind, default: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        default: Some(default),
    }
}

/// Column layout of one keyword's table
#[derive(Debug, Clone, Copy)]
pub struct KeywordSchema {
    pub keyword: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl KeywordSchema {
    /// Column names including the leading `date`
    pub fn field_names(&self) -> Vec<&'static str> {
        std::iter::once(DATE_COLUMN)
            .chain(self.columns.iter().map(|c| c.name))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

pub const DATE_COLUMN: &str = "date";

use ColumnKind::{Category, Float, Int, Text};

macro_rules! well_location_tail {
    () => {
        [
            col("reference depth", Float),
            col("preferred phase", Category),
            col("drainage radius", Float),
            col("inflow equation", Text),
            col("automatic shut-in", Text),
            col("crossflow", Text),
            col("pressure table", Int),
            col("density calculation", Text),
            col("FIP region", Int),
            col("_reserved1", Text),
            col("_reserved2", Text),
            col("well model", Text),
            col("polymer", Text),
        ]
    };
}

macro_rules! completion_tail {
    () => {
        [
            col("I", Int),
            col("J", Int),
            col("K_up", Int),
            col("K_low", Int),
            col_or("status", Category, "OPEN"),
            col("saturation table", Int),
            col("transmissibility factor", Float),
            col("well bore diameter", Float),
            col("Kh", Float),
            col_or("skin", Float, "0.0"),
            col("D-factor", Float),
            col_or("direction", Category, "Z"),
            col("pressure equivalent radius", Float),
        ]
    };
}

const fn concat2<const A: usize, const B: usize, const N: usize>(
    head: [ColumnSpec; A],
    tail: [ColumnSpec; B],
) -> [ColumnSpec; N] {
    let mut out = [col("", Text); N];
    let mut i = 0;
    while i < A {
        out[i] = head[i];
        i += 1;
    }
    let mut j = 0;
    while j < B {
        out[A + j] = tail[j];
        j += 1;
    }
    out
}

const WELSPECS_COLUMNS: [ColumnSpec; 17] = concat2(
    [
        col("well", Category),
        col("group", Category),
        col("I", Int),
        col("J", Int),
    ],
    well_location_tail!(),
);

const WELSPECL_COLUMNS: [ColumnSpec; 18] = concat2(
    [
        col("well", Category),
        col("group", Category),
        col("local grid", Text),
        col("I", Int),
        col("J", Int),
    ],
    well_location_tail!(),
);

const WELLSPEC_COLUMNS: [ColumnSpec; 7] = [
    col("well", Category),
    col("group", Category),
    col("I", Int),
    col("J", Int),
    col("reference depth", Float),
    col("separator name", Text),
    col("FIP region", Int),
];

const COMPDAT_COLUMNS: [ColumnSpec; 14] = concat2([col("well", Category)], completion_tail!());

const COMPDATL_COLUMNS: [ColumnSpec; 15] = concat2(
    [col("well", Category), col("local grid", Text)],
    completion_tail!(),
);

const WCONPROD_COLUMNS: [ColumnSpec; 20] = [
    col("well", Category),
    col("status", Category),
    col("control mode", Category),
    col("OIL rate", Float),
    col("WATER rate", Float),
    col("GAS rate", Float),
    col("LIQUID rate", Float),
    col("RESERVOIR fluid rate", Float),
    col("BHP limit", Float),
    col("THP limit", Float),
    col("VFP", Int),
    col("ALQ", Float),
    col("wet gas rate", Float),
    col("total molar rate", Float),
    col("steam rate", Float),
    col("pressure offset", Float),
    col("temperature offset", Float),
    col("calorific target rate", Float),
    col("linearly combined rate", Float),
    col("NGL rate", Float),
];

const WCONHIST_COLUMNS: [ColumnSpec; 12] = [
    col("well", Category),
    col("status", Category),
    col("control mode", Category),
    col("OIL rate", Float),
    col("WATER rate", Float),
    col("GAS rate", Float),
    col("VFP", Int),
    col("ALQ", Float),
    col("THP limit", Float),
    col("BHP limit", Float),
    col("wet gas rate", Float),
    col("NGL rate", Float),
];

const WCONINJE_COLUMNS: [ColumnSpec; 15] = [
    col("well", Category),
    col("injector type", Category),
    col("status", Category),
    col("control mode", Category),
    col("SURFACE fluid rate", Float),
    col("RESERVOIR fluid rate", Float),
    col("BHP limit", Float),
    col("THP limit", Float),
    col("VFP", Int),
    col("vap oil concentration", Float),
    col("thermal ratio of gas to steam", Float),
    col("OIL proportion", Float),
    col("WATER proportion", Float),
    col("GAS proportion", Float),
    col("ratio of oil to steam", Float),
];

const WCONINJH_COLUMNS: [ColumnSpec; 12] = [
    col("well", Category),
    col("injector type", Category),
    col("status", Category),
    col("injection rate", Float),
    col("BHP", Float),
    col("THP", Float),
    col("VFP", Int),
    col("vap oil concentration", Float),
    col("OIL proportion", Float),
    col("WATER proportion", Float),
    col("GAS proportion", Float),
    col("control mode", Category),
];

pub const WELSPECS: KeywordSchema = KeywordSchema {
    keyword: "WELSPECS",
    columns: &WELSPECS_COLUMNS,
};
pub const WELSPECL: KeywordSchema = KeywordSchema {
    keyword: "WELSPECL",
    columns: &WELSPECL_COLUMNS,
};
pub const WELLSPEC: KeywordSchema = KeywordSchema {
    keyword: "WELLSPEC",
    columns: &WELLSPEC_COLUMNS,
};
pub const COMPDAT: KeywordSchema = KeywordSchema {
    keyword: "COMPDAT",
    columns: &COMPDAT_COLUMNS,
};
pub const COMPDATL: KeywordSchema = KeywordSchema {
    keyword: "COMPDATL",
    columns: &COMPDATL_COLUMNS,
};
pub const COMPDATM: KeywordSchema = KeywordSchema {
    keyword: "COMPDATM",
    columns: &COMPDATL_COLUMNS,
};
pub const WCONPROD: KeywordSchema = KeywordSchema {
    keyword: "WCONPROD",
    columns: &WCONPROD_COLUMNS,
};
pub const WCONHIST: KeywordSchema = KeywordSchema {
    keyword: "WCONHIST",
    columns: &WCONHIST_COLUMNS,
};
pub const WCONINJE: KeywordSchema = KeywordSchema {
    keyword: "WCONINJE",
    columns: &WCONINJE_COLUMNS,
};
pub const WCONINJH: KeywordSchema = KeywordSchema {
    keyword: "WCONINJH",
    columns: &WCONINJH_COLUMNS,
};

/// Every keyword with a shortcut table
pub const SCHEMAS: [KeywordSchema; 10] = [
    WELSPECS, WELSPECL, WELLSPEC, COMPDAT, COMPDATL, COMPDATM, WCONPROD, WCONHIST, WCONINJE,
    WCONINJH,
];

/// Schema of a keyword, case-insensitive
pub fn schema_for(keyword: &str) -> Option<&'static KeywordSchema> {
    SCHEMAS
        .iter()
        .find(|schema| schema.keyword.eq_ignore_ascii_case(keyword))
}

/// Keyword names with a shortcut table, in table order
pub fn supported_keywords() -> Vec<&'static str> {
    SCHEMAS.iter().map(|schema| schema.keyword).collect()
}
