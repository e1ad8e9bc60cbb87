//! Letter grades and grade-point scales.
//!
//! # Responsibility
//! - Enumerate the fixed letter-grade set accepted by the tracker.
//! - Map letter grades to numeric points through one explicit scale.
//!
//! # Invariants
//! - Unknown grade text resolves to `None`, never to a zero point value.
//! - Every scale value lies within `0.0..=4.0`.
//! - A tracker resolves all grades through a single scale; stored records
//!   keep the point value they were created with.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Upper bound of every supported grade scale.
pub const MAX_GRADE_POINT: f64 = 4.0;

/// Enumerated letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    /// All grades in display order (best first).
    pub const ALL: [Grade; 12] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::F,
    ];

    /// Parses the exact letter-grade label (surrounding whitespace ignored).
    ///
    /// Returns `None` for anything outside the enumerated set, including the
    /// empty "no grade selected" value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "A-" => Some(Self::AMinus),
            "B+" => Some(Self::BPlus),
            "B" => Some(Self::B),
            "B-" => Some(Self::BMinus),
            "C+" => Some(Self::CPlus),
            "C" => Some(Self::C),
            "C-" => Some(Self::CMinus),
            "D+" => Some(Self::DPlus),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }

    /// Stable label used in storage and UI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point table used to resolve letter grades.
///
/// `Campus` is the canonical table. `Standard` is the common US 4.0 table
/// and differs only in the C and D bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeScale {
    #[default]
    Campus,
    Standard,
}

impl GradeScale {
    /// Returns the point value of `grade` on this scale.
    pub fn points(self, grade: Grade) -> f64 {
        match (self, grade) {
            (_, Grade::APlus) | (_, Grade::A) => 4.0,
            (_, Grade::AMinus) => 3.67,
            (_, Grade::BPlus) => 3.33,
            (_, Grade::B) => 3.0,
            (_, Grade::BMinus) => 2.67,
            (Self::Campus, Grade::CPlus) => 2.0,
            (Self::Campus, Grade::C) => 1.5,
            (Self::Campus, Grade::CMinus) => 1.0,
            (Self::Campus, Grade::DPlus) => 1.0,
            (Self::Standard, Grade::CPlus) => 2.33,
            (Self::Standard, Grade::C) => 2.0,
            (Self::Standard, Grade::CMinus) => 1.67,
            (Self::Standard, Grade::DPlus) => 1.33,
            (_, Grade::D) => 1.0,
            (_, Grade::F) => 0.0,
        }
    }

    /// Parses a configuration label (`campus|standard`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "campus" => Some(Self::Campus),
            "standard" => Some(Self::Standard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Campus => "campus",
            Self::Standard => "standard",
        }
    }
}

/// Resolves free-text grade input to a point value.
///
/// `None` means "undefined": callers must treat it as invalid input.
pub fn grade_point_for(scale: GradeScale, grade_text: &str) -> Option<f64> {
    Grade::parse(grade_text).map(|grade| scale.points(grade))
}
