//! Core data models for company profiles and their analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Enums =================
//

/// Qualitative financial health label derived from the composite score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Excelente")]
    Excellent,
    #[serde(rename = "Muy Buena")]
    VeryGood,
    #[serde(rename = "Buena")]
    Good,
    #[serde(rename = "Regular")]
    Fair,
    #[serde(rename = "Deficiente")]
    Poor,
    #[serde(rename = "Crítica")]
    Critical,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Excellent => "Excelente",
            Category::VeryGood => "Muy Buena",
            Category::Good => "Buena",
            Category::Fair => "Regular",
            Category::Poor => "Deficiente",
            Category::Critical => "Crítica",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Excellent => "La empresa muestra una salud financiera excepcional.",
            Category::VeryGood => "La empresa tiene una posición financiera sólida.",
            Category::Good => "La empresa presenta indicadores financieros estables.",
            Category::Fair => "La empresa tiene áreas que necesitan mejoras.",
            Category::Poor => "La empresa presenta problemas financieros significativos.",
            Category::Critical => "La empresa requiere atención urgente en su gestión financiera.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

//
// ================= Financial Inputs =================
//

/// Raw financial figures of a company, as entered by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Financials {
    pub annual_value: f64,
    pub profit: f64,
    pub employee_count: u32,
    pub assets: f64,
    pub receivables: f64,
    pub debt: f64,
}

//
// ================= Analysis =================
//

/// A token paired with its part-of-speech tag; serialized as `[token, tag]`
pub type TaggedToken = (String, String);

/// Linguistic output kept separately for the company name and its sector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PerField<T> {
    pub name: T,
    pub sector: T,
}

/// The four derived financial ratios. Any of them can overflow to infinity,
/// so all four persist through `unbounded_f64`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Indicators {
    /// assets / debt; infinite when there is no debt
    #[serde(with = "unbounded_f64")]
    pub liquidity: f64,
    #[serde(with = "unbounded_f64")]
    pub profit_margin_pct: f64,
    /// 100 * debt / assets; infinite when there are no assets
    #[serde(with = "unbounded_f64")]
    pub debt_ratio_pct: f64,
    #[serde(with = "unbounded_f64")]
    pub productivity_per_employee: f64,
}

/// Full analysis attached to a profile. Always regenerated as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub tokens: PerField<Vec<String>>,
    pub lemmas: PerField<Vec<String>>,
    pub pos_tags: PerField<Vec<TaggedToken>>,
    pub embeddings: PerField<Vec<f32>>,
    pub indicators: Indicators,
    pub score: u8,
    pub max_score: u8,
    pub category: Category,
    pub description: String,
}

//
// ================= Company Profile =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyProfile {
    pub name: String,
    pub sector: String,
    pub annual_value: f64,
    pub profit: f64,
    pub employee_count: u32,
    pub assets: f64,
    pub receivables: f64,
    pub debt: f64,
    pub registered_at: DateTime<Utc>,
    pub analysis: AnalysisResult,
}

impl CompanyProfile {
    pub fn financials(&self) -> Financials {
        Financials {
            annual_value: self.annual_value,
            profit: self.profit,
            employee_count: self.employee_count,
            assets: self.assets,
            receivables: self.receivables,
            debt: self.debt,
        }
    }
}

/// JSON has no infinity or NaN literal; persist them as the strings
/// `"Infinity"`, `"-Infinity"` and `"NaN"`.
mod unbounded_f64 {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() && value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else if value.is_infinite() {
            serializer.serialize_str("-Infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(text) => match text.as_str() {
                "Infinity" | "inf" => Ok(f64::INFINITY),
                "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("invalid ratio value '{}'", other))),
            },
        }
    }
}
