//! Builds the full analysis attached to a company profile
//!
//! Linguistic output is informational only; score and category come
//! solely from the financial figures.

use crate::models::{AnalysisResult, CompanyProfile, Financials, PerField};
use crate::nlp::Annotator;
use crate::scoring::{self, MAX_SCORE};
use chrono::{DateTime, Utc};

pub fn analyze(
    annotator: &Annotator,
    name: &str,
    sector: &str,
    financials: &Financials,
) -> AnalysisResult {
    let name_annotation = annotator.annotate(name);
    let sector_annotation = annotator.annotate(sector);
    let health = scoring::score(financials);

    AnalysisResult {
        tokens: PerField {
            name: name_annotation.tokens,
            sector: sector_annotation.tokens,
        },
        lemmas: PerField {
            name: name_annotation.lemmas,
            sector: sector_annotation.lemmas,
        },
        pos_tags: PerField {
            name: name_annotation.pos_tags,
            sector: sector_annotation.pos_tags,
        },
        embeddings: PerField {
            name: name_annotation.embedding,
            sector: sector_annotation.embedding,
        },
        indicators: health.indicators,
        score: health.score,
        max_score: MAX_SCORE,
        category: health.category,
        description: health.category.description().to_string(),
    }
}

/// Build a profile with a freshly computed analysis.
///
/// `registered_at` is passed in so updates can keep the original date.
pub fn build_profile(
    annotator: &Annotator,
    name: &str,
    sector: &str,
    financials: Financials,
    registered_at: DateTime<Utc>,
) -> CompanyProfile {
    let analysis = analyze(annotator, name, sector, &financials);

    CompanyProfile {
        name: name.to_string(),
        sector: sector.to_string(),
        annual_value: financials.annual_value,
        profit: financials.profit,
        employee_count: financials.employee_count,
        assets: financials.assets,
        receivables: financials.receivables,
        debt: financials.debt,
        registered_at,
        analysis,
    }
}
