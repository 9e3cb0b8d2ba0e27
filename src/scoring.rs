//! Deterministic financial health scoring
//!
//! Four indicators, each bucketed on a five-tier ladder worth
//! 25/20/15/10/5 points. The composite score is the plain sum, so it
//! always lands in [20, 100].

use crate::models::{Category, Financials, Indicators};

pub const MAX_SCORE: u8 = 100;

/// Tier points from best to worst
const TIER_POINTS: [u8; 5] = [25, 20, 15, 10, 5];

/// Lower bounds for "higher is better" ladders
const LIQUIDITY_LADDER: [f64; 4] = [2.0, 1.5, 1.0, 0.5];
const PROFIT_MARGIN_LADDER: [f64; 4] = [20.0, 15.0, 10.0, 5.0];
const PRODUCTIVITY_LADDER: [f64; 4] = [200_000_000.0, 150_000_000.0, 100_000_000.0, 50_000_000.0];

/// Upper bounds for the debt ratio, where lower is better
const DEBT_RATIO_LADDER: [f64; 4] = [30.0, 40.0, 50.0, 60.0];

/// Minimum score for each category, checked top-down
const CATEGORY_FLOORS: [(u8, Category); 5] = [
    (85, Category::Excellent),
    (70, Category::VeryGood),
    (55, Category::Good),
    (40, Category::Fair),
    (25, Category::Poor),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthScore {
    pub indicators: Indicators,
    pub score: u8,
    pub category: Category,
}

/// Compute the indicators, composite score and category for a set of figures
pub fn score(financials: &Financials) -> HealthScore {
    let indicators = compute_indicators(financials);
    let score = points_for(&indicators);

    HealthScore {
        indicators,
        score,
        category: category_for(score),
    }
}

pub fn compute_indicators(f: &Financials) -> Indicators {
    let liquidity = if f.debt > 0.0 {
        f.assets / f.debt
    } else {
        f64::INFINITY
    };

    let profit_margin_pct = if f.annual_value > 0.0 {
        100.0 * f.profit / f.annual_value
    } else {
        0.0
    };

    let debt_ratio_pct = if f.assets > 0.0 {
        100.0 * f.debt / f.assets
    } else {
        f64::INFINITY
    };

    let productivity_per_employee = if f.employee_count > 0 {
        f.annual_value / f64::from(f.employee_count)
    } else {
        0.0
    };

    Indicators {
        liquidity,
        profit_margin_pct,
        debt_ratio_pct,
        productivity_per_employee,
    }
}

/// Sum of the four tier points
pub fn points_for(indicators: &Indicators) -> u8 {
    ladder_at_least(indicators.liquidity, &LIQUIDITY_LADDER)
        + ladder_at_least(indicators.profit_margin_pct, &PROFIT_MARGIN_LADDER)
        + ladder_at_most(indicators.debt_ratio_pct, &DEBT_RATIO_LADDER)
        + ladder_at_least(indicators.productivity_per_employee, &PRODUCTIVITY_LADDER)
}

pub fn category_for(score: u8) -> Category {
    CATEGORY_FLOORS
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Critical)
}

fn ladder_at_least(value: f64, bounds: &[f64; 4]) -> u8 {
    bounds
        .iter()
        .position(|bound| value >= *bound)
        .map(|tier| TIER_POINTS[tier])
        .unwrap_or(TIER_POINTS[4])
}

fn ladder_at_most(value: f64, bounds: &[f64; 4]) -> u8 {
    bounds
        .iter()
        .position(|bound| value <= *bound)
        .map(|tier| TIER_POINTS[tier])
        .unwrap_or(TIER_POINTS[4])
}

//
// ================= Recommendations =================
//

/// Wording used when a recommendation is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrasing {
    /// Bullet list inside the full report
    Imperative,
    /// Standalone "Se recomienda ..." answer
    Advisory,
}

struct RecommendationRule {
    breached: fn(&Indicators) -> bool,
    imperative: &'static str,
    advisory: &'static str,
}

const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        breached: low_liquidity,
        imperative: "Mejorar la posición de liquidez para cubrir obligaciones a corto plazo.",
        advisory: "Se recomienda mejorar la posición de liquidez para cubrir obligaciones a corto plazo.",
    },
    RecommendationRule {
        breached: thin_margin,
        imperative: "Implementar estrategias para aumentar el margen de ganancia.",
        advisory: "Se recomienda implementar estrategias para aumentar el margen de ganancia.",
    },
    RecommendationRule {
        breached: heavy_debt,
        imperative: "Reducir el nivel de endeudamiento para mejorar la estabilidad financiera.",
        advisory: "Se recomienda reducir el nivel de endeudamiento para mejorar la estabilidad financiera.",
    },
    RecommendationRule {
        breached: low_productivity,
        imperative: "Revisar la productividad por empleado para optimizar recursos.",
        advisory: "Se recomienda revisar la productividad por empleado para optimizar recursos.",
    },
];

fn low_liquidity(i: &Indicators) -> bool {
    i.liquidity < 1.0
}

fn thin_margin(i: &Indicators) -> bool {
    i.profit_margin_pct < 10.0
}

fn heavy_debt(i: &Indicators) -> bool {
    i.debt_ratio_pct > 50.0
}

fn low_productivity(i: &Indicators) -> bool {
    i.productivity_per_employee < 100_000_000.0
}

const HEALTHY_RECOMMENDATION: &str =
    "La empresa muestra indicadores saludables. Se recomienda mantener las estrategias actuales.";

/// One line per breached threshold, or a single "keep going" line
pub fn recommendations(indicators: &Indicators, phrasing: Phrasing) -> Vec<&'static str> {
    let lines: Vec<&'static str> = RECOMMENDATION_RULES
        .iter()
        .filter(|rule| (rule.breached)(indicators))
        .map(|rule| match phrasing {
            Phrasing::Imperative => rule.imperative,
            Phrasing::Advisory => rule.advisory,
        })
        .collect();

    if lines.is_empty() {
        vec![HEALTHY_RECOMMENDATION]
    } else {
        lines
    }
}
