//! Text rendering for reports, tables and short answers
//!
//! Every function here is pure: it returns the text and the caller decides
//! where it goes.

use crate::models::CompanyProfile;
use crate::scoring::{recommendations, Phrasing};
use std::fmt::Write;

const TABLE_RULE_WIDTH: usize = 80;

/// Full fixed-template analysis of one company
pub fn full_report(profile: &CompanyProfile) -> String {
    let a = &profile.analysis;
    let i = &a.indicators;

    let mut out = format!(
        "\nANÁLISIS FINANCIERO Y NLP DE {name_upper}
=====================================

El análisis de la empresa {name}, perteneciente al sector {sector},
ha sido completado utilizando técnicas de procesamiento de lenguaje
natural (NLP) y análisis financiero.

DATOS FINANCIEROS:
-----------------
• Valor anual: ${annual} COP
• Ganancias: ${profit} COP
• Activos: ${assets} COP
• Cartera: ${receivables} COP
• Deudas: ${debt} COP
• Número de empleados: {employees}

INDICADORES CALCULADOS:
---------------------
• Ratio de liquidez: {liquidity:.2}
• Margen de ganancia: {margin:.2}%
• Ratio de endeudamiento: {debt_ratio:.2}%
• Productividad por empleado: ${productivity} COP

PROCESAMIENTO DE LENGUAJE:
------------------------
Se ha aplicado tokenización, lematización y etiquetado gramatical
al nombre y sector de la empresa para su posterior análisis.

EVALUACIÓN GLOBAL:
----------------
La salud financiera de la empresa se clasifica como: {category}
Puntuación: {score}/{max_score}

DESCRIPCIÓN:
{description}

RECOMENDACIONES:
--------------",
        name_upper = profile.name.to_uppercase(),
        name = profile.name,
        sector = profile.sector,
        annual = format_amount(profile.annual_value),
        profit = format_amount(profile.profit),
        assets = format_amount(profile.assets),
        receivables = format_amount(profile.receivables),
        debt = format_amount(profile.debt),
        employees = profile.employee_count,
        liquidity = i.liquidity,
        margin = i.profit_margin_pct,
        debt_ratio = i.debt_ratio_pct,
        productivity = format_amount(i.productivity_per_employee),
        category = a.category,
        score = a.score,
        max_score = a.max_score,
        description = a.description,
    );

    for line in recommendations(i, Phrasing::Imperative) {
        let _ = write!(out, "\n• {}", line);
    }

    out
}

/// The three core indicators, for "indicadores"/"financi" questions
pub fn indicator_summary(profile: &CompanyProfile) -> String {
    let i = &profile.analysis.indicators;
    format!(
        "\nIndicadores financieros de {}:\n\
         • Liquidez: {:.2}\n\
         • Margen de ganancia: {:.2}%\n\
         • Ratio de endeudamiento: {:.2}%",
        profile.name, i.liquidity, i.profit_margin_pct, i.debt_ratio_pct
    )
}

pub fn recommendation_answer(profile: &CompanyProfile) -> String {
    let mut out = format!("\nRECOMENDACIONES PARA {}:", profile.name.to_uppercase());
    for line in recommendations(&profile.analysis.indicators, Phrasing::Advisory) {
        let _ = write!(out, "\n• {}", line);
    }
    out
}

/// Name / sector / employees / category table
pub fn company_table<'a>(
    title: &str,
    profiles: impl IntoIterator<Item = &'a CompanyProfile>,
) -> String {
    let mut out = format!("\n=== {} ===\n", title);
    let _ = writeln!(
        out,
        "{:<30} {:<20} {:<10} {:<20}",
        "NOMBRE", "SECTOR", "EMPLEADOS", "SALUD FINANCIERA"
    );
    out.push_str(&"=".repeat(TABLE_RULE_WIDTH));

    for p in profiles {
        let _ = write!(
            out,
            "\n{:<30} {:<20} {:<10} {:<20}",
            p.name,
            p.sector,
            p.employee_count,
            p.analysis.category.label()
        );
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Best,
    Worst,
}

pub fn extreme_summary(profile: &CompanyProfile, which: Extreme) -> String {
    let heading = match which {
        Extreme::Best => "La empresa con mejor salud financiera es",
        Extreme::Worst => "La empresa con salud financiera más baja es",
    };

    format!(
        "\n{}: {}\nSector: {}\nPuntuación: {}/{}\nCategoría: {}",
        heading,
        profile.name,
        profile.sector,
        profile.analysis.score,
        profile.analysis.max_score,
        profile.analysis.category
    )
}

pub fn sector_summary<'a>(counts: impl IntoIterator<Item = (&'a str, usize)>) -> String {
    let mut out = String::from("\nSECTORES REGISTRADOS:");
    for (sector, count) in counts {
        let _ = write!(out, "\n• {}: {} empresas", sector, count);
    }
    out
}

pub fn help_text() -> &'static str {
    "\n=== COMANDOS DISPONIBLES ===
ayuda - Muestra esta información
nueva empresa - Registra una nueva empresa
listar - Muestra las empresas registradas
analizar [nombre] - Analiza una empresa específica
buscar [término] - Busca empresas por nombre o sector
salir - Termina la aplicación
===========================\n"
}

/// Whole currency units with `,` thousands separators
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }

    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);

    for (idx, ch) in rounded.chars().enumerate() {
        if idx > 0 && (rounded.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && rounded != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
