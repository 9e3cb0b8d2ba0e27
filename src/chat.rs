//! Interactive chat session
//!
//! One line of input is read, fully handled, and answered before the next
//! one is read. There is no memory between lines: each is classified on
//! its own as a command or a free-text question.

use crate::analysis::build_profile;
use crate::classifier::{Command, CompanyQuestion, Intent, IntentClassifier};
use crate::error::ChatError;
use crate::models::Financials;
use crate::nlp::Annotator;
use crate::report::{self, Extreme};
use crate::store::{CompanyStore, LoadStatus};
use crate::Result;
use chrono::Utc;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const PROMPT: &str = "\n> ";
const NO_COMPANIES: &str = "No hay empresas registradas.";
const NOT_UNDERSTOOD: &str =
    "No entiendo esa petición. Escribe 'ayuda' para ver los comandos disponibles.";

/// Whether the loop keeps reading after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ChatSession<R, W> {
    store: CompanyStore,
    annotator: Annotator,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ChatSession<R, W> {
    pub fn new(store: CompanyStore, annotator: Annotator, input: R, output: W) -> Self {
        Self {
            store,
            annotator,
            input,
            output,
        }
    }

    pub fn store(&self) -> &CompanyStore {
        &self.store
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Read-eval-print loop; returns on `salir` or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Sistema de Análisis Empresarial por Chat iniciado.")?;
        writeln!(self.output, "Escribe 'ayuda' para ver los comandos disponibles.")?;

        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                info!("Input closed, ending session");
                writeln!(self.output, "\n¡Hasta pronto!")?;
                return Ok(());
            };

            if self.handle(&line)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Handle a single input line
    pub fn handle(&mut self, line: &str) -> Result<Flow> {
        let command = Command::parse(line);
        debug!(?command, "Parsed input");

        match command {
            Command::Quit => {
                writeln!(self.output, "¡Hasta pronto!")?;
                return Ok(Flow::Quit);
            }
            Command::Help => write!(self.output, "{}", report::help_text())?,
            Command::NewCompany => self.register()?,
            Command::List => self.list()?,
            Command::Search(term) => self.search(&term)?,
            Command::Analyze(name) => self.analyze(&name)?,
            Command::FreeText(text) => self.answer(&text)?,
        }

        Ok(Flow::Continue)
    }

    // =============================
    // Commands
    // =============================

    fn list(&mut self) -> Result<()> {
        if self.store.is_empty() {
            writeln!(self.output, "{}", NO_COMPANIES)?;
            return Ok(());
        }

        let table = report::company_table("EMPRESAS REGISTRADAS", self.store.iter());
        writeln!(self.output, "{}", table)?;
        Ok(())
    }

    fn search(&mut self, term: &str) -> Result<()> {
        if self.store.is_empty() {
            writeln!(self.output, "{}", NO_COMPANIES)?;
            return Ok(());
        }

        let term = term.to_lowercase();
        let matches = self.store.search(&term);

        if matches.is_empty() {
            writeln!(
                self.output,
                "No se encontraron empresas con el término '{}'.",
                term
            )?;
            return Ok(());
        }

        let title = format!("RESULTADOS DE BÚSQUEDA PARA '{}'", term);
        writeln!(self.output, "{}", report::company_table(&title, matches))?;
        Ok(())
    }

    fn analyze(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            writeln!(self.output, "Por favor especifique el nombre de la empresa.")?;
            return Ok(());
        }

        if let Some(profile) = self.store.get(name) {
            writeln!(self.output, "{}", report::full_report(profile))?;
            return Ok(());
        }

        writeln!(self.output, "No se encontró la empresa '{}'.", name)?;

        let suggestions = self.store.suggestions(name);
        if !suggestions.is_empty() {
            writeln!(self.output, "Quizás quiso decir:")?;
            for suggestion in suggestions {
                writeln!(self.output, "- {}", suggestion)?;
            }
        }

        Ok(())
    }

    // =============================
    // Registration
    // =============================

    fn register(&mut self) -> Result<()> {
        writeln!(self.output, "\n=== REGISTRO DE NUEVA EMPRESA ===")?;

        let Some(name) = self.prompt("Nombre de la Empresa: ")? else {
            return self.cancel_registration();
        };

        if name.is_empty() {
            writeln!(self.output, "El nombre de la empresa no puede estar vacío.")?;
            return Ok(());
        }

        let previous_registration = self.store.get(&name).map(|p| p.registered_at);

        if previous_registration.is_some() {
            let question = format!(
                "La empresa '{}' ya existe. ¿Desea actualizarla? (s/n): ",
                name
            );
            let answer = self.prompt(&question)?.unwrap_or_default();
            if answer.to_lowercase() != "s" {
                return self.cancel_registration();
            }
        }

        let (sector, financials) = match self.collect_figures() {
            Ok(Some(figures)) => figures,
            Ok(None) => return self.cancel_registration(),
            Err(e @ (ChatError::InvalidNumber { .. } | ChatError::NegativeAmount { .. })) => {
                warn!(company = %name, "Registration aborted: {}", e);
                writeln!(
                    self.output,
                    "Error: Por favor ingrese valores numéricos válidos. {}",
                    e
                )?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        writeln!(self.output, "\nGenerando análisis...")?;

        let registered_at = previous_registration.unwrap_or_else(Utc::now);
        let profile = build_profile(&self.annotator, &name, &sector, financials, registered_at);
        let category = profile.analysis.category;

        writeln!(self.output, "{}", report::full_report(&profile))?;

        match self.store.upsert(profile) {
            Ok(()) => writeln!(self.output, "Datos guardados correctamente.")?,
            Err(e) => writeln!(self.output, "Error al guardar datos: {}", e)?,
        }

        info!(company = %name, %category, "Company registered");
        writeln!(self.output, "\nEmpresa '{}' registrada correctamente.", name)?;
        writeln!(self.output, "Categoría financiera: {}", category)?;

        Ok(())
    }

    /// Prompts for every field after the name. `Ok(None)` means input ended.
    fn collect_figures(&mut self) -> Result<Option<(String, Financials)>> {
        let Some(raw) = self.prompt("Valor Anual (COP): ")? else { return Ok(None) };
        let annual_value = parse_amount("valor anual", &raw)?;

        let Some(raw) = self.prompt("Ganancias (COP): ")? else { return Ok(None) };
        let profit = parse_amount("ganancias", &raw)?;

        let Some(sector) = self.prompt("Sector: ")? else { return Ok(None) };

        let Some(raw) = self.prompt("Número de Empleados: ")? else { return Ok(None) };
        let employee_count = parse_count("número de empleados", &raw)?;

        let Some(raw) = self.prompt("Valor en Activos (COP): ")? else { return Ok(None) };
        let assets = parse_amount("activos", &raw)?;

        let Some(raw) = self.prompt("Valor Cartera (COP): ")? else { return Ok(None) };
        let receivables = parse_amount("cartera", &raw)?;

        let Some(raw) = self.prompt("Valor Deudas (COP): ")? else { return Ok(None) };
        let debt = parse_amount("deudas", &raw)?;

        Ok(Some((
            sector,
            Financials {
                annual_value,
                profit,
                employee_count,
                assets,
                receivables,
                debt,
            },
        )))
    }

    fn cancel_registration(&mut self) -> Result<()> {
        writeln!(self.output, "Registro cancelado.")?;
        Ok(())
    }

    // =============================
    // Free text
    // =============================

    fn answer(&mut self, text: &str) -> Result<()> {
        let intent = IntentClassifier::classify(text, self.store.names());
        debug!(?intent, "Classified free text");

        let reply = match intent {
            Intent::Company { name, question } => match self.store.get(&name) {
                Some(profile) => match question {
                    CompanyQuestion::Indicators => report::indicator_summary(profile),
                    CompanyQuestion::Recommendations => report::recommendation_answer(profile),
                    CompanyQuestion::Report => report::full_report(profile),
                },
                None => format!("No se encontró la empresa '{}'.", name),
            },
            Intent::BestCompany => match self.store.best() {
                Some(profile) => report::extreme_summary(profile, Extreme::Best),
                None => NO_COMPANIES.to_string(),
            },
            Intent::WorstCompany => match self.store.worst() {
                Some(profile) => report::extreme_summary(profile, Extreme::Worst),
                None => NO_COMPANIES.to_string(),
            },
            Intent::CompanyCount => format!(
                "Hay {} empresas registradas en el sistema.",
                self.store.len()
            ),
            Intent::SectorBreakdown => {
                if self.store.is_empty() {
                    NO_COMPANIES.to_string()
                } else {
                    report::sector_summary(self.store.sector_counts())
                }
            }
            Intent::Unrecognized => NOT_UNDERSTOOD.to_string(),
        };

        writeln!(self.output, "{}", reply)?;
        Ok(())
    }

    // =============================
    // I/O helpers
    // =============================

    /// Trimmed line, or `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        self.read_line()
    }
}

/// User-facing line describing how the snapshot was loaded
pub fn load_message(status: &LoadStatus) -> String {
    match status {
        LoadStatus::Loaded(count) => format!("Se cargaron datos de {} empresas.", count),
        LoadStatus::Missing => {
            "No se encontró archivo de datos. Se iniciará con una base de datos vacía.".to_string()
        }
        LoadStatus::Failed(reason) => format!("Error al cargar datos: {}", reason),
    }
}

/// Currency amount in whole units; `,` and `.` are thousands separators and
/// are dropped. Only plain digits are accepted, so no exponents.
pub fn parse_amount(field: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();

    let invalid = || ChatError::InvalidNumber {
        field: field.to_string(),
        value: trimmed.to_string(),
    };

    if let Some(digits) = cleaned.strip_prefix('-') {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ChatError::NegativeAmount {
                field: field.to_string(),
                value: -digits.parse::<f64>().map_err(|_| invalid())?,
            });
        }
    }

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let value: f64 = cleaned.parse().map_err(|_| invalid())?;

    if !value.is_finite() {
        return Err(invalid());
    }

    Ok(value)
}

pub fn parse_count(field: &str, raw: &str) -> Result<u32> {
    raw.trim().parse().map_err(|_| ChatError::InvalidNumber {
        field: field.to_string(),
        value: raw.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    type TestSession = ChatSession<Cursor<Vec<u8>>, Vec<u8>>;

    fn session(dir: &TempDir, script: &str) -> TestSession {
        let store = CompanyStore::empty(dir.path().join("empresas.json"));
        ChatSession::new(
            store,
            Annotator::degraded(),
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
        )
    }

    fn output_of(session: &TestSession) -> String {
        String::from_utf8_lossy(session.output()).to_string()
    }

    fn registration(name: &str, sector: &str, annual: &str, profit: &str) -> String {
        format!(
            "nueva empresa\n{name}\n{annual}\n{profit}\n{sector}\n10\n200.000.000\n0\n100,000,000\n"
        )
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("x", "1.500.000").unwrap(), 1_500_000.0);
        assert_eq!(parse_amount("x", " 2,000 ").unwrap(), 2_000.0);
        assert_eq!(parse_amount("x", "0").unwrap(), 0.0);
        assert!(matches!(parse_amount("x", "abc"), Err(ChatError::InvalidNumber { .. })));
        assert!(matches!(parse_amount("x", ""), Err(ChatError::InvalidNumber { .. })));
        assert!(matches!(parse_amount("x", "inf"), Err(ChatError::InvalidNumber { .. })));
        assert!(matches!(parse_amount("x", "-5"), Err(ChatError::NegativeAmount { .. })));
        assert!(matches!(parse_amount("x", "-1.000"), Err(ChatError::NegativeAmount { .. })));
    }

    #[test]
    fn test_parse_amount_rejects_exponents_and_signs() {
        for raw in ["1e-300", "1e10", "1E5", "+5", "NaN", "12 000", "-"] {
            assert!(
                matches!(parse_amount("x", raw), Err(ChatError::InvalidNumber { .. })),
                "input: {}",
                raw
            );
        }
    }

    #[test]
    fn test_overflowing_margin_keeps_snapshot_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let huge_profit = "9".repeat(308);
        let script = [
            registration("Vieja", "Comercio", "100", "10"),
            registration("Nueva", "Comercio", "1", &huge_profit),
        ]
        .concat();
        let mut chat = session(&dir, &script);
        chat.run().unwrap();

        let margin = chat.store().get("Nueva").unwrap().analysis.indicators.profit_margin_pct;
        assert!(margin.is_infinite());

        let raw = fs::read_to_string(dir.path().join("empresas.json")).unwrap();
        assert!(!raw.contains("null"));

        let (reloaded, status) = CompanyStore::load(dir.path().join("empresas.json"));
        assert_eq!(status, LoadStatus::Loaded(2));
        assert_eq!(reloaded.get("Vieja"), chat.store().get("Vieja"));
        assert_eq!(reloaded.get("Nueva"), chat.store().get("Nueva"));
    }

    #[test]
    fn test_save_failure_is_reported_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let store = CompanyStore::empty(dir.path().join("sin-carpeta").join("empresas.json"));
        let script = [
            registration("Alfa", "Comercio", "100", "10"),
            "listar
".to_string(),
            "salir
".to_string(),
        ]
        .concat();
        let mut chat = ChatSession::new(
            store,
            Annotator::degraded(),
            Cursor::new(script.into_bytes()),
            Vec::new(),
        );

        chat.run().unwrap();

        let out = output_of(&chat);
        assert!(out.contains("Error al guardar datos:"));
        assert!(!out.contains("Datos guardados correctamente."));
        // the profile stays in memory and the session keeps answering
        assert_eq!(chat.store().len(), 1);
        assert!(out.contains("=== EMPRESAS REGISTRADAS ==="));
        assert!(out.contains("¡Hasta pronto!"));
        assert!(!dir.path().join("sin-carpeta").exists());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("x", "12").unwrap(), 12);
        assert!(parse_count("x", "doce").is_err());
        assert!(parse_count("x", "-1").is_err());
    }

    #[test]
    fn test_register_company() {
        let dir = tempfile::tempdir().unwrap();
        let script = registration("Ferretería Andina", "Construcción", "500.000.000", "50.000.000");
        let mut chat = session(&dir, &script);

        chat.run().unwrap();

        let profile = chat.store().get("Ferretería Andina").unwrap();
        assert_eq!(profile.employee_count, 10);
        assert_eq!(profile.analysis.score, 65);
        assert!(dir.path().join("empresas.json").exists());

        let out = output_of(&chat);
        assert!(out.contains("Puntuación: 65/100"));
        assert!(out.contains("Empresa 'Ferretería Andina' registrada correctamente."));
        assert!(out.contains("Categoría financiera: Buena"));
        assert!(out.contains("¡Hasta pronto!"));
    }

    #[test]
    fn test_non_numeric_entry_aborts_registration() {
        let dir = tempfile::tempdir().unwrap();
        let mut chat = session(&dir, "nueva empresa\nAlfa\nabc\nlistar\nsalir\n");

        chat.run().unwrap();

        assert!(chat.store().is_empty());
        assert!(!dir.path().join("empresas.json").exists());

        let out = output_of(&chat);
        assert!(out.contains("Error: Por favor ingrese valores numéricos válidos."));
        // the loop keeps going after the failed attempt
        assert!(out.contains(NO_COMPANIES));
        assert!(out.contains("¡Hasta pronto!"));
    }

    #[test]
    fn test_count_question() {
        let dir = tempfile::tempdir().unwrap();
        let script = [
            registration("Alfa", "Comercio", "100", "10"),
            registration("Beta", "Comercio", "100", "10"),
            registration("Gamma", "Salud", "100", "10"),
            "cuántas empresas hay\n".to_string(),
        ]
        .concat();
        let mut chat = session(&dir, &script);

        chat.run().unwrap();

        assert_eq!(chat.store().len(), 3);
        assert!(output_of(&chat).contains("Hay 3 empresas registradas en el sistema."));
    }

    #[test]
    fn test_update_keeps_registration_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut chat = session(&dir, &registration("Alfa", "Comercio", "100", "10"));
        chat.run().unwrap();
        let first = chat.store().get("Alfa").unwrap().registered_at;

        let store = CompanyStore::load(dir.path().join("empresas.json")).0;
        let script = "nueva empresa\nAlfa\ns\n900\n300\nServicios\n3\n50\n0\n10\n";
        let mut chat = ChatSession::new(
            store,
            Annotator::degraded(),
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
        );
        chat.run().unwrap();

        let updated = chat.store().get("Alfa").unwrap();
        assert_eq!(updated.registered_at, first);
        assert_eq!(updated.sector, "Servicios");
        assert_eq!(updated.annual_value, 900.0);
        assert_eq!(chat.store().len(), 1);
    }

    #[test]
    fn test_declining_update_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let script = [
            registration("Alfa", "Comercio", "100", "10"),
            "nueva empresa\nAlfa\nn\n".to_string(),
        ]
        .concat();
        let mut chat = session(&dir, &script);
        chat.run().unwrap();

        assert_eq!(chat.store().get("Alfa").unwrap().sector, "Comercio");
        assert!(output_of(&chat).contains("Registro cancelado."));
    }

    #[test]
    fn test_search_and_analyze() {
        let dir = tempfile::tempdir().unwrap();
        let script = [
            registration("Alfa Logística", "Transporte", "100", "10"),
            "buscar TRANSPORTE\n".to_string(),
            "buscar minería\n".to_string(),
            "analizar alfa\n".to_string(),
            "analizar Alfa Logística\n".to_string(),
        ]
        .concat();
        let mut chat = session(&dir, &script);
        chat.run().unwrap();

        let out = output_of(&chat);
        assert!(out.contains("=== RESULTADOS DE BÚSQUEDA PARA 'transporte' ==="));
        assert!(out.contains("No se encontraron empresas con el término 'minería'."));
        assert!(out.contains("No se encontró la empresa 'alfa'."));
        assert!(out.contains("Quizás quiso decir:\n- Alfa Logística"));
        assert!(out.contains("ANÁLISIS FINANCIERO Y NLP DE ALFA LOGÍSTICA"));
    }

    #[test]
    fn test_free_text_questions() {
        let dir = tempfile::tempdir().unwrap();
        let script = [
            registration("Alfa", "Comercio", "100", "0"),
            registration("Beta", "Salud", "100", "50"),
            "¿cuál es la mejor empresa?\n".to_string(),
            "¿y la peor empresa?\n".to_string(),
            "indicadores de beta\n".to_string(),
            "recomendaciones para alfa\n".to_string(),
            "sectores\n".to_string(),
            "hola\n".to_string(),
        ]
        .concat();
        let mut chat = session(&dir, &script);
        chat.run().unwrap();

        let out = output_of(&chat);
        assert!(out.contains("La empresa con mejor salud financiera es: Beta"));
        assert!(out.contains("La empresa con salud financiera más baja es: Alfa"));
        assert!(out.contains("Indicadores financieros de Beta:"));
        assert!(out.contains("RECOMENDACIONES PARA ALFA:"));
        assert!(out.contains("• Comercio: 1 empresas"));
        assert!(out.contains("• Salud: 1 empresas"));
        assert!(out.contains(NOT_UNDERSTOOD));
    }

    #[test]
    fn test_empty_store_answers() {
        let dir = tempfile::tempdir().unwrap();
        let mut chat = session(&dir, "listar\nbuscar x\nmejor empresa\nsectores\nayuda\nsalir\n");
        chat.run().unwrap();

        let out = output_of(&chat);
        assert_eq!(out.matches(NO_COMPANIES).count(), 4);
        assert!(out.contains("=== COMANDOS DISPONIBLES ==="));
    }

    #[test]
    fn test_load_message() {
        assert_eq!(load_message(&LoadStatus::Loaded(2)), "Se cargaron datos de 2 empresas.");
        assert!(load_message(&LoadStatus::Missing).contains("base de datos vacía"));
        assert!(load_message(&LoadStatus::Failed("boom".to_string())).contains("boom"));
    }

    #[test]
    fn test_saved_snapshot_matches_session_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut chat = session(&dir, &registration("Alfa", "Comercio", "100", "10"));
        chat.run().unwrap();

        let raw = fs::read_to_string(dir.path().join("empresas.json")).unwrap();
        assert!(raw.contains("\"Alfa\""));
        let (reloaded, status) = CompanyStore::load(dir.path().join("empresas.json"));
        assert_eq!(status, LoadStatus::Loaded(1));
        assert_eq!(reloaded.get("Alfa"), chat.store().get("Alfa"));
    }
}
