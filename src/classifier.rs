//! Input classifier
//!
//! Classifies each input line as either:
//! - an explicit command (`salir`, `ayuda`, `nueva empresa`, `listar`,
//!   `buscar <term>`, `analizar <name>`)
//! - free text, matched against an ordered list of keyword rules where the
//!   first satisfied rule wins

/// Explicit commands, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    NewCompany,
    List,
    Search(String),
    Analyze(String),
    FreeText(String),
}

const SEARCH_PREFIX: &str = "buscar ";
const ANALYZE_PREFIX: &str = "analizar ";

impl Command {
    pub fn parse(line: &str) -> Command {
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "salir" => return Command::Quit,
            "ayuda" => return Command::Help,
            "nueva empresa" => return Command::NewCompany,
            "listar" => return Command::List,
            _ => {}
        }

        if let Some(term) = strip_prefix_ignore_case(input, SEARCH_PREFIX) {
            return Command::Search(term.trim().to_string());
        }

        if let Some(name) = strip_prefix_ignore_case(input, ANALYZE_PREFIX) {
            return Command::Analyze(name.trim().to_string());
        }

        Command::FreeText(input.to_string())
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        input.get(prefix.len()..)
    } else {
        None
    }
}

//
// ================= Free-text intents =================
//

/// What a question about one specific company asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyQuestion {
    Indicators,
    Recommendations,
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Company {
        name: String,
        question: CompanyQuestion,
    },
    BestCompany,
    WorstCompany,
    CompanyCount,
    SectorBreakdown,
    Unrecognized,
}

/// Static keyword lists, checked against the lowercased input
const INDICATOR_KEYWORDS: &[&str] = &["indicadores", "financi"];
const RECOMMENDATION_KEYWORDS: &[&str] = &["recomend"];

/// Rules for questions about the whole store, in priority order
const GENERAL_RULES: &[(&[&str], Intent)] = &[
    (&["mejor empresa", "empresa con mejor"], Intent::BestCompany),
    (&["peor empresa", "empresa con peor"], Intent::WorstCompany),
    (&["cuántas empresas", "número de empresas"], Intent::CompanyCount),
    (&["sectores"], Intent::SectorBreakdown),
];

pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify free text given the registered company names, in store order.
    ///
    /// A company named in the question always wins over general questions.
    pub fn classify<'a>(text: &str, company_names: impl IntoIterator<Item = &'a str>) -> Intent {
        let question = text.to_lowercase();

        let mentioned = company_names
            .into_iter()
            .filter(|name| !name.trim().is_empty())
            .find(|name| question.contains(&name.to_lowercase()));

        if let Some(name) = mentioned {
            let kind = if contains_any(&question, INDICATOR_KEYWORDS) {
                CompanyQuestion::Indicators
            } else if contains_any(&question, RECOMMENDATION_KEYWORDS) {
                CompanyQuestion::Recommendations
            } else {
                CompanyQuestion::Report
            };

            return Intent::Company {
                name: name.to_string(),
                question: kind,
            };
        }

        GENERAL_RULES
            .iter()
            .find(|(keywords, _)| contains_any(&question, keywords))
            .map(|(_, intent)| intent.clone())
            .unwrap_or(Intent::Unrecognized)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: &[&str] = &["Alfa", "Beta Servicios"];

    fn classify(text: &str) -> Intent {
        IntentClassifier::classify(text, NAMES.iter().copied())
    }

    #[test]
    fn test_commands() {
        let cases = vec![
            ("salir", Command::Quit),
            ("  SALIR ", Command::Quit),
            ("Ayuda", Command::Help),
            ("nueva EMPRESA", Command::NewCompany),
            ("listar", Command::List),
            ("buscar Textil", Command::Search("Textil".to_string())),
            ("BUSCAR   comercio ", Command::Search("comercio".to_string())),
            ("analizar Beta Servicios", Command::Analyze("Beta Servicios".to_string())),
        ];

        for (input, expected) in cases {
            assert_eq!(Command::parse(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_bare_keywords_fall_through_to_free_text() {
        assert_eq!(Command::parse("buscar"), Command::FreeText("buscar".to_string()));
        assert_eq!(Command::parse("listar todo"), Command::FreeText("listar todo".to_string()));
        assert_eq!(Command::parse("búsqueda"), Command::FreeText("búsqueda".to_string()));
    }

    #[test]
    fn test_company_questions() {
        assert_eq!(
            classify("¿cuáles son los indicadores de alfa?"),
            Intent::Company {
                name: "Alfa".to_string(),
                question: CompanyQuestion::Indicators
            }
        );
        assert_eq!(
            classify("situación financiera de BETA SERVICIOS"),
            Intent::Company {
                name: "Beta Servicios".to_string(),
                question: CompanyQuestion::Indicators
            }
        );
        assert_eq!(
            classify("dame recomendaciones para Alfa"),
            Intent::Company {
                name: "Alfa".to_string(),
                question: CompanyQuestion::Recommendations
            }
        );
        assert_eq!(
            classify("háblame de alfa"),
            Intent::Company {
                name: "Alfa".to_string(),
                question: CompanyQuestion::Report
            }
        );
    }

    #[test]
    fn test_company_mention_beats_general_rules() {
        assert!(matches!(
            classify("¿alfa es la mejor empresa?"),
            Intent::Company { .. }
        ));
    }

    #[test]
    fn test_general_rules_in_priority_order() {
        assert_eq!(classify("¿cuál es la mejor empresa?"), Intent::BestCompany);
        assert_eq!(classify("la empresa con peor salud"), Intent::WorstCompany);
        assert_eq!(classify("Cuántas empresas hay"), Intent::CompanyCount);
        assert_eq!(classify("número de empresas"), Intent::CompanyCount);
        assert_eq!(classify("muestra los sectores"), Intent::SectorBreakdown);
        // best wins over worst when both appear
        assert_eq!(classify("mejor empresa y peor empresa"), Intent::BestCompany);
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify("hola"), Intent::Unrecognized);
        assert_eq!(IntentClassifier::classify("sectores", std::iter::empty()), Intent::SectorBreakdown);
        assert_eq!(IntentClassifier::classify("", [""]), Intent::Unrecognized);
    }
}
