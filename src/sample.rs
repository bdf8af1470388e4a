//! Built-in sample data set, used until a real report feed is wired in.

use chrono::{DateTime, Local};

use crate::model::{Category, Criticality, FileCheckResult, ReconciliationReport};

const SAMPLE_ROOT: &str = r"C:\Conciliacoes";

struct SampleCheck {
    stem: &'static str,
    dir: &'static str,
    criticality: Criticality,
    category: Category,
    description: &'static str,
}

const SAMPLE_CHECKS: [SampleCheck; 9] = [
    SampleCheck {
        stem: "Rentabilidade_Carteira_A",
        dir: r"Rentabilidade\Carteira_A",
        criticality: Criticality::High,
        category: Category::Profitability,
        description: "Portfolio A profitability reconciliation",
    },
    SampleCheck {
        stem: "Rentabilidade_Carteira_B",
        dir: r"Rentabilidade\Carteira_B",
        criticality: Criticality::High,
        category: Category::Profitability,
        description: "Portfolio B profitability reconciliation",
    },
    SampleCheck {
        stem: "Rentabilidade_Consolidada",
        dir: r"Rentabilidade\Consolidado",
        criticality: Criticality::Critical,
        category: Category::Profitability,
        description: "Consolidated profitability reconciliation",
    },
    SampleCheck {
        stem: "IR_Retido_Fonte",
        dir: r"Impostos\IR",
        criticality: Criticality::High,
        category: Category::Taxes,
        description: "Withholding income tax reconciliation",
    },
    SampleCheck {
        stem: "IOF_Operacoes",
        dir: r"Impostos\IOF",
        criticality: Criticality::Medium,
        category: Category::Taxes,
        description: "IOF on operations reconciliation",
    },
    SampleCheck {
        stem: "PIS_COFINS",
        dir: r"Impostos\PIS_COFINS",
        criticality: Criticality::Medium,
        category: Category::Taxes,
        description: "PIS/COFINS reconciliation",
    },
    SampleCheck {
        stem: "Custodia_Titulos",
        dir: "Custodia",
        criticality: Criticality::Medium,
        category: Category::Other,
        description: "Securities custody reconciliation",
    },
    SampleCheck {
        stem: "Liquidacao_D0",
        dir: "Liquidacao",
        criticality: Criticality::High,
        category: Category::Other,
        description: "D+0 settlement reconciliation",
    },
    SampleCheck {
        stem: "Fechamento_Dia",
        dir: "Fechamento",
        criticality: Criticality::Critical,
        category: Category::Other,
        description: "End-of-day closing reconciliation",
    },
];

/// The nine expected files for `date`, all marked as not found.
pub fn sample_report(date: DateTime<Local>) -> ReconciliationReport {
    let stamp = date.format("%Y%m%d").to_string();
    let items = SAMPLE_CHECKS
        .iter()
        .map(|check| {
            let file_name = format!("{}_{}.xlsx", check.stem, stamp);
            FileCheckResult {
                full_path: format!(r"{}\{}\{}", SAMPLE_ROOT, check.dir, file_name),
                file_name,
                exists: false,
                criticality: check.criticality,
                category: check.category,
                description: check.description.to_string(),
                modified_at: None,
                size_bytes: None,
            }
        })
        .collect();
    ReconciliationReport::new(date, items)
}
