// ABOUTME: Heuristic compliance scoring of a code string with an additive penalty model
// ABOUTME: Reproducible lint over substrings, not semantic analysis; false positives are expected

use tracing::debug;

use crate::types::{ComplexityBand, ComplianceIssue, ComplianceReport, SpecRequirements};

pub const BASE_SCORE: i32 = 70;

/// One penalty rule: the issue it raises and its cost.
#[derive(Debug, Clone, Copy)]
struct Penalty {
    issue: ComplianceIssue,
    cost: i32,
}

const ERROR_HANDLING: Penalty = Penalty {
    issue: ComplianceIssue::MissingErrorHandling,
    cost: 15,
};
const INPUT_VALIDATION: Penalty = Penalty {
    issue: ComplianceIssue::MissingInputValidation,
    cost: 10,
};
const SQL_INJECTION: Penalty = Penalty {
    issue: ComplianceIssue::SqlInjectionRisk,
    cost: 20,
};
const STRUCTURE: Penalty = Penalty {
    issue: ComplianceIssue::NeedsStructuralRefactor,
    cost: 5,
};

const STRUCTURE_LENGTH_THRESHOLD: usize = 1000;
const HIGH_BAND_LINES: usize = 50;
const MEDIUM_BAND_LINES: usize = 20;

/// Score `code` and list the issues found.
pub fn analyze(code: &str, spec: &SpecRequirements) -> ComplianceReport {
    let mut score = BASE_SCORE;
    let mut issues = Vec::new();

    let mut apply = |penalty: Penalty| {
        issues.push(penalty.issue);
        score -= penalty.cost;
    };

    if !(code.contains("try") && code.contains("catch")) {
        apply(ERROR_HANDLING);
    }

    if !code.contains("validate") && !code.contains("validation") {
        apply(INPUT_VALIDATION);
    }

    if code.contains("SELECT * FROM") && code.contains('+') {
        apply(SQL_INJECTION);
    }

    if code.chars().count() > STRUCTURE_LENGTH_THRESHOLD
        && !code.contains("function")
        && !code.contains("class")
    {
        apply(STRUCTURE);
    }

    if issues.is_empty() {
        issues.push(ComplianceIssue::QualityGood);
    }

    let line_count = line_count(code);
    let compliance_score = score.clamp(0, 100) as u8;

    debug!(
        "Compliance analysis: score={} issues={} lines={} spec_endpoints={}",
        compliance_score,
        issues.len(),
        line_count,
        spec.endpoints.len()
    );

    ComplianceReport {
        compliance_score,
        issues,
        complexity_band: complexity_band(line_count),
        line_count,
    }
}

/// Number of `\n`-separated segments; the empty string is one line.
pub fn line_count(code: &str) -> usize {
    code.split('\n').count()
}

pub fn complexity_band(line_count: usize) -> ComplexityBand {
    if line_count > HIGH_BAND_LINES {
        ComplexityBand::High
    } else if line_count > MEDIUM_BAND_LINES {
        ComplexityBand::Medium
    } else {
        ComplexityBand::Low
    }
}
