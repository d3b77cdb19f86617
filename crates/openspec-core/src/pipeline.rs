// ABOUTME: End-to-end flows composed from the classifier, catalog, parser, analyzer, advisor and rewriter
// ABOUTME: Each flow is a pure function of its inputs plus the clock

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advisor::advise;
use crate::classifier::classify;
use crate::compliance::analyze;
use crate::rewriter::rewrite_at;
use crate::spec_parser::parse;
use crate::templates::resolve;
use crate::types::{
    ComplianceReport, ProjectType, RequirementProfile, SpecRequirements, SuggestionList,
    TemplateBundle,
};

/// Classified requirements together with the bundle chosen for them.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSpec {
    pub profile: RequirementProfile,
    pub bundle: TemplateBundle,
}

/// Classify `requirements` and pick its template bundle. An explicit type
/// replaces the classified one before selection.
pub fn generate_spec(requirements: &str, explicit_type: Option<ProjectType>) -> GeneratedSpec {
    let mut profile = classify(requirements);
    if let Some(project_type) = explicit_type {
        if project_type != profile.project_type {
            debug!(
                "Overriding classified type {} with {}",
                profile.project_type, project_type
            );
        }
        profile.project_type = project_type;
    }
    let bundle = resolve(profile.project_type, &profile);
    GeneratedSpec { profile, bundle }
}

/// Everything the optimization flow produces for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub spec: SpecRequirements,
    pub report: ComplianceReport,
    pub suggestions: SuggestionList,
    pub optimized_code: String,
}

pub fn optimize(code: &str, spec_text: &str, feedback: Option<&str>) -> OptimizationOutcome {
    optimize_at(code, spec_text, feedback, Utc::now())
}

/// parse -> analyze -> advise -> rewrite, with a fixed header timestamp.
pub fn optimize_at(
    code: &str,
    spec_text: &str,
    feedback: Option<&str>,
    timestamp: DateTime<Utc>,
) -> OptimizationOutcome {
    let spec = parse(spec_text);
    let report = analyze(code, &spec);
    let suggestions = advise(&report, feedback, &spec);
    let optimized_code = rewrite_at(code, &suggestions, timestamp);

    OptimizationOutcome {
        spec,
        report,
        suggestions,
        optimized_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SuggestionCategory;
    use chrono::TimeZone;

    #[test]
    fn explicit_type_selects_static_bundle() {
        let generated = generate_spec("随便做点什么", Some(ProjectType::Blog));
        assert_eq!(generated.profile.project_type, ProjectType::Blog);
        assert_eq!(generated.bundle.name, "博客系统");
    }

    #[test]
    fn explicit_type_without_bundle_is_synthesized_under_that_type() {
        let generated = generate_spec("一个博客", Some(ProjectType::Social));
        assert_eq!(generated.bundle.name, "自定义项目");
        assert!(generated.bundle.spec_text.contains("social"));
    }

    #[test]
    fn classified_type_is_used_without_override() {
        let generated = generate_spec("电商购物网站", None);
        assert_eq!(generated.profile.project_type, ProjectType::Ecommerce);
        assert_eq!(generated.bundle.name, "电商平台");
    }

    #[test]
    fn optimize_runs_every_stage() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let outcome = optimize_at(
            "const q = \"SELECT * FROM users WHERE id = '\" + id + \"'\";",
            "## API\n- `GET /api/users`\n",
            None,
            at,
        );
        assert_eq!(outcome.spec.endpoints.len(), 1);
        assert_eq!(outcome.report.compliance_score, 25);
        assert_eq!(
            outcome.suggestions.first().map(|s| s.category),
            Some(SuggestionCategory::ErrorHandling)
        );
        assert!(outcome.optimized_code.starts_with("/**\n * Optimized function"));
        assert!(outcome.optimized_code.contains("try {"));
        assert!(outcome.optimized_code.contains("// Input validation"));
        assert!(outcome
            .optimized_code
            .contains("SELECT * FROM users WHERE id = \" + id + \""));
    }
}
