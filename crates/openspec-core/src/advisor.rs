// ABOUTME: Builds the ordered optimization suggestion list from a compliance report
// ABOUTME: Order is detection order: error handling, security, feedback, spec conformance, generic

use crate::types::{
    ComplianceIssue, ComplianceReport, SpecRequirements, Suggestion, SuggestionCategory,
    SuggestionList,
};

/// Reports scoring below this get the generic error-handling and validation advice.
pub const ADVICE_SCORE_THRESHOLD: u8 = 80;

pub const ERROR_HANDLING_SUGGESTION: &str = "添加统一的错误处理中间件";
pub const INPUT_VALIDATION_SUGGESTION: &str = "实现输入数据验证";
pub const PARAMETRIZED_QUERY_SUGGESTION: &str = "使用参数化查询防止SQL注入";
pub const DATA_ACCESS_LAYER_SUGGESTION: &str = "实现数据库访问层抽象";
pub const SPEC_CONFORMANCE_SUGGESTION: &str = "确保代码实现符合API规范";
pub const API_DOCUMENTATION_SUGGESTION: &str = "添加API文档注释";
pub const PERFORMANCE_SUGGESTION: &str = "优化数据库查询性能";
pub const DOCUMENTATION_SUGGESTION: &str = "添加代码注释和文档";
pub const CACHING_SUGGESTION: &str = "考虑添加缓存机制";

pub fn advise(
    report: &ComplianceReport,
    feedback: Option<&str>,
    spec: &SpecRequirements,
) -> SuggestionList {
    let mut suggestions = Vec::new();

    if report.compliance_score < ADVICE_SCORE_THRESHOLD {
        suggestions.push(Suggestion::new(
            SuggestionCategory::ErrorHandling,
            ERROR_HANDLING_SUGGESTION,
        ));
        suggestions.push(Suggestion::new(
            SuggestionCategory::InputValidation,
            INPUT_VALIDATION_SUGGESTION,
        ));
    }

    if report.has_issue(ComplianceIssue::SqlInjectionRisk) {
        suggestions.push(Suggestion::new(
            SuggestionCategory::SqlInjection,
            PARAMETRIZED_QUERY_SUGGESTION,
        ));
        suggestions.push(Suggestion::new(
            SuggestionCategory::DataAccessLayer,
            DATA_ACCESS_LAYER_SUGGESTION,
        ));
    }

    if let Some(feedback) = feedback.filter(|f| !f.trim().is_empty()) {
        suggestions.push(Suggestion::new(
            SuggestionCategory::Feedback,
            format!("根据反馈优化: {}", feedback),
        ));
    }

    if !spec.endpoints.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionCategory::SpecConformance,
            SPEC_CONFORMANCE_SUGGESTION,
        ));
        suggestions.push(Suggestion::new(
            SuggestionCategory::ApiDocumentation,
            API_DOCUMENTATION_SUGGESTION,
        ));
    }

    suggestions.push(Suggestion::new(
        SuggestionCategory::Performance,
        PERFORMANCE_SUGGESTION,
    ));
    suggestions.push(Suggestion::new(
        SuggestionCategory::Documentation,
        DOCUMENTATION_SUGGESTION,
    ));
    suggestions.push(Suggestion::new(
        SuggestionCategory::Caching,
        CACHING_SUGGESTION,
    ));

    suggestions
}
