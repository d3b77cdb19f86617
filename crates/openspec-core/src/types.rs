// ABOUTME: Shared data model for requirement profiles, templates, parsed specs and compliance reports
// ABOUTME: Every value is built fresh per call and never persisted

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::OpenSpecError;

/// Coarse project category driving template selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Blog,
    Ecommerce,
    Social,
    Enterprise,
    UserManagement,
    Custom,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Blog => "blog",
            ProjectType::Ecommerce => "ecommerce",
            ProjectType::Social => "social",
            ProjectType::Enterprise => "enterprise",
            ProjectType::UserManagement => "user_management",
            ProjectType::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blog" => Some(ProjectType::Blog),
            "ecommerce" => Some(ProjectType::Ecommerce),
            "social" => Some(ProjectType::Social),
            "enterprise" => Some(ProjectType::Enterprise),
            "user_management" => Some(ProjectType::UserManagement),
            "custom" => Some(ProjectType::Custom),
            _ => None,
        }
    }

    /// Unknown names fall back to `custom`, whose bundle is always synthesized.
    pub fn parse_or_custom(s: &str) -> Self {
        Self::parse(s).unwrap_or(ProjectType::Custom)
    }

    pub fn all() -> Vec<Self> {
        vec![
            ProjectType::Blog,
            ProjectType::Ecommerce,
            ProjectType::Social,
            ProjectType::Enterprise,
            ProjectType::UserManagement,
            ProjectType::Custom,
        ]
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = OpenSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            OpenSpecError::InvalidArgument(format!(
                "unknown project type '{}' (expected one of: {})",
                s,
                Self::all()
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }
}

/// Fine-grained capability label from a closed vocabulary.
///
/// Declaration order is the iteration order of a feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureTag {
    UserManagement,
    Authentication,
    Registration,
    ContentManagement,
    Blogging,
    CommentSystem,
    ProductManagement,
    ShoppingCart,
    OrderManagement,
    PaymentProcessing,
    PermissionSystem,
    RoleManagement,
    FileUpload,
    ImageProcessing,
    SearchFunctionality,
    Filtering,
    Sorting,
    Pagination,
    Caching,
    EmailNotification,
    SmsNotification,
    RealTime,
    ApiIntegration,
    ThirdPartyIntegration,
}

impl FeatureTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureTag::UserManagement => "user_management",
            FeatureTag::Authentication => "authentication",
            FeatureTag::Registration => "registration",
            FeatureTag::ContentManagement => "content_management",
            FeatureTag::Blogging => "blogging",
            FeatureTag::CommentSystem => "comment_system",
            FeatureTag::ProductManagement => "product_management",
            FeatureTag::ShoppingCart => "shopping_cart",
            FeatureTag::OrderManagement => "order_management",
            FeatureTag::PaymentProcessing => "payment_processing",
            FeatureTag::PermissionSystem => "permission_system",
            FeatureTag::RoleManagement => "role_management",
            FeatureTag::FileUpload => "file_upload",
            FeatureTag::ImageProcessing => "image_processing",
            FeatureTag::SearchFunctionality => "search_functionality",
            FeatureTag::Filtering => "filtering",
            FeatureTag::Sorting => "sorting",
            FeatureTag::Pagination => "pagination",
            FeatureTag::Caching => "caching",
            FeatureTag::EmailNotification => "email_notification",
            FeatureTag::SmsNotification => "sms_notification",
            FeatureTag::RealTime => "real_time",
            FeatureTag::ApiIntegration => "api_integration",
            FeatureTag::ThirdPartyIntegration => "third_party_integration",
        }
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a free-text description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub project_type: ProjectType,
    pub description: String,
    pub features: BTreeSet<FeatureTag>,
    pub complexity: Complexity,
    pub created_at: DateTime<Utc>,
}

/// Paired specification and task-list documents for one project type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateBundle {
    pub name: String,
    pub spec_text: String,
    pub tasks_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub method: HttpMethod,
    pub path: String,
    pub section: String,
}

/// Data model block found inside a fenced code block of a spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub name: String,
    pub fields: Vec<String>,
    pub section: String,
}

/// Everything the spec parser extracts from a specification body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecRequirements {
    pub endpoints: Vec<EndpointRecord>,
    pub models: Vec<ModelRecord>,
    /// Section title -> requirement bullet items, in appearance order.
    pub requirements: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityBand {
    Low,
    Medium,
    High,
}

impl ComplexityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityBand::Low => "low",
            ComplexityBand::Medium => "medium",
            ComplexityBand::High => "high",
        }
    }
}

impl fmt::Display for ComplexityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceIssue {
    MissingErrorHandling,
    MissingInputValidation,
    SqlInjectionRisk,
    NeedsStructuralRefactor,
    QualityGood,
}

impl ComplianceIssue {
    pub fn message(&self) -> &'static str {
        match self {
            ComplianceIssue::MissingErrorHandling => "需要添加错误处理",
            ComplianceIssue::MissingInputValidation => "缺少输入验证",
            ComplianceIssue::SqlInjectionRisk => "存在SQL注入风险",
            ComplianceIssue::NeedsStructuralRefactor => "代码结构需要优化",
            ComplianceIssue::QualityGood => "代码质量良好",
        }
    }
}

impl fmt::Display for ComplianceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Always within `0..=100`.
    pub compliance_score: u8,
    pub issues: Vec<ComplianceIssue>,
    pub complexity_band: ComplexityBand,
    pub line_count: usize,
}

impl ComplianceReport {
    pub fn has_issue(&self, issue: ComplianceIssue) -> bool {
        self.issues.contains(&issue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    ErrorHandling,
    InputValidation,
    SqlInjection,
    DataAccessLayer,
    Feedback,
    SpecConformance,
    ApiDocumentation,
    Performance,
    Documentation,
    Caching,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub text: String,
}

impl Suggestion {
    pub fn new(category: SuggestionCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Presentation-ordered advice; order is detection order, not severity.
pub type SuggestionList = Vec<Suggestion>;

pub fn fired(suggestions: &[Suggestion], category: SuggestionCategory) -> bool {
    suggestions.iter().any(|s| s.category == category)
}
