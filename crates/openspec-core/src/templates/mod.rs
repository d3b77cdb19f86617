// ABOUTME: Static spec/task template catalog keyed by project type
// ABOUTME: Custom bundles are synthesized from the requirement profile at call time

use tracing::debug;

use crate::types::{Complexity, ProjectType, RequirementProfile, TemplateBundle};

pub const BLOG_SPEC: &str = include_str!("blog_spec.md");
pub const BLOG_TASKS: &str = include_str!("blog_tasks.md");
pub const ECOMMERCE_SPEC: &str = include_str!("ecommerce_spec.md");
pub const ECOMMERCE_TASKS: &str = include_str!("ecommerce_tasks.md");
pub const USER_MANAGEMENT_SPEC: &str = include_str!("user_management_spec.md");
pub const USER_MANAGEMENT_TASKS: &str = include_str!("user_management_tasks.md");

const CUSTOM_SPEC_TEMPLATE: &str = include_str!("custom_spec.md");
const CUSTOM_TASKS_TEMPLATE: &str = include_str!("custom_tasks.md");

pub const NO_FEATURES_PLACEHOLDER: &str = "- 暂无显式特性";
pub const NO_FEATURE_TASKS_PLACEHOLDER: &str = "- [ ] 识别核心功能并分解任务";

/// One static catalog entry.
struct CatalogEntry {
    project_type: ProjectType,
    name: &'static str,
    spec: &'static str,
    tasks: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        project_type: ProjectType::Blog,
        name: "博客系统",
        spec: BLOG_SPEC,
        tasks: BLOG_TASKS,
    },
    CatalogEntry {
        project_type: ProjectType::Ecommerce,
        name: "电商平台",
        spec: ECOMMERCE_SPEC,
        tasks: ECOMMERCE_TASKS,
    },
    CatalogEntry {
        project_type: ProjectType::UserManagement,
        name: "用户管理系统",
        spec: USER_MANAGEMENT_SPEC,
        tasks: USER_MANAGEMENT_TASKS,
    },
];

/// Static bundle for a known project type; `None` for types without one.
pub fn lookup(project_type: ProjectType) -> Option<TemplateBundle> {
    CATALOG
        .iter()
        .find(|entry| entry.project_type == project_type)
        .map(|entry| TemplateBundle {
            name: entry.name.to_string(),
            spec_text: entry.spec.to_string(),
            tasks_text: entry.tasks.to_string(),
        })
}

/// Project types that have a static bundle.
pub fn known_types() -> Vec<ProjectType> {
    CATALOG.iter().map(|entry| entry.project_type).collect()
}

/// Build the `custom` bundle from a profile.
pub fn synthesize(profile: &RequirementProfile) -> TemplateBundle {
    let feature_list = if profile.features.is_empty() {
        NO_FEATURES_PLACEHOLDER.to_string()
    } else {
        profile
            .features
            .iter()
            .map(|f| format!("- {}", f))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let feature_tasks = if profile.features.is_empty() {
        NO_FEATURE_TASKS_PLACEHOLDER.to_string()
    } else {
        profile
            .features
            .iter()
            .map(|f| format!("- [ ] 针对特性：{}", f))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let estimate = ComplexityEstimate::for_complexity(profile.complexity);

    // Description goes in last so user text cannot inject placeholders.
    let spec_text = CUSTOM_SPEC_TEMPLATE
        .replace("{{generated_at}}", &profile.created_at.to_rfc3339())
        .replace("{{complexity}}", profile.complexity.as_str())
        .replace("{{project_type}}", profile.project_type.as_str())
        .replace("{{feature_list}}", &feature_list)
        .replace("{{description}}", &profile.description);

    let tasks_text = CUSTOM_TASKS_TEMPLATE
        .replace("{{complexity}}", profile.complexity.as_str())
        .replace("{{estimated_effort}}", estimate.effort)
        .replace("{{technical_risk}}", estimate.risk)
        .replace("{{team_size}}", estimate.team_size)
        .replace("{{feature_tasks}}", &feature_tasks);

    TemplateBundle {
        name: "自定义项目".to_string(),
        spec_text,
        tasks_text,
    }
}

/// Total selection: static bundle when one exists, otherwise synthesized.
pub fn resolve(project_type: ProjectType, profile: &RequirementProfile) -> TemplateBundle {
    match lookup(project_type) {
        Some(bundle) => {
            debug!("Selected template: {}", bundle.name);
            bundle
        }
        None => {
            debug!("No static template for {}, synthesizing", project_type);
            synthesize(profile)
        }
    }
}

/// Effort/risk/team estimates printed in custom task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityEstimate {
    pub effort: &'static str,
    pub risk: &'static str,
    pub team_size: &'static str,
}

impl ComplexityEstimate {
    pub fn for_complexity(complexity: Complexity) -> Self {
        match complexity {
            Complexity::Simple => Self {
                effort: "2-4周",
                risk: "低",
                team_size: "1-2人",
            },
            Complexity::Medium => Self {
                effort: "4-8周",
                risk: "低",
                team_size: "2-3人",
            },
            Complexity::Complex => Self {
                effort: "8-12周",
                risk: "中等",
                team_size: "3-5人",
            },
        }
    }
}
