// ABOUTME: Keyword-table classifier turning a free-text description into a RequirementProfile
// ABOUTME: Project type is first-match-wins over table order; features collect every match

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::debug;

use crate::types::{Complexity, FeatureTag, ProjectType, RequirementProfile};

/// Project-type keywords. Table order decides ambiguous descriptions, so
/// entries must never be reordered. English aliases stay behind the Chinese
/// table so they cannot change existing outcomes.
pub const PROJECT_TYPE_KEYWORDS: &[(&str, ProjectType)] = &[
    ("博客", ProjectType::Blog),
    ("文章", ProjectType::Blog),
    ("写作", ProjectType::Blog),
    ("电商", ProjectType::Ecommerce),
    ("商店", ProjectType::Ecommerce),
    ("购物", ProjectType::Ecommerce),
    ("订单", ProjectType::Ecommerce),
    ("支付", ProjectType::Ecommerce),
    ("社交", ProjectType::Social),
    ("社区", ProjectType::Social),
    ("论坛", ProjectType::Social),
    ("聊天", ProjectType::Social),
    ("企业", ProjectType::Enterprise),
    ("公司", ProjectType::Enterprise),
    ("管理", ProjectType::Enterprise),
    ("用户", ProjectType::UserManagement),
    ("登录", ProjectType::UserManagement),
    ("注册", ProjectType::UserManagement),
    ("认证", ProjectType::UserManagement),
    ("权限", ProjectType::UserManagement),
    ("blog", ProjectType::Blog),
    ("article", ProjectType::Blog),
    ("e-commerce", ProjectType::Ecommerce),
    ("ecommerce", ProjectType::Ecommerce),
    ("shop", ProjectType::Ecommerce),
    ("store", ProjectType::Ecommerce),
    ("order", ProjectType::Ecommerce),
    ("payment", ProjectType::Ecommerce),
    ("social", ProjectType::Social),
    ("community", ProjectType::Social),
    ("forum", ProjectType::Social),
    ("chat", ProjectType::Social),
    ("enterprise", ProjectType::Enterprise),
    ("company", ProjectType::Enterprise),
    ("user", ProjectType::UserManagement),
    ("login", ProjectType::UserManagement),
    ("register", ProjectType::UserManagement),
    ("auth", ProjectType::UserManagement),
    ("permission", ProjectType::UserManagement),
];

pub const FEATURE_KEYWORDS: &[(&str, FeatureTag)] = &[
    ("用户", FeatureTag::UserManagement),
    ("登录", FeatureTag::Authentication),
    ("注册", FeatureTag::Registration),
    ("文章", FeatureTag::ContentManagement),
    ("博客", FeatureTag::Blogging),
    ("评论", FeatureTag::CommentSystem),
    ("商品", FeatureTag::ProductManagement),
    ("购物车", FeatureTag::ShoppingCart),
    ("订单", FeatureTag::OrderManagement),
    ("支付", FeatureTag::PaymentProcessing),
    ("权限", FeatureTag::PermissionSystem),
    ("角色", FeatureTag::RoleManagement),
    ("文件", FeatureTag::FileUpload),
    ("图片", FeatureTag::ImageProcessing),
    ("搜索", FeatureTag::SearchFunctionality),
    ("过滤", FeatureTag::Filtering),
    ("排序", FeatureTag::Sorting),
    ("分页", FeatureTag::Pagination),
    ("缓存", FeatureTag::Caching),
    ("邮件", FeatureTag::EmailNotification),
    ("短信", FeatureTag::SmsNotification),
    ("实时", FeatureTag::RealTime),
    ("API", FeatureTag::ApiIntegration),
    ("第三方", FeatureTag::ThirdPartyIntegration),
    ("user", FeatureTag::UserManagement),
    ("login", FeatureTag::Authentication),
    ("register", FeatureTag::Registration),
    ("sign up", FeatureTag::Registration),
    ("article", FeatureTag::ContentManagement),
    ("blog", FeatureTag::Blogging),
    ("comment", FeatureTag::CommentSystem),
    ("product", FeatureTag::ProductManagement),
    ("cart", FeatureTag::ShoppingCart),
    ("order", FeatureTag::OrderManagement),
    ("payment", FeatureTag::PaymentProcessing),
    ("permission", FeatureTag::PermissionSystem),
    ("role", FeatureTag::RoleManagement),
    ("upload", FeatureTag::FileUpload),
    ("image", FeatureTag::ImageProcessing),
    ("search", FeatureTag::SearchFunctionality),
    ("filter", FeatureTag::Filtering),
    ("sort", FeatureTag::Sorting),
    ("pagination", FeatureTag::Pagination),
    ("cache", FeatureTag::Caching),
    ("email", FeatureTag::EmailNotification),
    ("sms", FeatureTag::SmsNotification),
    ("real-time", FeatureTag::RealTime),
    ("realtime", FeatureTag::RealTime),
    ("third-party", FeatureTag::ThirdPartyIntegration),
];

/// Checked before the simple signals; matched literally.
pub const COMPLEX_SIGNALS: &[&str] = &[
    "复杂",
    "高级",
    "企业",
    "分布式",
    "微服务",
    "大型",
    "多用户",
    "高并发",
    "complex",
    "enterprise",
    "distributed",
    "microservice",
    "large-scale",
    "multi-user",
    "high-concurrency",
];

pub const SIMPLE_SIGNALS: &[&str] = &[
    "简单",
    "基础",
    "入门",
    "快速",
    "小型",
    "单用户",
    "演示",
    "simple",
    "basic",
    "beginner",
    "quick",
    "small",
    "single-user",
    "demo",
];

/// Classify a description, stamping the profile with the current time.
pub fn classify(description: &str) -> RequirementProfile {
    classify_at(description, Utc::now())
}

pub fn classify_at(description: &str, created_at: DateTime<Utc>) -> RequirementProfile {
    let project_type = detect_project_type(description);
    let features = extract_features(description);
    let complexity = assess_complexity(description);

    debug!(
        "Classified description ({} chars) as {} / {} with {} features",
        description.chars().count(),
        project_type,
        complexity,
        features.len()
    );

    RequirementProfile {
        project_type,
        description: description.to_string(),
        features,
        complexity,
        created_at,
    }
}

pub fn detect_project_type(description: &str) -> ProjectType {
    let haystack = description.to_lowercase();
    PROJECT_TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, project_type)| *project_type)
        .unwrap_or(ProjectType::Custom)
}

pub fn extract_features(description: &str) -> BTreeSet<FeatureTag> {
    let haystack = description.to_lowercase();
    FEATURE_KEYWORDS
        .iter()
        .filter(|(keyword, _)| haystack.contains(&keyword.to_lowercase()))
        .map(|(_, tag)| *tag)
        .collect()
}

pub fn assess_complexity(description: &str) -> Complexity {
    if COMPLEX_SIGNALS.iter().any(|s| description.contains(s)) {
        Complexity::Complex
    } else if SIMPLE_SIGNALS.iter().any(|s| description.contains(s)) {
        Complexity::Simple
    } else {
        Complexity::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_keywords_classify_as_blog() {
        for text in ["我想做一个博客", "写作平台", "发布文章的网站", "A personal blog"] {
            assert_eq!(detect_project_type(text), ProjectType::Blog, "{}", text);
        }
    }

    #[test]
    fn no_keywords_defaults_everything() {
        let profile = classify("一个计算器");
        assert_eq!(profile.project_type, ProjectType::Custom);
        assert!(profile.features.is_empty());
        assert_eq!(profile.complexity, Complexity::Medium);
    }

    #[test]
    fn empty_description_is_accepted() {
        let profile = classify("");
        assert_eq!(profile.project_type, ProjectType::Custom);
        assert!(profile.features.is_empty());
        assert_eq!(profile.complexity, Complexity::Medium);
        assert_eq!(profile.description, "");
    }

    #[test]
    fn first_table_entry_wins_regardless_of_text_position() {
        // 用户 appears first in the text, but 博客 is earlier in the table.
        assert_eq!(detect_project_type("用户可以写博客"), ProjectType::Blog);
        // 管理 (enterprise) precedes 用户 (user_management) in the table.
        assert_eq!(detect_project_type("用户管理系统"), ProjectType::Enterprise);
        // 订单 (ecommerce) precedes 企业 (enterprise).
        assert_eq!(detect_project_type("企业订单平台"), ProjectType::Ecommerce);
    }

    #[test]
    fn english_aliases_never_override_chinese_keywords() {
        assert_eq!(detect_project_type("user 博客"), ProjectType::Blog);
        assert_eq!(detect_project_type("Online STORE for shoes"), ProjectType::Ecommerce);
        assert_eq!(detect_project_type("user login portal"), ProjectType::UserManagement);
    }

    #[test]
    fn english_aliases_match_inside_words() {
        // Substring matching: these are known false positives.
        assert_eq!(detect_project_type("border color picker"), ProjectType::Ecommerce);
        assert_eq!(detect_project_type("restore backups nightly"), ProjectType::Ecommerce);
        assert_eq!(detect_project_type("author tools"), ProjectType::UserManagement);
        assert_eq!(detect_project_type("username checker"), ProjectType::UserManagement);
    }

    #[test]
    fn features_collect_every_match_without_duplicates() {
        let features = extract_features("用户登录注册，用户可以搜索文章并分页");
        let tags: Vec<_> = features.iter().copied().collect();
        assert_eq!(
            tags,
            vec![
                FeatureTag::UserManagement,
                FeatureTag::Authentication,
                FeatureTag::Registration,
                FeatureTag::ContentManagement,
                FeatureTag::SearchFunctionality,
                FeatureTag::Pagination,
            ]
        );
    }

    #[test]
    fn api_keyword_matches_case_insensitively() {
        assert!(extract_features("需要对接API").contains(&FeatureTag::ApiIntegration));
        assert!(extract_features("需要对接api").contains(&FeatureTag::ApiIntegration));
    }

    #[test]
    fn chinese_and_english_aliases_collapse_into_one_tag() {
        let features = extract_features("购物车 shopping cart");
        assert_eq!(features.len(), 1);
        assert!(features.contains(&FeatureTag::ShoppingCart));
    }

    #[test]
    fn complex_signal_beats_simple_signal() {
        assert_eq!(assess_complexity("一个简单的分布式系统"), Complexity::Complex);
        assert_eq!(assess_complexity("简单的演示项目"), Complexity::Simple);
        assert_eq!(assess_complexity("普通的项目"), Complexity::Medium);
    }

    #[test]
    fn complexity_signals_are_literal() {
        assert_eq!(assess_complexity("a simple todo app"), Complexity::Simple);
        // Literal match: uppercase variant is not a signal.
        assert_eq!(assess_complexity("A SIMPLE todo app"), Complexity::Medium);
    }

    #[test]
    fn classify_at_stamps_given_time() {
        let at = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let profile = classify_at("电商平台", at);
        assert_eq!(profile.created_at, at);
        assert_eq!(profile.project_type, ProjectType::Ecommerce);
    }
}
