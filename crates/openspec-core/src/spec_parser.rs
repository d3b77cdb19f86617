// ABOUTME: Single-pass line scanner extracting endpoints, data models and requirement bullets from spec text
// ABOUTME: Tracks the most recent heading as the current section; never fails on malformed input

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::types::{EndpointRecord, HttpMethod, ModelRecord, SpecRequirements};

// Path is either absolute or a full http(s) URL, optionally opened by a backtick.
static ENDPOINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(GET|POST|PUT|DELETE)\s+`?((?:https?://[^\s/`]+)?/[^\s`]*)").unwrap()
});

static MODEL_START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*\{\s*$").unwrap());

const HEADING_MARKER: &str = "##";
const CODE_FENCE: &str = "```";
const REQUIREMENT_SECTION_MARKERS: &[&str] = &["要求", "规范", "requirement"];

/// Parse a specification body. Unrecognized lines are skipped.
pub fn parse(spec_text: &str) -> SpecRequirements {
    let mut parsed = SpecRequirements::default();
    let mut section = String::new();
    let mut in_fence = false;
    let mut open_model: Option<ModelRecord> = None;

    for line in spec_text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with(CODE_FENCE) {
            in_fence = !in_fence;
            if let Some(model) = open_model.take() {
                parsed.models.push(model);
            }
            continue;
        }

        if in_fence {
            if let Some(endpoint) = parse_endpoint(line, &section) {
                parsed.endpoints.push(endpoint);
            }
            scan_model_line(trimmed, &section, &mut open_model, &mut parsed.models);
            continue;
        }

        if line.contains(HEADING_MARKER) {
            section = line.replace('#', "").trim().to_string();
            continue;
        }

        if let Some(endpoint) = parse_endpoint(line, &section) {
            parsed.endpoints.push(endpoint);
            continue;
        }

        if is_requirement_section(&section) {
            if let Some(item) = trimmed.strip_prefix("- ") {
                parsed
                    .requirements
                    .entry(section.clone())
                    .or_default()
                    .push(item.trim().to_string());
            }
        }
    }

    if let Some(model) = open_model.take() {
        parsed.models.push(model);
    }

    debug!(
        "Parsed spec: {} endpoints, {} models, {} requirement sections",
        parsed.endpoints.len(),
        parsed.models.len(),
        parsed.requirements.len()
    );

    parsed
}

/// Extract an endpoint from a single line, if it carries a verb and a path.
pub fn parse_endpoint(line: &str, section: &str) -> Option<EndpointRecord> {
    let caps = ENDPOINT_RE.captures(line)?;
    let method = HttpMethod::parse(caps.get(1)?.as_str())?;
    Some(EndpointRecord {
        method,
        path: caps.get(2)?.as_str().to_string(),
        section: section.to_string(),
    })
}

fn scan_model_line(
    line: &str,
    section: &str,
    open_model: &mut Option<ModelRecord>,
    models: &mut Vec<ModelRecord>,
) {
    if let Some(model) = open_model.as_mut() {
        if line.starts_with('}') {
            if let Some(done) = open_model.take() {
                models.push(done);
            }
        } else if let Some((field, _)) = line.split_once(':') {
            let field = field.trim();
            if !field.is_empty() {
                model.fields.push(field.to_string());
            }
        }
        return;
    }

    if let Some(caps) = MODEL_START_RE.captures(line) {
        *open_model = Some(ModelRecord {
            name: caps[1].to_string(),
            fields: Vec::new(),
            section: section.to_string(),
        });
    }
}

fn is_requirement_section(section: &str) -> bool {
    let lower = section.to_lowercase();
    REQUIREMENT_SECTION_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{lookup, BLOG_SPEC};
    use crate::types::ProjectType;

    #[test]
    fn backticked_endpoint_under_heading() {
        let parsed = parse("### Endpoints\n- `GET /api/posts` - list\n");
        assert_eq!(
            parsed.endpoints,
            vec![EndpointRecord {
                method: HttpMethod::Get,
                path: "/api/posts".to_string(),
                section: "Endpoints".to_string(),
            }]
        );
    }

    #[test]
    fn other_verbs_are_dropped() {
        let parsed = parse("## API\nPATCH /api/items/1\nHEAD /health\nDELETE /api/items/1\n");
        assert_eq!(parsed.endpoints.len(), 1);
        assert_eq!(parsed.endpoints[0].method, HttpMethod::Delete);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let parsed = parse("GET /a\nPOST /b\nGET /a\n");
        let paths: Vec<_> = parsed.endpoints.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/b", "/a"]);
        assert!(parsed.endpoints.iter().all(|e| e.section.is_empty()));
    }

    #[test]
    fn verb_inside_a_word_is_not_an_endpoint() {
        let parsed = parse("OUTPUT /tmp/file\nINPUT /dev/null\n");
        assert!(parsed.endpoints.is_empty());
    }

    #[test]
    fn heading_line_is_never_an_endpoint() {
        let parsed = parse("## GET /api/ignored\n");
        assert!(parsed.endpoints.is_empty());
    }

    #[test]
    fn malformed_text_yields_empty_result() {
        let parsed = parse("no structure here\n```\nunterminated fence {");
        assert!(parsed.endpoints.is_empty());
        assert!(parsed.requirements.is_empty());
    }

    #[test]
    fn fenced_endpoints_are_collected() {
        let parsed = parse("## API\n```http\nGET /api/users\nPOST /api/users\n```\n");
        let found: Vec<_> = parsed
            .endpoints
            .iter()
            .map(|e| (e.method, e.path.as_str(), e.section.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (HttpMethod::Get, "/api/users", "API"),
                (HttpMethod::Post, "/api/users", "API"),
            ]
        );
    }

    #[test]
    fn heading_inside_fence_keeps_outer_section() {
        let parsed = parse("## Users\n```\n## not a heading\nDELETE /api/users/1\n```\n");
        assert_eq!(parsed.endpoints.len(), 1);
        assert_eq!(parsed.endpoints[0].section, "Users");
    }

    #[test]
    fn fenced_model_and_endpoint_share_a_block() {
        let parsed = parse("## Data\n```\nUser {\n  id: number\n}\nGET /api/users/:id\n```\n");
        assert_eq!(parsed.models.len(), 1);
        assert_eq!(parsed.models[0].fields, vec!["id".to_string()]);
        assert_eq!(parsed.endpoints[0].path, "/api/users/:id");
    }

    #[test]
    fn backtick_around_path_only() {
        let parsed = parse("## API\n- GET `/api/users` - list\n");
        assert_eq!(parsed.endpoints.len(), 1);
        assert_eq!(parsed.endpoints[0].path, "/api/users");
    }

    #[test]
    fn full_url_is_a_path() {
        let parsed = parse("PUT https://api.example.com/v1/users/7\n");
        assert_eq!(parsed.endpoints.len(), 1);
        assert_eq!(parsed.endpoints[0].method, HttpMethod::Put);
        assert_eq!(parsed.endpoints[0].path, "https://api.example.com/v1/users/7");
    }

    #[test]
    fn verb_followed_by_prose_is_not_an_endpoint() {
        let parsed = parse("GET the list first, then POST it back\n");
        assert!(parsed.endpoints.is_empty());
    }

    #[test]
    fn blog_template_endpoints_and_models() {
        let parsed = parse(BLOG_SPEC);
        assert_eq!(parsed.endpoints.len(), 14);
        assert_eq!(parsed.endpoints[0].path, "/api/auth/register");
        assert_eq!(parsed.endpoints[0].section, "API端点");

        let names: Vec<_> = parsed.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Post", "Comment"]);
        assert!(parsed.models[0].fields.contains(&"email".to_string()));
        assert_eq!(parsed.models[0].section, "数据模型");

        let security = parsed.requirements.get("安全要求").expect("security section");
        assert!(security.contains(&"JWT认证".to_string()));
    }

    #[test]
    fn ecommerce_template_has_cart_endpoints() {
        let bundle = lookup(ProjectType::Ecommerce).unwrap();
        let parsed = parse(&bundle.spec_text);
        assert!(parsed
            .endpoints
            .iter()
            .any(|e| e.method == HttpMethod::Post && e.path == "/api/cart/items"));
    }
}
