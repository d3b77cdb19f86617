// ABOUTME: MCP server exposing OpenSpec project creation, spec generation and code optimization
// ABOUTME: Tool failures are rendered as a text envelope instead of protocol errors

use chrono::Local;
use openspec_core::{
    classify, error_envelope, generate_spec, optimization_report, optimize, project_structure,
    resolve, spec_report, CreationReport, OpenSpecError, ProjectType, Result as SpecResult,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, GetPromptRequestParam, GetPromptResult, Implementation,
        ListPromptsResult, PaginatedRequestParam, Prompt, PromptMessage, PromptMessageContent,
        PromptMessageRole, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::config_manager::OpenSpecConfig;
use crate::debug_logger::DebugLogger;
use crate::materializer::materialize;
use crate::prompts::{INITIAL_INSTRUCTIONS, INITIAL_INSTRUCTIONS_PROMPT_NAME};

pub const CREATE_PROJECT_TOOL: &str = "create_openspec_project";
pub const GENERATE_SPEC_TOOL: &str = "generate_openspec_spec";
pub const OPTIMIZE_CODE_TOOL: &str = "optimize_code_by_spec";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Plain-language project description (Chinese or English)
    #[serde(default)]
    pub description: String,
    /// Project directory name
    #[serde(default)]
    pub project_name: String,
    /// Preferred technology stack, echoed in the report
    #[serde(default)]
    pub tech_stack: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSpecRequest {
    /// Functional requirements text
    #[serde(default)]
    pub requirements: String,
    /// Overrides the detected project type for template selection; unknown names select custom
    #[serde(default, deserialize_with = "lenient_project_type")]
    #[schemars(with = "Option<ProjectType>")]
    pub project_type: Option<ProjectType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeCodeRequest {
    /// Code to analyze and rewrite
    #[serde(default)]
    pub code: String,
    /// OpenSpec specification markdown
    #[serde(default)]
    pub spec: String,
    /// Extra guidance, listed as a suggestion
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Any project type name is accepted; blank or null means none was given.
fn lenient_project_type<'de, D>(deserializer: D) -> Result<Option<ProjectType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(name)) if name.trim().is_empty() => None,
        Some(JsonValue::String(name)) => Some(ProjectType::parse_or_custom(&name)),
        Some(_) => Some(ProjectType::Custom),
    })
}

/// Report text plus the outcome recorded in the debug log.
struct ToolOutput {
    text: String,
    outcome: JsonValue,
}

#[derive(Clone)]
pub struct OpenSpecMcpServer {
    config: Arc<OpenSpecConfig>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl OpenSpecMcpServer {
    pub fn new(config: OpenSpecConfig) -> Self {
        Self {
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Create an OpenSpec project from a requirements description. Returns: detected project type and complexity, the project scaffold, and next steps. Writes spec files to disk only when the server enables it. Required: description, projectName. Optional: techStack."
    )]
    async fn create_openspec_project(
        &self,
        params: Parameters<CreateProjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.handle_create_project(params.0).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Generate an OpenSpec specification and task list from requirements. Returns: detected features plus the full spec.md and tasks.md content. Required: requirements. Optional: projectType (blog, ecommerce, social, enterprise, user_management, custom)."
    )]
    async fn generate_openspec_spec(
        &self,
        params: Parameters<GenerateSpecRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.handle_generate_spec(params.0).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Check code against an OpenSpec specification. Returns: a 0-100 compliance score, detected issues, ordered suggestions, and a heuristically rewritten version of the code. Required: code, spec. Optional: feedback."
    )]
    async fn optimize_code_by_spec(
        &self,
        params: Parameters<OptimizeCodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.handle_optimize_code(params.0).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl OpenSpecMcpServer {
    pub fn config(&self) -> &OpenSpecConfig {
        &self.config
    }

    /// Creation report, or the error envelope on failure.
    pub async fn handle_create_project(&self, request: CreateProjectRequest) -> String {
        let started = Instant::now();
        let params = to_debug_value(&request);
        DebugLogger::log_tool_start(CREATE_PROJECT_TOOL, &params);
        let outcome = self.create_project(&request).await;
        finish(CREATE_PROJECT_TOOL, &params, started, outcome)
    }

    pub async fn handle_generate_spec(&self, request: GenerateSpecRequest) -> String {
        let started = Instant::now();
        let params = to_debug_value(&request);
        DebugLogger::log_tool_start(GENERATE_SPEC_TOOL, &params);
        let outcome = Ok(Self::generate(&request));
        finish(GENERATE_SPEC_TOOL, &params, started, outcome)
    }

    pub async fn handle_optimize_code(&self, request: OptimizeCodeRequest) -> String {
        let started = Instant::now();
        let params = to_debug_value(&request);
        DebugLogger::log_tool_start(OPTIMIZE_CODE_TOOL, &params);
        let outcome = Ok(Self::optimize_code(&request));
        finish(OPTIMIZE_CODE_TOOL, &params, started, outcome)
    }

    async fn create_project(&self, request: &CreateProjectRequest) -> SpecResult<ToolOutput> {
        let project_name = request.project_name.trim();
        if project_name.is_empty() {
            return Err(OpenSpecError::InvalidArgument(
                "projectName is required".to_string(),
            ));
        }

        info!("🚀 Creating project: {}", project_name);
        let profile = classify(&request.description);
        info!("🏗️ Detected project type: {}", profile.project_type);

        let bundle = resolve(profile.project_type, &profile);
        let structure = project_structure(project_name);

        let written = if self.config.output.create_real_files {
            Some(materialize(&self.config.output.root_dir, project_name, &bundle).await?)
        } else {
            None
        };
        let written_display = written.as_ref().map(|p| p.display().to_string());

        info!("✅ Project created: {}", project_name);
        let text = CreationReport {
            project_name,
            description: &request.description,
            tech_stack: request.tech_stack.as_deref(),
            profile: &profile,
            structure: &structure,
            materialized_at: written_display.as_deref(),
        }
        .render();
        Ok(ToolOutput {
            text,
            outcome: json!({
                "project_type": profile.project_type.as_str(),
                "complexity": profile.complexity.to_string(),
                "features": profile.features.len(),
                "written_to": written_display,
            }),
        })
    }

    fn generate(request: &GenerateSpecRequest) -> ToolOutput {
        info!(
            "📝 Generating spec ({} chars, explicit type: {:?})",
            request.requirements.chars().count(),
            request.project_type
        );
        let generated = generate_spec(&request.requirements, request.project_type);
        ToolOutput {
            text: spec_report(&request.requirements, request.project_type, &generated),
            outcome: json!({
                "project_type": generated.profile.project_type.as_str(),
                "bundle": generated.bundle.name,
                "features": generated.profile.features.len(),
            }),
        }
    }

    fn optimize_code(request: &OptimizeCodeRequest) -> ToolOutput {
        info!(
            "🔧 Optimizing code: {} chars against {} chars of spec",
            request.code.chars().count(),
            request.spec.chars().count()
        );
        let started = Instant::now();
        let outcome = optimize(&request.code, &request.spec, request.feedback.as_deref());
        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        info!(
            "✅ Optimization done: score={} suggestions={}",
            outcome.report.compliance_score,
            outcome.suggestions.len()
        );
        ToolOutput {
            text: optimization_report(&outcome, &generated_at, started.elapsed()),
            outcome: json!({
                "compliance_score": outcome.report.compliance_score,
                "issues": outcome.report.issues.len(),
                "suggestions": outcome.suggestions.len(),
                "spec_endpoints": outcome.spec.endpoints.len(),
            }),
        }
    }
}

fn to_debug_value<T: Serialize>(request: &T) -> JsonValue {
    serde_json::to_value(request).unwrap_or(JsonValue::Null)
}

fn finish(
    tool: &str,
    params: &JsonValue,
    started: Instant,
    outcome: SpecResult<ToolOutput>,
) -> String {
    match outcome {
        Ok(output) => {
            DebugLogger::log_tool_finish(tool, &output.outcome, started.elapsed());
            output.text
        }
        Err(e) => {
            let message = e.to_string();
            error!("{} failed: {}", tool, message);
            DebugLogger::log_tool_error(tool, params, &message);
            error_envelope(&message)
        }
    }
}

#[tool_handler]
impl ServerHandler for OpenSpecMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INITIAL_INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListPromptsResult {
                prompts: vec![Prompt {
                    name: INITIAL_INSTRUCTIONS_PROMPT_NAME.to_string(),
                    title: Some("OpenSpec Forge usage".to_string()),
                    description: Some(
                        "How to create projects, generate specs and check code with the OpenSpec tools".to_string(),
                    ),
                    arguments: None,
                    icons: None,
                }],
                next_cursor: None,
            })
        }
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        let name = request.name.clone();
        async move {
            if name == INITIAL_INSTRUCTIONS_PROMPT_NAME {
                Ok(GetPromptResult {
                    description: Some("OpenSpec Forge usage".to_string()),
                    messages: vec![PromptMessage {
                        role: PromptMessageRole::User,
                        content: PromptMessageContent::text(INITIAL_INSTRUCTIONS),
                    }],
                })
            } else {
                Err(McpError::invalid_params(
                    format!("Unknown prompt: {}", name),
                    None,
                ))
            }
        }
    }
}
