// ABOUTME: Human-readable text reports returned by the three MCP tools
// ABOUTME: Formatting only; all inputs are computed by the pipeline beforehand

use std::time::Duration;

use crate::pipeline::{GeneratedSpec, OptimizationOutcome};
use crate::project_structure::{format_structure, StructureNode};
use crate::templates::NO_FEATURES_PLACEHOLDER;
use crate::types::{ProjectType, RequirementProfile};

pub const DEFAULT_TECH_STACK: &str = "默认技术栈";

/// Prefix and hint of the text envelope wrapped around tool failures.
pub const ERROR_PREFIX: &str = "❌ 错误: ";
pub const ERROR_HINT: &str = "💡 建议：检查输入参数是否正确，或查看详细日志获取更多信息。";

/// Render a tool failure the way every tool reports it.
pub fn error_envelope(message: &str) -> String {
    format!("{}{}\n\n{}", ERROR_PREFIX, message, ERROR_HINT)
}

/// Inputs for the project creation report.
pub struct CreationReport<'a> {
    pub project_name: &'a str,
    pub description: &'a str,
    pub tech_stack: Option<&'a str>,
    pub profile: &'a RequirementProfile,
    pub structure: &'a StructureNode,
    /// Set when files were written to disk.
    pub materialized_at: Option<&'a str>,
}

impl CreationReport<'_> {
    pub fn render(&self) -> String {
        let tech_stack = self
            .tech_stack
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TECH_STACK);

        let files_note = match self.materialized_at {
            Some(path) => format!("📂 规范文件已写入：{}", path),
            None => "🔧 高级选项：\n设置 CREATE_REAL_FILES=true 环境变量可自动创建实际文件".to_string(),
        };

        format!(
            "✅ OpenSpec项目 \"{name}\" 创建成功！

📝 项目描述：{description}
🏗️ 项目类型：{project_type}
💻 技术栈：{tech_stack}
🎯 复杂度：{complexity}

📁 生成的文件结构：
{structure}

📋 规范文件内容：
- spec.md: 包含完整的API规范
- tasks.md: 包含详细的实现任务

🎯 下一步：
1. 📖 查看生成的规范文件
2. 🤖 使用AI生成代码
3. 🧪 运行和测试项目
4. 📚 参考文档进行开发

💡 提示：在编辑器中打开项目文件夹，开始开发！

{files_note}",
            name = self.project_name,
            description = self.description,
            project_type = self.profile.project_type,
            tech_stack = tech_stack,
            complexity = self.profile.complexity,
            structure = format_structure(self.structure),
            files_note = files_note,
        )
    }
}

/// Spec report. The type line echoes the caller's explicit type, `custom` otherwise.
pub fn spec_report(
    requirements: &str,
    explicit_type: Option<ProjectType>,
    generated: &GeneratedSpec,
) -> String {
    let features = if generated.profile.features.is_empty() {
        NO_FEATURES_PLACEHOLDER.to_string()
    } else {
        generated
            .profile
            .features
            .iter()
            .map(|f| format!("- {}", f))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "# OpenSpec规范文件

基于您的需求生成的规范：

## 需求分析
{requirements}

## 项目类型
{project_type}

## 识别的特性
{features}

## 生成的规范内容
```markdown
{spec}
```

## 实现任务
```markdown
{tasks}
```

📋 使用说明：
1. 📁 创建项目目录结构
2. 📝 复制上述规范内容到项目的spec.md文件
3. ✅ 复制任务内容到tasks.md文件
4. 🎯 根据需要调整细节
5. 🤖 使用AI生成代码实现

💡 提示：规范文件遵循OpenSpec标准，可直接用于代码生成。

🔧 高级用法：
- 结合项目模板使用
- 自定义规范内容
- 增量式规范更新",
        requirements = requirements,
        project_type = explicit_type.unwrap_or(ProjectType::Custom),
        features = features,
        spec = generated.bundle.spec_text,
        tasks = generated.bundle.tasks_text,
    )
}

/// Optimization report. `generated_at` is preformatted so callers pick the clock.
pub fn optimization_report(
    outcome: &OptimizationOutcome,
    generated_at: &str,
    elapsed: Duration,
) -> String {
    let issues = outcome
        .report
        .issues
        .iter()
        .map(|issue| issue.message())
        .collect::<Vec<_>>()
        .join(", ");

    let suggestions = outcome
        .suggestions
        .iter()
        .enumerate()
        .map(|(index, suggestion)| format!("{}. {}", index + 1, suggestion))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# 代码优化报告

## 📊 原始代码分析
- 📏 代码行数：{lines}
- ✅ 规范符合度：{score}%
- ⚠️ 主要问题：{issues}
- 🎯 代码复杂度：{band}

## 💡 优化建议
{suggestions}

## 🔄 优化后的代码
```javascript
{code}
```

## 📈 改进总结
✅ **已完成的优化：**
- 改进了代码结构和可读性
- 确保符合OpenSpec规范
- 添加了必要的错误处理
- 优化了性能考虑
- 增强了安全性

💡 **进一步建议：**
1. 🧪 测试优化后的代码
2. 📊 根据实际运行结果进一步调整
3. 🔄 保持代码与规范的同步更新
4. 📚 参考最佳实践持续改进

🔧 **技术细节：**
- 优化时间：{generated_at}
- 处理耗时：{elapsed:.3}s
- 规范端点数：{endpoints}
- 优化级别：智能分析 + 规范匹配",
        lines = outcome.report.line_count,
        score = outcome.report.compliance_score,
        issues = issues,
        band = outcome.report.complexity_band,
        suggestions = suggestions,
        code = outcome.optimized_code,
        generated_at = generated_at,
        elapsed = elapsed.as_secs_f64(),
        endpoints = outcome.spec.endpoints.len(),
    )
}
