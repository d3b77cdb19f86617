// ABOUTME: Scaffold tree for a newly created OpenSpec project and its text rendering
// ABOUTME: Entries keep insertion order so the rendered tree is stable

/// A node in the scaffold tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureNode {
    /// A file with a short human description.
    File(String),
    /// A directory holding only plain file names.
    Files(Vec<String>),
    /// A directory with nested entries.
    Dir(Vec<(String, StructureNode)>),
}

fn files(names: &[&str]) -> StructureNode {
    StructureNode::Files(names.iter().map(|n| n.to_string()).collect())
}

fn dir(entries: Vec<(&str, StructureNode)>) -> StructureNode {
    StructureNode::Dir(
        entries
            .into_iter()
            .map(|(name, node)| (name.to_string(), node))
            .collect(),
    )
}

fn file(description: &str) -> StructureNode {
    StructureNode::File(description.to_string())
}

/// Fixed scaffold rooted at `project_name`.
pub fn project_structure(project_name: &str) -> StructureNode {
    dir(vec![(
        project_name,
        dir(vec![
            (
                "openspec",
                dir(vec![
                    ("specs", files(&["spec.md", "tasks.md"])),
                    ("changes", files(&[])),
                ]),
            ),
            (
                "src",
                dir(vec![
                    ("routes", files(&["index.js"])),
                    ("models", files(&["index.js"])),
                    ("middleware", files(&["auth.js", "validation.js"])),
                    ("utils", files(&["database.js", "validation.js"])),
                    (
                        "controllers",
                        files(&["userController.js", "itemController.js"]),
                    ),
                    ("services", files(&["userService.js", "itemService.js"])),
                ]),
            ),
            (
                "tests",
                dir(vec![
                    ("unit", files(&["user.test.js", "item.test.js"])),
                    ("integration", files(&["api.test.js"])),
                ]),
            ),
            ("docs", files(&["API.md", "README.md", "SETUP.md"])),
            ("config", files(&["database.js", "auth.js"])),
            ("package.json", file("项目配置文件")),
            (".env.example", file("环境变量模板")),
            (".gitignore", file("Git忽略文件")),
            ("README.md", file("项目说明文档")),
            ("Dockerfile", file("Docker容器配置")),
        ]),
    )])
}

/// Render the entries of a directory node, two spaces per nesting level.
pub fn format_structure(node: &StructureNode) -> String {
    match node {
        StructureNode::Dir(entries) => render_entries(entries, 0),
        StructureNode::Files(names) => names
            .iter()
            .map(|n| format!("- {}", n))
            .collect::<Vec<_>>()
            .join("\n"),
        StructureNode::File(description) => description.clone(),
    }
}

fn render_entries(entries: &[(String, StructureNode)], indent: usize) -> String {
    let spaces = "  ".repeat(indent);
    entries
        .iter()
        .map(|(name, node)| match node {
            StructureNode::File(description) => format!("{}📄 {}: {}", spaces, name, description),
            StructureNode::Files(names) => {
                let mut out = format!("{}📁 {}/", spaces, name);
                for item in names {
                    out.push_str(&format!("\n{}  - {}", spaces, item));
                }
                out
            }
            StructureNode::Dir(children) => format!(
                "{}📁 {}/\n{}",
                spaces,
                name,
                render_entries(children, indent + 1)
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
