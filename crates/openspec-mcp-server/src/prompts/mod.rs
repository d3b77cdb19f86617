// ABOUTME: Usage instructions delivered to MCP clients in the initialize response
// ABOUTME: Also served as the openspec_usage prompt

pub const INITIAL_INSTRUCTIONS: &str = include_str!("initial_instructions.md");

pub const INITIAL_INSTRUCTIONS_PROMPT_NAME: &str = "openspec_usage";
