//! Canned conversations that steer an agent through a review.

use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    User,
    Assistant,
}

struct Prompt {
    name: &'static str,
    description: &'static str,
    messages: &'static [(Role, &'static str)],
}

const PROMPTS: [Prompt; 2] = [
    Prompt {
        name: "review_commit_prompt",
        description: "Review a Gerrit commit for quality, bugs, performance and documentation issues.",
        messages: &[
            (Role::User, "Please review the following Gerrit commit for issues, focusing on:"),
            (Role::User, "1. Code quality and best practices"),
            (Role::User, "2. Potential bugs or security issues"),
            (Role::User, "3. Performance concerns"),
            (Role::User, "4. Documentation and maintainability"),
            (
                Role::Assistant,
                "I'll review the commit. Let me first examine the commit details and changes.",
            ),
        ],
    },
    Prompt {
        name: "comment_issues_prompt",
        description: "Create draft comments for issues found in a Gerrit change.",
        messages: &[
            (
                Role::User,
                "Please review the code changes and create draft comments for any issues found.",
            ),
            (Role::User, "For each issue:"),
            (Role::User, "1. Identify the specific file and line number"),
            (Role::User, "2. Describe the issue clearly"),
            (Role::User, "3. Provide a suggestion for how to fix it"),
            (
                Role::User,
                "4. Indicate if it's a critical issue (-2) or a non-critical issue (-1)",
            ),
            (
                Role::Assistant,
                "I'll analyze the code changes and create draft comments for any issues I find.",
            ),
        ],
    },
];

pub fn list_prompts() -> Vec<PromptDefinition> {
    PROMPTS
        .iter()
        .map(|p| PromptDefinition {
            name: p.name,
            description: p.description,
            arguments: Vec::new(),
        })
        .collect()
}

/// `prompts/get` result for `name`, or `None` if no such prompt exists.
pub fn get_prompt(name: &str) -> Option<Value> {
    let prompt = PROMPTS.iter().find(|p| p.name == name)?;
    let messages: Vec<Value> = prompt
        .messages
        .iter()
        .map(|(role, text)| {
            let role = match role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            json!({"role": role, "content": {"type": "text", "text": text}})
        })
        .collect();
    Some(json!({
        "description": prompt.description,
        "messages": messages,
    }))
}
