use crate::ai::ChatMessage;

const SYSTEM_PROMPT: &str = r#"You are an expert software developer who writes excellent git commit messages.

Guidelines for commit messages:
- Use conventional commits format: type(scope): description
- Types: feat, fix, docs, style, refactor, test, chore, build, ci, perf
- Keep the first line under 50 characters
- Use imperative mood (e.g., "Add" not "Added")
- Be specific and descriptive
- If there are multiple changes, focus on the most significant one
- Add a body if needed to explain WHY the change was made

Analyze the git diff and write a concise, informative commit message.
Only output the commit message, nothing else."#;

pub fn build_messages(diff: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Generate a commit message for these changes:\n\n```diff\n{}\n```",
            diff
        )),
    ]
}
