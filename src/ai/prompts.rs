//! Prompt templates for PR content generation.

/// System prompt constraining the model to a strict JSON reply.
pub const SYSTEM_PROMPT: &str = r#"You are an expert software engineer writing pull request descriptions. You will receive a filtered unified diff of the changes on a branch.

Your task is to produce a pull request title and description based on the ACTUAL CODE CHANGES shown in the diff.

Rules:
1. Read the diff carefully: lines starting with + were added, lines starting with - were removed.
2. The title is a single imperative sentence under 80 characters, no trailing period.
3. The description is markdown with a short summary paragraph followed by a bullet list of notable changes.
4. Describe what the change does, not which files it touches.
5. Do not invent changes that are not in the diff.

Respond with ONLY a JSON object in this exact shape, no surrounding prose:
{"title": "...", "description": "..."}"#;

/// Builds the user prompt for one summarization request.
pub fn generate_user_prompt(diff: &str, language: &str) -> String {
    format!(
        "Write the pull request title and description in {language}.\n\n\
         Here is the diff:\n\n\
         ```diff\n\
         {diff}\n\
         ```"
    )
}
