// Prompt constants and the rewrite prompt builder for the optimization pipeline.
// Pure string construction; the completion call lives in llm_client.

/// System prompt for keyword rewriting.
pub const REWRITE_SYSTEM: &str = "You are an SEO expert and marketing copy editor. \
    You optimize text by integrating keywords naturally and contextually \
    while keeping it readable.";

/// Rewrite prompt template. Replace `{text}` and `{keywords}` before sending.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Revise the following text by subtly and naturally integrating every one of these keywords. Maintain readability, avoid keyword stuffing, and ensure each keyword fits logically within its sentence.

Original Text:
{text}

Keywords to Integrate: {keywords}

Guidelines:
- Integrate every keyword, using each one only where it fits naturally.
- Ensure each keyword is contextually relevant to its sentence.
- Do not add symbols, markdown or formatting around keywords; keep them plain.
- Maintain a professional marketing tone.
- Return only the rewritten text, with no preamble or explanation."#;

/// Markdown bold marker the model and some keyword sources wrap terms in.
const BOLD_MARKER: &str = "**";

/// Strips surrounding whitespace and markdown bold markers from a keyword.
pub fn clean_keyword(keyword: &str) -> String {
    keyword.replace(BOLD_MARKER, "").trim().to_string()
}

/// Removes markdown bold markers the model sometimes adds despite instructions.
pub fn clean_completion(text: &str) -> String {
    text.replace(BOLD_MARKER, "").trim().to_string()
}

/// Builds the user prompt asking the model to weave `keywords` into `text`.
/// Keywords that clean down to nothing are left out.
pub fn build_rewrite_prompt(text: &str, keywords: &[String]) -> String {
    let cleaned: Vec<String> = keywords
        .iter()
        .map(|k| clean_keyword(k))
        .filter(|k| !k.is_empty())
        .collect();

    REWRITE_PROMPT_TEMPLATE
        .replace("{keywords}", &cleaned.join(", "))
        .replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prompt_contains_source_and_every_keyword() {
        let prompt = build_rewrite_prompt(
            "Find your next role with us.",
            &kws(&["apprenticeships", "London", "career change"]),
        );
        assert!(prompt.contains("Find your next role with us."));
        assert!(prompt.contains("apprenticeships, London, career change"));
    }

    #[test]
    fn test_prompt_keywords_are_cleaned() {
        let prompt = build_rewrite_prompt("Text", &kws(&["  **apprenticeships** ", "**"]));
        assert!(prompt.contains("Keywords to Integrate: apprenticeships\n"));
        assert!(!prompt.contains("**"));
    }

    #[test]
    fn test_prompt_carries_style_instructions() {
        let prompt = build_rewrite_prompt("Text", &kws(&["skills"]));
        assert!(prompt.contains("avoid keyword stuffing"));
        assert!(prompt.contains("professional marketing tone"));
        assert!(prompt.contains("Do not add symbols"));
        assert!(prompt.contains("Return only the rewritten text"));
    }

    #[test]
    fn test_placeholder_in_source_text_is_not_expanded() {
        // Keywords are substituted first so a literal "{keywords}" in user text survives.
        let prompt = build_rewrite_prompt("Use {keywords} here", &kws(&["skills"]));
        assert!(prompt.contains("Use {keywords} here"));
    }

    #[test]
    fn test_clean_completion_strips_bold() {
        assert_eq!(
            clean_completion("Join **apprenticeships** in **London**.\n"),
            "Join apprenticeships in London."
        );
    }
}
