pub const ANALYZE_SYSTEM: &str = include_str!("../data/prompts/analyze_system.txt");
pub const ANALYZE_USER: &str = include_str!("../data/prompts/analyze_user.txt");
pub const DEFAULT_ANALYSIS: &str = include_str!("../data/prompts/default_analysis.txt");
pub const EXTRACT_TEXT: &str = include_str!("../data/prompts/extract_text.txt");
pub const SUGGEST_PROMPTS: &str = include_str!("../data/prompts/suggest_prompts.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Renders the analysis instruction, substituting a default when the user
/// gave no prompt.
pub fn analysis_instruction(user_prompt: &str) -> String {
    let user_prompt = user_prompt.trim();
    let user_prompt = if user_prompt.is_empty() {
        DEFAULT_ANALYSIS.trim()
    } else {
        user_prompt
    };
    render(ANALYZE_USER, &[("prompt", user_prompt)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{a}} and {{b}}", &[("a", "cats")]), "cats and {{b}}");
    }

    #[test]
    fn test_prompts_are_non_empty() {
        assert!(!ANALYZE_SYSTEM.is_empty());
        assert!(!ANALYZE_USER.is_empty());
        assert!(!DEFAULT_ANALYSIS.is_empty());
        assert!(!EXTRACT_TEXT.is_empty());
        assert!(!SUGGEST_PROMPTS.is_empty());
    }

    #[test]
    fn test_analyze_user_has_prompt_placeholder() {
        assert!(ANALYZE_USER.contains("{{prompt}}"));
    }

    #[test]
    fn test_analysis_instruction_uses_user_prompt() {
        let rendered = analysis_instruction("  focus on the dog ");
        assert!(rendered.contains("focus on the dog"));
        assert!(!rendered.contains("{{prompt}}"));
    }

    #[test]
    fn test_analysis_instruction_defaults_when_blank() {
        let rendered = analysis_instruction("   ");
        assert!(rendered.contains(DEFAULT_ANALYSIS.trim()));
    }
}
