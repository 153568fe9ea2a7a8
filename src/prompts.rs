pub const VISION_ANALYSIS: &str = include_str!("../data/prompts/vision_analysis.txt");
pub const SCRIPTS: &str = include_str!("../data/prompts/scripts.txt");
pub const DIALOGUE_SPOKEN: &str = include_str!("../data/prompts/dialogue_spoken.txt");
pub const DIALOGUE_NONE: &str = include_str!("../data/prompts/dialogue_none.txt");
pub const VEO_PROMPTS: &str = include_str!("../data/prompts/veo_prompts.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Substituted values are never scanned again, so text containing braces is
/// inserted verbatim. Unknown placeholders are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    result.push_str(rest);
    result
}
