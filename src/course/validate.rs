use regex::RegexBuilder;

use crate::course::spec::{Check, Step};

const DEFAULT_SUCCESS: &str = "Correct!";
const INVALID_PATTERN: &str = "Invalid pattern in course check.";

/// Opening and closing tag pair, case-insensitive. An empty target passes.
fn has_tag(code_lower: &str, tag: &str) -> bool {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return true;
    }
    code_lower.contains(&format!("<{tag}")) && code_lower.contains(&format!("</{tag}>"))
}

/// Case-insensitive, multiline match. A malformed pattern is an `Err`, which
/// the caller turns into a failing check; it never escapes the validator.
fn pattern_matches(pattern: &str, code: &str) -> Result<bool, regex::Error> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()?;
    Ok(re.is_match(code))
}

fn fail(msg: &Option<String>, default: String) -> (bool, String) {
    (false, msg.clone().unwrap_or(default))
}

/// Evaluate a step's checks against submitted text.
///
/// Checks run in declared order; the first failure short-circuits. With no
/// checks, or once all pass, returns the step's success message.
pub fn validate_step(step: &Step, code: &str) -> (bool, String) {
    let success = || {
        step.success_msg
            .clone()
            .unwrap_or_else(|| DEFAULT_SUCCESS.to_string())
    };

    if step.validation_checks.is_empty() {
        return (true, success());
    }

    let low = code.to_lowercase();

    for check in &step.validation_checks {
        match check {
            Check::ElementExists { target, fail_msg } => {
                if !has_tag(&low, target) {
                    return fail(fail_msg, format!("<{target}> is missing or not closed."));
                }
            }
            Check::Contains { value, fail_msg } => {
                if !value.is_empty() && !code.contains(value.as_str()) {
                    return fail(fail_msg, format!("Missing: {value}"));
                }
            }
            Check::Regex { pattern, fail_msg } => match pattern_matches(pattern, code) {
                Ok(true) => {}
                Ok(false) => return fail(fail_msg, "Pattern does not match.".to_string()),
                Err(_) => return fail(fail_msg, INVALID_PATTERN.to_string()),
            },
            Check::AttributeExistsOrMatchesPattern {
                pattern,
                target,
                fail_msg,
            } => {
                if let Some(pat) = pattern.as_deref().filter(|p| !p.is_empty()) {
                    match pattern_matches(pat, code) {
                        Ok(true) => {}
                        Ok(false) => {
                            return fail(fail_msg, "Attribute or pattern does not match.".to_string());
                        }
                        Err(_) => return fail(fail_msg, INVALID_PATTERN.to_string()),
                    }
                } else if let Some(t) = target.as_deref().filter(|t| !t.is_empty())
                    && !low.contains(&t.to_lowercase())
                {
                    return fail(fail_msg, "Attribute is missing.".to_string());
                }
            }
            // Checks this client does not know are treated as satisfied.
            Check::Unknown => {}
        }
    }

    (true, success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::spec::{CourseDoc, flatten_course_steps};

    fn step_with_checks(checks_json: &str) -> Step {
        let json = format!(
            r#"{{"course": {{"chapters": [{{"steps": [
                {{"type": "now_you", "validation_checks": {checks_json}}}
            ]}}]}}}}"#
        );
        let doc = CourseDoc::from_json(&json).unwrap();
        flatten_course_steps(&doc).remove(0)
    }

    #[test]
    fn test_no_checks_always_succeeds() {
        let step = step_with_checks("[]");
        let (ok, msg) = validate_step(&step, "anything at all");
        assert!(ok);
        assert_eq!(msg, DEFAULT_SUCCESS);
        let (ok, _) = validate_step(&step, "");
        assert!(ok);
    }

    #[test]
    fn test_configured_success_message_wins() {
        let json = r#"{"course": {"chapters": [{"steps": [
            {"type": "now_you", "success_msg": "Nice work!"}
        ]}]}}"#;
        let doc = CourseDoc::from_json(json).unwrap();
        let step = flatten_course_steps(&doc).remove(0);
        let (ok, msg) = validate_step(&step, "");
        assert!(ok);
        assert_eq!(msg, "Nice work!");
    }

    #[test]
    fn test_element_exists_requires_closing_tag() {
        let step = step_with_checks(r#"[{"type": "element_exists", "target": "p"}]"#);
        assert!(validate_step(&step, "<p>hi</p>").0);
        assert!(validate_step(&step, "<P>hi</P>").0);
        assert!(!validate_step(&step, "<p>hi").0);
        assert!(!validate_step(&step, "hi").0);
    }

    #[test]
    fn test_element_exists_empty_target_passes() {
        let step = step_with_checks(r#"[{"type": "element_exists", "target": ""}]"#);
        assert!(validate_step(&step, "whatever").0);
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let step = step_with_checks(r#"[{"type": "contains", "value": "Hello"}]"#);
        assert!(validate_step(&step, "say Hello there").0);
        let (ok, msg) = validate_step(&step, "say hello there");
        assert!(!ok);
        assert_eq!(msg, "Missing: Hello");
    }

    #[test]
    fn test_regex_is_case_insensitive_multiline() {
        let step = step_with_checks(r#"[{"type": "regex", "pattern": "^body \\{"}]"#);
        assert!(validate_step(&step, "h1 { }\nBODY {\n}").0);
        assert!(!validate_step(&step, "h1 { }").0);
    }

    #[test]
    fn test_invalid_regex_fails_without_panicking() {
        let step = step_with_checks(r#"[{"type": "regex", "pattern": "functio n("}]"#);
        let (ok, msg) = validate_step(&step, "function foo()");
        assert!(!ok);
        assert_eq!(msg, INVALID_PATTERN);
    }

    #[test]
    fn test_fail_msg_override() {
        let step = step_with_checks(
            r#"[{"type": "contains", "value": "x", "fail_msg": "You forgot the x."}]"#,
        );
        let (ok, msg) = validate_step(&step, "abc");
        assert!(!ok);
        assert_eq!(msg, "You forgot the x.");
    }

    #[test]
    fn test_attribute_check_pattern_branch() {
        let step = step_with_checks(
            r#"[{"type": "attribute_exists_or_matches_pattern", "pattern": "href\\s*="}]"#,
        );
        assert!(validate_step(&step, "<a HREF=\"x\">").0);
        assert!(!validate_step(&step, "<a>").0);
    }

    #[test]
    fn test_attribute_check_target_branch_case_insensitive() {
        let step = step_with_checks(
            r#"[{"type": "attribute_exists_or_matches_pattern", "target": "class="}]"#,
        );
        assert!(validate_step(&step, "<div CLASS=\"big\">").0);
        let (ok, msg) = validate_step(&step, "<div>");
        assert!(!ok);
        assert_eq!(msg, "Attribute is missing.");
    }

    #[test]
    fn test_attribute_check_no_pattern_no_target_passes() {
        let step = step_with_checks(r#"[{"type": "attribute_exists_or_matches_pattern"}]"#);
        assert!(validate_step(&step, "").0);
    }

    #[test]
    fn test_unknown_check_kind_passes() {
        let step = step_with_checks(
            r#"[{"type": "telepathy", "target": "impossible"},
                {"type": "contains", "value": "real"}]"#,
        );
        assert!(validate_step(&step, "the real check still runs").0);
        assert!(!validate_step(&step, "nope").0);
    }

    #[test]
    fn test_checks_short_circuit_in_declared_order() {
        let step = step_with_checks(
            r#"[{"type": "contains", "value": "first", "fail_msg": "first failed"},
                {"type": "contains", "value": "second", "fail_msg": "second failed"}]"#,
        );
        let (_, msg) = validate_step(&step, "neither");
        assert_eq!(msg, "first failed");
        let (_, msg) = validate_step(&step, "first only");
        assert_eq!(msg, "second failed");
        assert!(validate_step(&step, "first and second").0);
    }
}
