use serde::Deserialize;

/// Root of a course document: `{ "course": { "chapters": [...] } }`.
#[derive(Clone, Debug, Deserialize)]
pub struct CourseDoc {
    pub course: CourseSpec,
}

impl CourseDoc {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CourseSpec {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

/// Behavior class of a step. Unrecognized type strings deserialize to
/// `Other` and behave like plain reading content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    #[default]
    Text,
    Lesson,
    Intro,
    GhostDemo,
    NowYou,
    FixTheCode,
    Quiz,
    Reflection,
    DeepRead,
    #[serde(other)]
    Other,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Text => "text",
            StepKind::Lesson => "lesson",
            StepKind::Intro => "intro",
            StepKind::GhostDemo => "ghost_demo",
            StepKind::NowYou => "now_you",
            StepKind::FixTheCode => "fix_the_code",
            StepKind::Quiz => "quiz",
            StepKind::Reflection => "reflection",
            StepKind::DeepRead => "deep_read",
            StepKind::Other => "other",
        }
    }

    /// Steps that can gate forward navigation. Demos and reading steps never do.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            StepKind::NowYou | StepKind::Quiz | StepKind::FixTheCode
        )
    }
}

/// Step content: either one block of text or an ordered list of fragments.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Fragments(Vec<String>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Fragments(Vec::new())
    }
}

impl Content {
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(s) => s.is_empty(),
            Content::Fragments(v) => v.iter().all(|s| s.is_empty()),
        }
    }

    pub fn joined(&self) -> String {
        match self {
            Content::Text(s) => s.clone(),
            Content::Fragments(v) => v.join("\n"),
        }
    }
}

/// One declarative rule evaluated against submitted text.
///
/// Unknown check kinds deserialize to `Unknown`, which always passes.
/// Course documents in the wild carry checks this client predates; skipping
/// them must not lock the user out of a step.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    ElementExists {
        #[serde(default)]
        target: String,
        #[serde(default)]
        fail_msg: Option<String>,
    },
    Contains {
        #[serde(default)]
        value: String,
        #[serde(default)]
        fail_msg: Option<String>,
    },
    Regex {
        #[serde(default)]
        pattern: String,
        #[serde(default)]
        fail_msg: Option<String>,
    },
    AttributeExistsOrMatchesPattern {
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        fail_msg: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Ghost demo payload: a flat final string or an ordered segment list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GhostSpec {
    #[serde(default, alias = "code")]
    pub final_code: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// One chunk of a segmented ghost demo.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Segment {
    #[serde(default, alias = "text", alias = "snippet")]
    pub code: String,
    #[serde(default)]
    pub explain: Option<Content>,
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub note: Option<Content>,
    #[serde(default)]
    pub notes: Option<Content>,
    #[serde(default)]
    pub hint: Option<Content>,
}

impl Segment {
    /// Explanatory content for this segment: explain, content, note, notes,
    /// hint, checked in that order; first non-empty wins.
    pub fn explanation(&self) -> Option<&Content> {
        [
            &self.explain,
            &self.content,
            &self.note,
            &self.notes,
            &self.hint,
        ]
        .into_iter()
        .flatten()
        .find(|c| !c.is_empty())
    }
}

fn default_true() -> bool {
    true
}

/// Raw step as declared in the course document.
#[derive(Clone, Debug, Deserialize)]
pub struct StepSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: StepKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub validation_checks: Vec<Check>,
    #[serde(default = "default_true")]
    pub requires_completion: bool,
    #[serde(default)]
    pub ghost: Option<GhostSpec>,
    #[serde(default, alias = "starter")]
    pub starter_code: String,
    #[serde(default)]
    pub success_msg: Option<String>,
    #[serde(default)]
    pub fail_msg: Option<String>,
}

/// Flattened step with provenance, as produced by [`flatten_course_steps`].
#[derive(Clone, Debug)]
pub struct Step {
    pub id: String,
    pub kind: StepKind,
    pub title: String,
    pub content: Content,
    pub validation_checks: Vec<Check>,
    pub requires_completion: bool,
    pub ghost: Option<GhostSpec>,
    pub starter_code: String,
    pub success_msg: Option<String>,
    pub fail_msg: Option<String>,
    pub chapter_title: String,
    pub chapter_index: usize,
    pub step_index: usize,
}

/// Flatten `course.chapters[*].steps[*]` into one ordered step list.
///
/// Pure and deterministic: the same document always yields the same steps
/// and the same synthesized ids (`c{chapter}_s{step}_{type}`).
pub fn flatten_course_steps(doc: &CourseDoc) -> Vec<Step> {
    let mut steps = Vec::new();
    for (ci, chapter) in doc.course.chapters.iter().enumerate() {
        let chapter_title = chapter
            .title
            .clone()
            .unwrap_or_else(|| format!("Chapter {}", ci + 1));
        for (si, spec) in chapter.steps.iter().enumerate() {
            let id = match &spec.id {
                Some(id) if !id.is_empty() => id.clone(),
                _ => format!("c{ci}_s{si}_{}", spec.kind.as_str()),
            };
            steps.push(Step {
                id,
                kind: spec.kind,
                title: spec.title.clone(),
                content: spec.content.clone(),
                validation_checks: spec.validation_checks.clone(),
                requires_completion: spec.requires_completion,
                ghost: spec.ghost.clone(),
                starter_code: spec.starter_code.clone(),
                success_msg: spec.success_msg.clone(),
                fail_msg: spec.fail_msg.clone(),
                chapter_title: chapter_title.clone(),
                chapter_index: ci,
                step_index: si,
            });
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn doc(json: &str) -> CourseDoc {
        CourseDoc::from_json(json).unwrap()
    }

    #[test]
    fn test_flatten_preserves_order_and_count() {
        let d = doc(
            r#"{"course": {"chapters": [
                {"title": "One", "steps": [{"title": "a"}, {"title": "b"}]},
                {"title": "Two", "steps": [{"title": "c"}]}
            ]}}"#,
        );
        let steps = flatten_course_steps(&d);
        assert_eq!(steps.len(), 3);
        let titles: Vec<&str> = steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(steps[2].chapter_index, 1);
        assert_eq!(steps[2].step_index, 0);
        assert_eq!(steps[2].chapter_title, "Two");
    }

    #[test]
    fn test_flatten_applies_defaults() {
        let d = doc(r#"{"course": {"chapters": [{"steps": [{}]}]}}"#);
        let steps = flatten_course_steps(&d);
        assert_eq!(steps[0].kind, StepKind::Text);
        assert_eq!(steps[0].title, "");
        assert!(steps[0].content.is_empty());
        assert!(steps[0].requires_completion);
        assert_eq!(steps[0].chapter_title, "Chapter 1");
    }

    #[test]
    fn test_synthesized_ids_unique_and_stable() {
        let json = r#"{"course": {"chapters": [
            {"steps": [{"type": "now_you"}, {"type": "now_you"}]},
            {"steps": [{"type": "text"}, {"id": "explicit", "type": "quiz"}]}
        ]}}"#;
        let first = flatten_course_steps(&doc(json));
        let second = flatten_course_steps(&doc(json));

        let ids: Vec<&str> = first.iter().map(|s| s.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids[0], "c0_s0_now_you");
        assert_eq!(ids[3], "explicit");

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn test_empty_explicit_id_is_replaced() {
        let d = doc(r#"{"course": {"chapters": [{"steps": [{"id": "", "type": "quiz"}]}]}}"#);
        let steps = flatten_course_steps(&d);
        assert_eq!(steps[0].id, "c0_s0_quiz");
    }

    #[test]
    fn test_content_accepts_string_and_fragments() {
        let d = doc(
            r#"{"course": {"chapters": [{"steps": [
                {"content": "hello"},
                {"content": ["a", "b"]}
            ]}]}}"#,
        );
        let steps = flatten_course_steps(&d);
        assert_eq!(steps[0].content.joined(), "hello");
        assert_eq!(steps[1].content.joined(), "a\nb");
    }

    #[test]
    fn test_unknown_step_type_is_non_interactive() {
        let d = doc(r#"{"course": {"chapters": [{"steps": [{"type": "hologram"}]}]}}"#);
        let steps = flatten_course_steps(&d);
        assert_eq!(steps[0].kind, StepKind::Other);
        assert!(!steps[0].kind.is_interactive());
    }

    #[test]
    fn test_unknown_check_kind_parses_to_unknown() {
        let d = doc(
            r#"{"course": {"chapters": [{"steps": [
                {"type": "now_you", "validation_checks": [{"type": "telepathy", "target": "x"}]}
            ]}]}}"#,
        );
        let steps = flatten_course_steps(&d);
        assert!(matches!(steps[0].validation_checks[0], Check::Unknown));
    }

    #[test]
    fn test_ghost_spec_aliases() {
        let d = doc(
            r#"{"course": {"chapters": [{"steps": [
                {"type": "ghost_demo", "ghost": {"code": "<p>hi</p>"}},
                {"type": "ghost_demo", "ghost": {"segments": [
                    {"text": "<p>", "explain": "open tag"},
                    {"snippet": "</p>", "note": ["close", "tag"]}
                ]}}
            ]}]}}"#,
        );
        let steps = flatten_course_steps(&d);
        let single = steps[0].ghost.as_ref().unwrap();
        assert_eq!(single.final_code, "<p>hi</p>");
        let segmented = steps[1].ghost.as_ref().unwrap();
        assert_eq!(segmented.segments.len(), 2);
        assert_eq!(segmented.segments[0].code, "<p>");
        assert_eq!(segmented.segments[1].code, "</p>");
        assert_eq!(
            segmented.segments[1].explanation().unwrap().joined(),
            "close\ntag"
        );
    }

    #[test]
    fn test_segment_explanation_priority() {
        let seg: Segment = serde_json::from_str(
            r#"{"code": "x", "hint": "last", "note": "third", "explain": "first"}"#,
        )
        .unwrap();
        assert_eq!(seg.explanation().unwrap().joined(), "first");

        let seg: Segment =
            serde_json::from_str(r#"{"code": "x", "explain": "", "hint": "fallback"}"#).unwrap();
        assert_eq!(seg.explanation().unwrap().joined(), "fallback");

        let seg: Segment = serde_json::from_str(r#"{"code": "x"}"#).unwrap();
        assert!(seg.explanation().is_none());
    }

    #[test]
    fn test_stepkind_interactive_set() {
        assert!(StepKind::NowYou.is_interactive());
        assert!(StepKind::Quiz.is_interactive());
        assert!(StepKind::FixTheCode.is_interactive());
        assert!(!StepKind::GhostDemo.is_interactive());
        assert!(!StepKind::Text.is_interactive());
        assert!(!StepKind::Reflection.is_interactive());
        assert!(!StepKind::DeepRead.is_interactive());
        assert!(!StepKind::Intro.is_interactive());
    }
}
