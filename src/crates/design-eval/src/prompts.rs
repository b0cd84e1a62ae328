//! Prompt template store.
//!
//! The built-in texts are compile-time constants. A [`PromptStore`] is an
//! immutable value built once from those defaults, optionally with per-field
//! overrides loaded from a file, and then shared read-only by evaluators.

use crate::error::{EvalError, Result};
use crate::principle::DesignPrinciple;
use crate::template::SystemPromptTemplate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Evaluative instruction for [`DesignPrinciple::Alignment`].
pub const ALIGNMENT_PROMPT: &str = r#"Correct alignment is an important aspect of design that has been modeled in other layout applications. Text and graphic elements are aligned on the page to indicate organizational structure and aesthetics.

Please evaluate the alignment of the input graphic design considering the following points.

1. Alignment along with the horizontal and vertical direction is considered.
2. The elements that align at a glance but slight misalignment are penalized because it is visually displeasing.
3. Larger alignment groups (i.e., aligned elements that are distant from each other) are preferred as they produce simpler designs with more unity between elements."#;

/// Evaluative instruction for [`DesignPrinciple::Overlap`].
pub const OVERLAP_PROMPT: &str = r#"Overlapping elements are common in many designs and absent from others.
Less or proper overlapping might be considered aesthetically pleasing, but others are not.

Please consider the following points to evaluate the overlap.

1. The three types of overlap, the overlap of elements on text, the overlap of text on graphics, and the overlap of graphics on other graphics, are considered.
2. Hard-to-read text because of insufficient color contrast between a text and the background color is penalized.
3. The graphic design that includes elements extending past the boundaries is also penalized."#;

/// Evaluative instruction for [`DesignPrinciple::Whitespace`].
pub const WHITESPACE_PROMPT: &str = r#"White space in graphic designs is fundamental for readability and aesthetics. Element distance is also closely related to the principle of proximity, as elements placed near each other may appear to be related. White space also influences the overall design style; many modern designs use significant white space. White space 'trapped' between elements can also be distracting. 

Evaluate the white space considering the following points.

1.A large ratio of white space that is not covered by design elements (e.g., graphics and tests) is preferred.
2. However, the graphic design with a too large region of empty white space on the image is undesirable.
3. The greater the distance between each element is preferred.
4. Uniformed vertical spacing of each text element is preferred.
5. Wider border margins for each element are preferred."#;

/// Default system prompt for absolute (1-10) scoring.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an autonomous AI Assistant who aids designers by providing insightful, objective, and constructive critiques of graphic design projects. Your goals are: "Deliver comprehensive and unbiased evaluations of graphic designs based on the following design principles."

Grade seriously. The range of scores is from 1 to 10. A flawless design can earn 10 points, a mediocre design can only earn 7 points, a design with obvious shortcomings can only earn 4 points, and a very poor design can only earn 1-2 points.

{design_principle}

If the output is too long, it will be truncated. Only respond in JSON format, no other information. Example of output for a better graphic design:

{{
    "score": 6, 
    "explanation": "Please concisely explain the reason of the score."
}}"#;

/// Default user turn text accompanying the image.
pub const DEFAULT_USER_PROMPT: &str = r#"Please score the following images."#;

/// Default system prompt for pairwise comparison.
pub const DEFAULT_RELATIVE_SYSTEM_PROMPT: &str = r#"You are an autonomous AI Assistant who aids designers by providing insightful, objective, and constructive
critiques of graphic design projects. 

Your goals are: "Deliver comprehensive and unbiased evaluations of graphic designs based on the following design principles."

{design_principle}

If the output is too long, it will be truncated. Only respond in JSON format, no other information. Example of output for a better graphic design (a):

{{
    "better_design": "a",
    "explanation": "(Please concisely explain the reason of choice.)"
}}

If both images are the same quality, answer

{{
    "better_design": "both", 
    "explanation": "(Please concisely explain the reason of choice.)"
}}
"#;

/// Default user turn text for pairwise comparison; followed by image (a) then (b).
pub const DEFAULT_RELATIVE_USER_PROMPT: &str = r#"Which of the following graphic designs has better quality regarding the above-described points? (a)[image] (b)[image]
"#;

/// Optional replacements for the built-in texts, as read from a file.
///
/// ```yaml
/// alignment: |
///   Judge only horizontal alignment.
/// system_prompt: |
///   Score 1-10. {design_principle}
///   Reply as {{"score": n, "explanation": "..."}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptOverrides {
    pub alignment: Option<String>,
    pub overlap: Option<String>,
    pub whitespace: Option<String>,
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
    pub relative_system_prompt: Option<String>,
    pub relative_user_prompt: Option<String>,
}

/// Read-only store of principle instructions and prompt templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStore {
    alignment: String,
    overlap: String,
    whitespace: String,
    system_prompt: String,
    user_prompt: String,
    relative_system_prompt: String,
    relative_user_prompt: String,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self {
            alignment: ALIGNMENT_PROMPT.to_string(),
            overlap: OVERLAP_PROMPT.to_string(),
            whitespace: WHITESPACE_PROMPT.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_prompt: DEFAULT_USER_PROMPT.to_string(),
            relative_system_prompt: DEFAULT_RELATIVE_SYSTEM_PROMPT.to_string(),
            relative_user_prompt: DEFAULT_RELATIVE_USER_PROMPT.to_string(),
        }
    }
}

impl PromptStore {
    /// The built-in prompts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in prompts with `overrides` applied.
    ///
    /// Overridden system templates are validated here so a bad file fails at
    /// load time rather than on the first evaluation.
    pub fn with_overrides(overrides: PromptOverrides) -> Result<Self> {
        let mut store = Self::default();

        if let Some(text) = overrides.alignment {
            store.alignment = text;
        }
        if let Some(text) = overrides.overlap {
            store.overlap = text;
        }
        if let Some(text) = overrides.whitespace {
            store.whitespace = text;
        }
        if let Some(text) = overrides.system_prompt {
            SystemPromptTemplate::parse(&text)?;
            store.system_prompt = text;
        }
        if let Some(text) = overrides.user_prompt {
            store.user_prompt = text;
        }
        if let Some(text) = overrides.relative_system_prompt {
            SystemPromptTemplate::parse(&text)?;
            store.relative_system_prompt = text;
        }
        if let Some(text) = overrides.relative_user_prompt {
            store.relative_user_prompt = text;
        }

        Ok(store)
    }

    /// Load overrides from a YAML, JSON or TOML file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let overrides: PromptOverrides = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| EvalError::Config(e.to_string()))?,
            Some("toml") => toml::from_str(&content)?,
            _ => {
                return Err(EvalError::Config(format!(
                    "unsupported prompt file format: {}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), "loaded prompt overrides");
        Self::with_overrides(overrides)
    }

    /// Replace the instruction for one principle.
    pub fn with_principle_prompt(mut self, principle: DesignPrinciple, text: impl Into<String>) -> Self {
        let text = text.into();
        match principle {
            DesignPrinciple::Alignment => self.alignment = text,
            DesignPrinciple::Overlap => self.overlap = text,
            DesignPrinciple::Whitespace => self.whitespace = text,
        }
        self
    }

    /// Replace the default system prompt template.
    pub fn with_system_prompt(mut self, template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        SystemPromptTemplate::parse(&template)?;
        self.system_prompt = template;
        Ok(self)
    }

    /// The evaluative instruction for `principle`.
    pub fn get_principle_prompt(&self, principle: DesignPrinciple) -> &str {
        match principle {
            DesignPrinciple::Alignment => &self.alignment,
            DesignPrinciple::Overlap => &self.overlap,
            DesignPrinciple::Whitespace => &self.whitespace,
        }
    }

    /// The evaluative instruction for a principle given by name.
    pub fn principle_prompt_by_name(&self, name: &str) -> Result<&str> {
        let principle: DesignPrinciple = name.parse()?;
        Ok(self.get_principle_prompt(principle))
    }

    /// The system prompt template used when a call does not supply one.
    pub fn get_default_system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }

    pub fn relative_system_prompt(&self) -> &str {
        &self.relative_system_prompt
    }

    pub fn relative_user_prompt(&self) -> &str {
        &self.relative_user_prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_prompts() {
        let store = PromptStore::default();
        assert!(store
            .get_principle_prompt(DesignPrinciple::Alignment)
            .starts_with("Correct alignment"));
        assert!(store
            .get_principle_prompt(DesignPrinciple::Overlap)
            .contains("extending past the boundaries"));
        assert!(store
            .get_principle_prompt(DesignPrinciple::Whitespace)
            .contains("Wider border margins"));
    }

    #[test]
    fn test_prompt_texts_are_verbatim() {
        assert!(WHITESPACE_PROMPT.contains("can also be distracting. \n\nEvaluate"));
        assert!(WHITESPACE_PROMPT.contains("\n1.A large ratio"));
        assert!(WHITESPACE_PROMPT.contains("(e.g., graphics and tests)"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("\"score\": 6, \n"));
        assert!(DEFAULT_RELATIVE_SYSTEM_PROMPT.contains("constructive\ncritiques of graphic design projects. \n"));
        assert!(DEFAULT_RELATIVE_SYSTEM_PROMPT.ends_with("}}\n"));
        assert!(DEFAULT_RELATIVE_USER_PROMPT.ends_with("(b)[image]\n"));
        assert_eq!(DEFAULT_USER_PROMPT, "Please score the following images.");
    }

    #[test]
    fn test_default_system_prompt_shape() {
        let store = PromptStore::default();
        let system = store.get_default_system_prompt();
        assert!(system.contains("{design_principle}"));
        assert!(system.contains("\"score\""));
        assert!(system.contains("\"explanation\""));

        for template in [system, store.relative_system_prompt()] {
            SystemPromptTemplate::parse(template).unwrap();
        }
    }

    #[test]
    fn test_principle_by_name() {
        let store = PromptStore::default();
        assert_eq!(
            store.principle_prompt_by_name("overlap").unwrap(),
            OVERLAP_PROMPT
        );
        assert!(matches!(
            store.principle_prompt_by_name("symmetry"),
            Err(EvalError::UnknownPrinciple(_))
        ));
    }

    #[test]
    fn test_with_principle_prompt() {
        let store = PromptStore::default().with_principle_prompt(DesignPrinciple::Overlap, "custom");
        assert_eq!(store.get_principle_prompt(DesignPrinciple::Overlap), "custom");
        assert_eq!(
            store.get_principle_prompt(DesignPrinciple::Alignment),
            ALIGNMENT_PROMPT
        );
    }

    #[test]
    fn test_invalid_system_override_rejected() {
        let overrides = PromptOverrides {
            system_prompt: Some("no placeholder here".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            PromptStore::with_overrides(overrides),
            Err(EvalError::Template(_))
        ));
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prompts.yaml");
        std::fs::write(
            &path,
            "whitespace: Prefer generous margins.\nuser_prompt: Score this poster.\n",
        )
        .unwrap();

        let store = PromptStore::from_file(&path).unwrap();
        assert_eq!(
            store.get_principle_prompt(DesignPrinciple::Whitespace),
            "Prefer generous margins."
        );
        assert_eq!(store.user_prompt(), "Score this poster.");
        assert_eq!(store.get_default_system_prompt(), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_from_toml_file_and_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prompts.toml");
        std::fs::write(&path, "alignment = \"Grid only.\"\n").unwrap();
        let store = PromptStore::from_file(&path).unwrap();
        assert_eq!(store.get_principle_prompt(DesignPrinciple::Alignment), "Grid only.");

        let txt = dir.path().join("prompts.txt");
        std::fs::write(&txt, "").unwrap();
        assert!(matches!(PromptStore::from_file(&txt), Err(EvalError::Config(_))));
    }
}
