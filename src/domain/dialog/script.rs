//! The scripted step sequence and its prompts.
//!
//! A dialog script is an ordered, statically fixed list of [`DialogStep`]s.
//! Each step presents one prompt and derives one stored value from the
//! user's reply: button steps store the pressed button's value, free-text
//! steps pass the reply through the identifier sanitizer.

use once_cell::sync::Lazy;

use crate::domain::foundation::ValidationError;

use super::answers::{AnswerStore, FieldKey};

/// Line sent when a conversation opens, before the first prompt.
pub const OPENING_LINE: &str = "Hi, let's get started!";

/// Lead-in for the rendered name proposal.
pub const PROPOSAL_LEAD_IN: &str = "Done! Your proposed file name is:";

/// Question presented with the confirm/retry choice.
pub const CONFIRM_QUESTION: &str = "Look good?";

/// Reply value that confirms the proposed name.
pub const CONFIRM_VALUE: &str = "confirm";

/// Reply value that discards the proposed name.
pub const RETRY_VALUE: &str = "retry";

/// Acknowledgement sent when the user confirms.
pub const COMPLETED_ACK: &str = "Great, you're all set!";

/// Notice sent on every cancelled exit, whether the user started over or
/// the conversation was cut short.
pub const CANCELLED_NOTICE: &str = "OK, nevermind!";

/// Apology sent before re-presenting a choice prompt.
pub const CHOICE_REJECTION_NOTICE: &str =
    "Sorry, I didn't catch that. Please use one of the buttons.";

/// One selectable affordance on a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Text shown on the button.
    pub label: String,
    /// Opaque value delivered back as the reply.
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A prompt ready to be sent to the user: text, an optional secondary
/// hint line, and zero or more choices. No choices means free-text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub text: String,
    pub hint: Option<String>,
    pub choices: Vec<Choice>,
}

impl PromptSpec {
    /// True when the prompt offers buttons rather than free-text entry.
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }
}

/// Validation policy applied to free-text replies.
///
/// The permissive default accepts whatever the sanitizer produces,
/// including the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogPolicy {
    pub reject_empty_filename: bool,
}

/// One fixed prompt-and-capture unit in the script.
///
/// A step never has side effects beyond a single write into the
/// [`AnswerStore`] under its fixed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogStep {
    /// Button-choice prompt. The reply must match one of the choice
    /// values; the canonical value is stored verbatim.
    Choice {
        key: FieldKey,
        prompt: String,
        hint: Option<String>,
        choices: Vec<Choice>,
    },
    /// Free-text prompt. The reply is sanitized into a compact
    /// identifier before being stored.
    FreeText { key: FieldKey, prompt: String },
}

impl DialogStep {
    /// The answer field this step captures.
    pub fn key(&self) -> FieldKey {
        match self {
            DialogStep::Choice { key, .. } => *key,
            DialogStep::FreeText { key, .. } => *key,
        }
    }

    /// Builds the prompt to present for this step.
    pub fn present(&self) -> PromptSpec {
        match self {
            DialogStep::Choice {
                prompt,
                hint,
                choices,
                ..
            } => PromptSpec {
                text: prompt.clone(),
                hint: hint.clone(),
                choices: choices.clone(),
            },
            DialogStep::FreeText { prompt, .. } => PromptSpec {
                text: prompt.clone(),
                hint: None,
                choices: Vec::new(),
            },
        }
    }

    /// Derives the stored value from a raw reply and writes it into the
    /// store under this step's key.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the reply cannot be turned into a
    /// value: an unrecognized choice, or (policy permitting) a file name
    /// that sanitizes to nothing. The caller re-presents the step.
    pub fn on_reply(
        &self,
        raw: &str,
        store: &mut AnswerStore,
        policy: &DialogPolicy,
    ) -> Result<(), ValidationError> {
        match self {
            DialogStep::Choice { key, choices, .. } => {
                let reply = raw.trim();
                let matched = choices
                    .iter()
                    .find(|c| c.value.eq_ignore_ascii_case(reply))
                    .ok_or_else(|| {
                        ValidationError::invalid_format(key.as_str(), "not one of the offered options")
                    })?;
                store.insert(*key, matched.value.clone());
                Ok(())
            }
            DialogStep::FreeText { key, .. } => {
                let value = sanitize_identifier(raw);
                if value.is_empty() && policy.reject_empty_filename {
                    return Err(ValidationError::empty_field(key.as_str()));
                }
                store.insert(*key, value);
                Ok(())
            }
        }
    }

    /// Short apology sent before re-presenting a rejected step.
    pub fn rejection_notice(&self) -> &'static str {
        match self {
            DialogStep::Choice { .. } => CHOICE_REJECTION_NOTICE,
            DialogStep::FreeText { .. } => {
                "Sorry, I need a file name with at least one letter or number."
            }
        }
    }
}

/// Collapses free text into a compact camelCase identifier.
///
/// Splits on runs of non-alphanumeric characters, capitalizes the first
/// character of each word (leaving the rest untouched), joins the words,
/// and lowercases the leading character of the result. Whitespace-only
/// input collapses to the empty string.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut joined = String::with_capacity(raw.len());
    for word in raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            joined.extend(first.to_uppercase());
            joined.push_str(chars.as_str());
        }
    }

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Builds the prompt carrying the rendered proposal and the
/// confirm/retry choice. The proposal and its affordances travel in one
/// message so the name is emitted exactly once.
pub fn proposal_prompt(artifact: &str) -> PromptSpec {
    PromptSpec {
        text: format!("{}\n*{}*\n{}", PROPOSAL_LEAD_IN, artifact, CONFIRM_QUESTION),
        hint: None,
        choices: confirm_choices(),
    }
}

/// Builds the bare confirm/retry prompt, used when re-asking after an
/// unrecognized reply (the proposal itself is not repeated).
pub fn confirm_prompt() -> PromptSpec {
    PromptSpec {
        text: CONFIRM_QUESTION.to_string(),
        hint: None,
        choices: confirm_choices(),
    }
}

fn confirm_choices() -> Vec<Choice> {
    vec![
        Choice::new("Yep, I'm done", CONFIRM_VALUE),
        Choice::new("Nope, start over", RETRY_VALUE),
    ]
}

static INTAKE_SCRIPT: Lazy<Vec<DialogStep>> = Lazy::new(|| {
    vec![
        DialogStep::Choice {
            key: FieldKey::Kind,
            prompt: "What kind of file is it?".to_string(),
            hint: Some(
                "Need more help to answer this? Here is a brief overview of the two.".to_string(),
            ),
            choices: vec![Choice::new("Template", "TMP"), Choice::new("Record", "RCD")],
        },
        DialogStep::Choice {
            key: FieldKey::Group,
            prompt: "What group are you in?".to_string(),
            hint: None,
            choices: vec![
                Choice::new("Cert", "CERT"),
                Choice::new("BD", "BD"),
                Choice::new("Supply Chain", "SC"),
                Choice::new("Tech", "TECH"),
            ],
        },
        DialogStep::FreeText {
            key: FieldKey::Filename,
            prompt: "Enter a descriptive file name".to_string(),
        },
    ]
});

/// The fixed three-step intake script: kind, group, file name.
pub fn intake_script() -> Vec<DialogStep> {
    INTAKE_SCRIPT.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod script_shape {
        use super::*;

        #[test]
        fn intake_script_captures_the_three_fields_in_order() {
            let script = intake_script();
            let keys: Vec<FieldKey> = script.iter().map(|s| s.key()).collect();
            assert_eq!(keys, vec![FieldKey::Kind, FieldKey::Group, FieldKey::Filename]);
        }

        #[test]
        fn kind_step_offers_template_and_record() {
            let script = intake_script();
            let prompt = script[0].present();
            assert_eq!(prompt.text, "What kind of file is it?");
            assert!(prompt.hint.is_some());
            let values: Vec<&str> = prompt.choices.iter().map(|c| c.value.as_str()).collect();
            assert_eq!(values, vec!["TMP", "RCD"]);
        }

        #[test]
        fn group_step_offers_four_groups() {
            let script = intake_script();
            let prompt = script[1].present();
            let values: Vec<&str> = prompt.choices.iter().map(|c| c.value.as_str()).collect();
            assert_eq!(values, vec!["CERT", "BD", "SC", "TECH"]);
        }

        #[test]
        fn filename_step_is_free_text() {
            let script = intake_script();
            let prompt = script[2].present();
            assert!(!prompt.has_choices());
            assert_eq!(prompt.text, "Enter a descriptive file name");
        }
    }

    mod replies {
        use super::*;

        #[test]
        fn choice_step_stores_canonical_value() {
            let script = intake_script();
            let mut store = AnswerStore::new();
            script[0]
                .on_reply("TMP", &mut store, &DialogPolicy::default())
                .unwrap();
            assert_eq!(store.get(FieldKey::Kind), Some("TMP"));
        }

        #[test]
        fn choice_step_normalizes_case_and_whitespace() {
            let script = intake_script();
            let mut store = AnswerStore::new();
            script[0]
                .on_reply("  tmp ", &mut store, &DialogPolicy::default())
                .unwrap();
            assert_eq!(store.get(FieldKey::Kind), Some("TMP"));
        }

        #[test]
        fn choice_step_rejects_unknown_reply() {
            let script = intake_script();
            let mut store = AnswerStore::new();
            let result = script[0].on_reply("banana", &mut store, &DialogPolicy::default());
            assert!(result.is_err());
            assert!(store.is_empty());
        }

        #[test]
        fn free_text_step_sanitizes_reply() {
            let script = intake_script();
            let mut store = AnswerStore::new();
            script[2]
                .on_reply("Monthly Report", &mut store, &DialogPolicy::default())
                .unwrap();
            assert_eq!(store.get(FieldKey::Filename), Some("monthlyReport"));
        }

        #[test]
        fn free_text_step_accepts_empty_reply_by_default() {
            let script = intake_script();
            let mut store = AnswerStore::new();
            script[2]
                .on_reply("   ", &mut store, &DialogPolicy::default())
                .unwrap();
            assert_eq!(store.get(FieldKey::Filename), Some(""));
        }

        #[test]
        fn free_text_step_rejects_empty_reply_under_strict_policy() {
            let script = intake_script();
            let mut store = AnswerStore::new();
            let policy = DialogPolicy {
                reject_empty_filename: true,
            };
            let result = script[2].on_reply("  !!  ", &mut store, &policy);
            assert!(result.is_err());
            assert!(store.is_empty());
        }
    }

    mod sanitizer {
        use super::*;

        #[test]
        fn camel_cases_spaced_words() {
            assert_eq!(sanitize_identifier("Monthly Report"), "monthlyReport");
            assert_eq!(sanitize_identifier("monthly report"), "monthlyReport");
        }

        #[test]
        fn strips_punctuation_and_underscores() {
            assert_eq!(sanitize_identifier("q3_budget-draft (v2)"), "q3BudgetDraftV2");
        }

        #[test]
        fn preserves_inner_casing_of_words() {
            assert_eq!(sanitize_identifier("iPhone mockup"), "iPhoneMockup");
        }

        #[test]
        fn single_word_is_lowercased_at_the_front_only() {
            assert_eq!(sanitize_identifier("Budget"), "budget");
        }

        #[test]
        fn empty_and_separator_only_input_collapse_to_empty() {
            assert_eq!(sanitize_identifier(""), "");
            assert_eq!(sanitize_identifier("   "), "");
            assert_eq!(sanitize_identifier("-- __ !!"), "");
        }

        proptest! {
            #[test]
            fn output_is_alphanumeric(input in ".{0,128}") {
                let out = sanitize_identifier(&input);
                prop_assert!(out.chars().all(char::is_alphanumeric));
            }

            #[test]
            fn leading_character_is_never_uppercase(input in ".{0,128}") {
                let out = sanitize_identifier(&input);
                if let Some(first) = out.chars().next() {
                    prop_assert!(!first.is_uppercase());
                }
            }

            #[test]
            fn sanitizing_twice_is_stable(input in ".{0,128}") {
                let once = sanitize_identifier(&input);
                let twice = sanitize_identifier(&once);
                prop_assert_eq!(once, twice);
            }
        }
    }

    mod confirm_prompts {
        use super::*;

        #[test]
        fn proposal_prompt_carries_name_and_both_choices() {
            let prompt = proposal_prompt("TMP_CERT_monthlyReport_20260823");
            assert!(prompt.text.contains(PROPOSAL_LEAD_IN));
            assert!(prompt.text.contains("TMP_CERT_monthlyReport_20260823"));
            assert!(prompt.text.contains(CONFIRM_QUESTION));
            let values: Vec<&str> = prompt.choices.iter().map(|c| c.value.as_str()).collect();
            assert_eq!(values, vec![CONFIRM_VALUE, RETRY_VALUE]);
        }

        #[test]
        fn bare_confirm_prompt_omits_the_proposal() {
            let prompt = confirm_prompt();
            assert_eq!(prompt.text, CONFIRM_QUESTION);
            assert!(prompt.has_choices());
        }
    }
}
