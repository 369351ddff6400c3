/// Form validation for user-submitted posts and comments.
///
/// Forms accept the raw submitted field values and either produce a
/// cleaned, entity-ready value set or a map of field-level error messages.
/// Nothing here touches the database; referential checks (does the chosen
/// group exist?) and derived fields (author, post) are attached by the
/// handler before anything is persisted.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

/// Field name -> ordered list of messages, serialized into re-render
/// contexts as `{"form": {"errors": {...}}}`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const MSG_REQUIRED: &str = "This field may not be blank.";
pub const MSG_BAD_GROUP: &str = "Select a valid group.";

pub fn push_field_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn collect_validator_errors(result: Result<(), validator::ValidationErrors>) -> FieldErrors {
    let mut out = FieldErrors::new();
    if let Err(errors) = result {
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| MSG_REQUIRED.to_string());
                push_field_error(&mut out, field, &message);
            }
        }
    }
    out
}

/// Submitted post fields. `group` and `image` arrive as raw strings from
/// the form body; empty selections mean "none".
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Post fields after validation, ready for the caller to attach an author
/// and persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostForm {
    /// Validate the submitted values without persisting anything.
    pub fn clean(&self) -> Result<CleanPost, FieldErrors> {
        let mut errors = collect_validator_errors(self.validate());

        let text = self.text.trim().to_string();
        if text.is_empty() && !errors.contains_key("text") {
            push_field_error(&mut errors, "text", MSG_REQUIRED);
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    push_field_error(&mut errors, "group", MSG_BAD_GROUP);
                    None
                }
            },
        };

        let image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if errors.is_empty() {
            Ok(CleanPost {
                text,
                group_id,
                image,
            })
        } else {
            Err(errors)
        }
    }
}

/// Submitted comment fields; a single multi-line text input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: String,
}

impl CommentForm {
    pub fn clean(&self) -> Result<String, FieldErrors> {
        let mut errors = collect_validator_errors(self.validate());

        let text = self.text.trim().to_string();
        if text.is_empty() && !errors.contains_key("text") {
            push_field_error(&mut errors, "text", MSG_REQUIRED);
        }

        if errors.is_empty() {
            Ok(text)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_form_accepts_plain_text() {
        let form = PostForm {
            text: "hello world".into(),
            group: None,
            image: None,
        };
        let clean = form.clean().expect("form should validate");
        assert_eq!(clean.text, "hello world");
        assert_eq!(clean.group_id, None);
        assert_eq!(clean.image, None);
    }

    #[test]
    fn post_form_rejects_empty_and_blank_text() {
        for text in ["", "   ", "\n\t"] {
            let form = PostForm {
                text: text.into(),
                group: None,
                image: None,
            };
            let errors = form.clean().expect_err("blank text must be rejected");
            assert!(errors.contains_key("text"), "no text error for {text:?}");
        }
    }

    #[test]
    fn post_form_trims_surrounding_whitespace() {
        let form = PostForm {
            text: "  trimmed  ".into(),
            group: None,
            image: None,
        };
        assert_eq!(form.clean().unwrap().text, "trimmed");
    }

    #[test]
    fn post_form_parses_optional_group() {
        let id = Uuid::new_v4();
        let form = PostForm {
            text: "t".into(),
            group: Some(id.to_string()),
            image: None,
        };
        assert_eq!(form.clean().unwrap().group_id, Some(id));

        let empty_select = PostForm {
            text: "t".into(),
            group: Some(String::new()),
            image: None,
        };
        assert_eq!(empty_select.clean().unwrap().group_id, None);

        let garbage = PostForm {
            text: "t".into(),
            group: Some("not-a-uuid".into()),
            image: None,
        };
        let errors = garbage.clean().unwrap_err();
        assert_eq!(errors["group"], vec![MSG_BAD_GROUP.to_string()]);
    }

    #[test]
    fn comment_form_requires_text() {
        assert!(CommentForm { text: "ok".into() }.clean().is_ok());
        let errors = CommentForm { text: "  ".into() }.clean().unwrap_err();
        assert_eq!(errors["text"], vec![MSG_REQUIRED.to_string()]);
    }
}
