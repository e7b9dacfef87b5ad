use crate::blog::PostID;
use serde::{Deserialize, Serialize};

pub mod submit;

pub use submit::{CommentSubmitter, SubmitOutcome};

/// Values of the comment form. Serialized as the body sent to the comment
/// endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentForm {
    /// Hidden, pre-filled id of the post being commented on.
    #[serde(default, rename = "_id")]
    pub post_id: PostID,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub comment: String,
}

/// User-editable required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, enum_iterator::Sequence)]
pub enum Field {
    Name,
    Email,
    Comment,
}

impl Field {
    pub fn required_message(self) -> &'static str {
        match self {
            Field::Name => "A name is required",
            Field::Email => "Your email is required",
            Field::Comment => "You forgot to comment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0.required_message())]
pub struct FieldError(pub Field);

/// Form checked for required fields, ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm(CommentForm);

impl ValidForm {
    pub fn into_inner(self) -> CommentForm {
        self.0
    }
}

impl CommentForm {
    pub fn for_post(post_id: impl Into<PostID>) -> CommentForm {
        CommentForm {
            post_id: post_id.into(),
            ..Default::default()
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Comment => &self.comment,
        }
    }

    /// Checks every required field, reporting all that are missing at once.
    pub fn validate(self) -> Result<ValidForm, Vec<FieldError>> {
        let errors: Vec<FieldError> = enum_iterator::all::<Field>()
            .filter(|field| self.value(*field).trim().is_empty())
            .map(FieldError)
            .collect();

        if errors.is_empty() {
            Ok(ValidForm(self))
        } else {
            Err(errors)
        }
    }
}

/// Where the comment form is in its submit cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Validating,
    Invalid(Vec<FieldError>),
    Submitting,
    SubmittedOk,
    SubmittedError,
}

impl FormState {
    /// Terminal submission states go back to `Idle`; everything else stays.
    pub fn settle(self) -> FormState {
        match self {
            FormState::SubmittedOk | FormState::SubmittedError => FormState::Idle,
            other => other,
        }
    }
}

/// Runs one submit attempt through validation and submission, reporting
/// each state it passes through to `on_transition`.
pub async fn submit_form(
    submitter: &CommentSubmitter,
    form: CommentForm,
    mut on_transition: impl FnMut(&FormState),
) -> FormState {
    let mut state = FormState::Validating;
    on_transition(&state);

    let form = match form.validate() {
        Ok(form) => form,
        Err(errors) => {
            state = FormState::Invalid(errors);
            on_transition(&state);
            return state;
        }
    };

    state = FormState::Submitting;
    on_transition(&state);

    state = match submitter.dispatch(form).outcome().await {
        SubmitOutcome::Accepted => FormState::SubmittedOk,
        SubmitOutcome::Failed(err) => {
            tracing::warn!("Error submitting comment: {err}");
            FormState::SubmittedError
        }
    };
    on_transition(&state);

    state
}
