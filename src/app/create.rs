//! The create screen: form state for publishing a new post.

use crate::models::Asset;
use crate::remote::Backend;
use crate::services::posts::{self, MISSING_FIELDS, NewPost};

/// Message surfaced to the user after a submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success(String),
    Error(String),
}

impl Alert {
    pub fn message(&self) -> &str {
        match self {
            Alert::Success(message) | Alert::Error(message) => message,
        }
    }
}

/// Transient form state, owned by the screen for one submission attempt.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub title: String,
    pub prompt: String,
    pub video: Option<Asset>,
    pub thumbnail: Option<Asset>,
}

impl CreateForm {
    /// True when all four fields are filled in.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.prompt.trim().is_empty()
            && self.video.is_some()
            && self.thumbnail.is_some()
    }

    pub fn reset(&mut self) {
        *self = CreateForm::default();
    }
}

/// Screen driving the publish workflow.
#[derive(Debug, Default)]
pub struct CreateScreen {
    pub form: CreateForm,
    uploading: bool,
}

impl CreateScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a submission is in flight.
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Submit the form for the given user.
    ///
    /// An incomplete form produces the single validation alert and leaves
    /// the form untouched, so the user can finish filling it in. Once the
    /// workflow runs, the form is cleared no matter how it ends.
    pub async fn submit(&mut self, backend: &impl Backend, user_id: &str) -> Alert {
        if self.uploading {
            return Alert::Error("A submission is already in progress".to_string());
        }
        if !self.form.is_complete() {
            return Alert::Error(MISSING_FIELDS.to_string());
        }

        self.uploading = true;
        let new_post = NewPost {
            title: self.form.title.clone(),
            prompt: self.form.prompt.clone(),
            video: self.form.video.clone(),
            thumbnail: self.form.thumbnail.clone(),
            creator_id: user_id.to_string(),
        };
        let outcome = posts::publish(backend, &new_post).await;

        self.form.reset();
        self.uploading = false;

        match outcome {
            Ok(_) => Alert::Success("Post uploaded successfully".to_string()),
            Err(err) => Alert::Error(err.to_string()),
        }
    }
}
