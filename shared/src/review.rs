//! Review modal lifecycle: Closed -> Open -> Submitting -> Closed | OpenWithError.

use std::cell::Cell;

use serde::Deserialize;

use crate::csrf::CSRF_FIELD;
use crate::error::{ConfigError, ReviewError, TransportError};
use crate::form::FormBody;
use crate::notice::{Notice, REVIEW_POSTED_DEFAULT};
use crate::toggle::Notifier;

/// Item the modal was opened for, taken from the control that opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    pub item_id: String,
    pub item_name: Option<String>,
}

impl ReviewTarget {
    /// `None` when the trigger carries no usable id.
    pub fn from_trigger(item_id: Option<String>, item_name: Option<String>) -> Option<Self> {
        let item_id = item_id.map(|id| id.trim().to_owned()).filter(|id| !id.is_empty())?;
        let item_name = item_name.filter(|name| !name.trim().is_empty());
        Some(Self { item_id, item_name })
    }
}

pub fn review_heading(item_name: &str) -> String {
    format!("{item_name}への口コミ")
}

/// A review as echoed back by the server after creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub user_account_name: String,
    #[serde(default)]
    pub created_at: String,
}

impl Review {
    pub fn rating_caption(&self) -> String {
        format!("(評価: {})", self.rating)
    }

    pub fn posted_caption(&self) -> String {
        format!("投稿日: {}", self.created_at)
    }

    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n').map(|line| line.trim_end_matches('\r'))
    }
}

/// Body of a review POST response. Two server shapes are accepted:
/// `{message}` and `{status: "success", review}`; `{status: "error", message}` is a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReviewReply {
    pub status: Option<String>,
    pub message: Option<String>,
    pub review: Option<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewAccepted {
    pub message: String,
    pub review: Option<Review>,
}

impl ReviewReply {
    pub fn into_accepted(self) -> Result<ReviewAccepted, ReviewError> {
        if self.status.as_deref() == Some("error") {
            return Err(ReviewError::Rejected {
                message: self.message,
            });
        }
        if self.status.as_deref() == Some("success") && self.review.is_none() {
            return Err(ReviewError::Rejected {
                message: self.message,
            });
        }
        Ok(ReviewAccepted {
            message: self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| REVIEW_POSTED_DEFAULT.to_owned()),
            review: self.review,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    Closed,
    Open,
    Submitting,
    OpenWithError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Posted,
    /// A submission was already in flight.
    Ignored,
}

pub trait ReviewForm {
    /// Current value of the hidden target-id field.
    fn item_id(&self) -> String;
    fn set_item_id(&self, item_id: &str);
    fn fields(&self) -> Vec<(String, String)>;
    fn reset(&self);
}

pub trait ReviewView {
    fn set_heading(&self, heading: &str);
    fn close(&self);
    fn prepend_review(&self, review: &Review);
}

#[allow(async_fn_in_trait)]
pub trait ReviewTransport {
    fn csrf_token(&self) -> Option<String>;

    async fn submit(&self, item_id: &str, body: String) -> Result<ReviewReply, TransportError>;
}

pub struct ReviewSubmission<V, F, T, N> {
    view: V,
    form: F,
    transport: T,
    notifier: N,
    phase: Cell<ReviewPhase>,
}

impl<V, F, T, N> ReviewSubmission<V, F, T, N>
where
    V: ReviewView,
    F: ReviewForm,
    T: ReviewTransport,
    N: Notifier,
{
    pub fn new(view: Option<V>, form: Option<F>, transport: T, notifier: N) -> Result<Self, ConfigError> {
        let view = view.ok_or(ConfigError::MissingModal)?;
        let form = form.ok_or(ConfigError::MissingForm)?;
        Ok(Self {
            view,
            form,
            transport,
            notifier,
            phase: Cell::new(ReviewPhase::Closed),
        })
    }

    pub fn phase(&self) -> ReviewPhase {
        self.phase.get()
    }

    /// Populate the modal for `target`. No network activity.
    pub fn open(&self, target: Option<&ReviewTarget>) {
        if let Some(target) = target {
            self.form.set_item_id(&target.item_id);
            if let Some(name) = &target.item_name {
                self.view.set_heading(&review_heading(name));
            }
        }
        self.phase.set(ReviewPhase::Open);
    }

    /// The modal was dismissed by the user.
    pub fn dismissed(&self) {
        if self.phase.get() != ReviewPhase::Submitting {
            self.phase.set(ReviewPhase::Closed);
        }
    }

    /// Send the form. The target is read from the hidden field, not from
    /// whatever opened the modal.
    pub async fn submit(&self) -> Result<SubmitOutcome, ReviewError> {
        if self.phase.get() == ReviewPhase::Submitting {
            return Ok(SubmitOutcome::Ignored);
        }

        let item_id = self.form.item_id();
        if item_id.trim().is_empty() {
            self.notifier.notify(&Notice::ReviewTargetMissing);
            self.phase.set(ReviewPhase::OpenWithError);
            return Err(ReviewError::MissingTarget);
        }

        let mut body: FormBody = self.form.fields().into_iter().collect();
        if !body.contains_key(CSRF_FIELD) {
            body.push(CSRF_FIELD, self.transport.csrf_token().unwrap_or_default());
        }

        self.phase.set(ReviewPhase::Submitting);
        let result = match self.transport.submit(&item_id, body.encode()).await {
            Ok(reply) => reply.into_accepted(),
            Err(e) => Err(ReviewError::Transport(e)),
        };

        match result {
            Ok(accepted) => {
                if let Some(review) = &accepted.review {
                    self.view.prepend_review(review);
                    self.form.reset();
                }
                self.notifier.notify(&Notice::ReviewPosted(accepted.message));
                self.view.close();
                self.phase.set(ReviewPhase::Closed);
                Ok(SubmitOutcome::Posted)
            }
            Err(e) => {
                self.notifier.notify(&Notice::ReviewFailed);
                self.phase.set(ReviewPhase::OpenWithError);
                Err(e)
            }
        }
    }
}
