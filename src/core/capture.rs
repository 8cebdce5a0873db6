//! Voice and receipt capture.
//!
//! A [`CaptureProvider`] turns some non-typed input into a draft transaction. The shipped
//! providers are simulations with fixed results and a configurable delay; real speech or OCR
//! backends implement the same trait.

use crate::{
    errors::{Error, Result},
    models::{InputMethod, NewTransaction, TransactionType},
};
use chrono::NaiveDate;
use std::{future::Future, time::Duration};
use tracing::{debug, instrument};

/// Draft fields extracted by a capture provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    /// Recognized description
    pub description: String,
    /// Recognized amount
    pub amount: f64,
    /// Suggested category
    pub category: String,
}

impl CaptureResult {
    /// Rejects drafts no submission form would accept.
    ///
    /// # Errors
    /// Returns [`Error::Capture`] for a blank description or a negative or non-finite amount.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::Capture {
                message: "nothing was recognized".to_string(),
            });
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::Capture {
                message: format!("unreadable amount {}", self.amount),
            });
        }
        Ok(())
    }

    /// Turns the draft into a submission tagged with how it was captured.
    #[must_use]
    pub fn into_new_transaction(
        self,
        kind: TransactionType,
        date: NaiveDate,
        input_method: InputMethod,
    ) -> NewTransaction {
        NewTransaction::new(kind, self.amount, self.description, self.category, date)
            .with_input_method(input_method)
    }
}

/// Source of captured transaction drafts.
pub trait CaptureProvider: Send + Sync {
    /// Input method recorded on transactions built from this provider.
    fn input_method(&self) -> InputMethod;

    /// Produces one draft.
    fn capture(&self) -> impl Future<Output = Result<CaptureResult>> + Send;
}

/// Stand-in for speech recognition.
#[derive(Debug, Clone)]
pub struct SimulatedVoiceCapture {
    delay: Duration,
}

impl SimulatedVoiceCapture {
    /// Default recording time
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

    /// Simulates with an explicit recording time.
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedVoiceCapture {
    fn default() -> Self {
        Self::with_delay(Self::DEFAULT_DELAY)
    }
}

impl CaptureProvider for SimulatedVoiceCapture {
    fn input_method(&self) -> InputMethod {
        InputMethod::Voice
    }

    #[instrument(skip(self))]
    async fn capture(&self) -> Result<CaptureResult> {
        debug!("Recording for {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(CaptureResult {
            description: "Office supplies purchase".to_string(),
            amount: 125.50,
            category: "Supplies".to_string(),
        })
    }
}

/// Stand-in for receipt OCR.
#[derive(Debug, Clone)]
pub struct SimulatedReceiptCapture {
    delay: Duration,
}

impl SimulatedReceiptCapture {
    /// Default processing time
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Simulates with an explicit processing time.
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedReceiptCapture {
    fn default() -> Self {
        Self::with_delay(Self::DEFAULT_DELAY)
    }
}

impl CaptureProvider for SimulatedReceiptCapture {
    fn input_method(&self) -> InputMethod {
        InputMethod::Photo
    }

    #[instrument(skip(self))]
    async fn capture(&self) -> Result<CaptureResult> {
        debug!("Processing receipt for {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(CaptureResult {
            description: "Restaurant receipt".to_string(),
            amount: 89.75,
            category: "Marketing".to_string(),
        })
    }
}

/// Runs a provider and builds the submission it implies.
///
/// # Errors
/// Provider failures pass through; an unusable draft becomes [`Error::Capture`].
pub async fn capture_transaction<P: CaptureProvider>(
    provider: &P,
    kind: TransactionType,
    date: NaiveDate,
) -> Result<NewTransaction> {
    let draft = provider.capture().await?;
    draft.validate()?;
    Ok(draft.into_new_transaction(kind, date, provider.input_method()))
}
