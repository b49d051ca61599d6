use async_trait::async_trait;

use crate::error::{StudyError, StudyResult};
use crate::session::Session;
use crate::status::ServiceChoice;

/// What a single tier made of a request.
#[derive(Debug)]
pub enum TierOutcome<T> {
    Resolved { value: T, choice: ServiceChoice },
    /// This tier could not serve the request; try the next one.
    Next(StudyError),
    /// Stop here and report the error.
    Terminal(StudyError),
}

impl<T> TierOutcome<T> {
    pub fn resolved(value: T, choice: impl Into<ServiceChoice>) -> Self {
        TierOutcome::Resolved {
            value,
            choice: choice.into(),
        }
    }

    /// Recoverable errors move on, anything else stops the chain.
    pub fn from_error(err: StudyError) -> Self {
        if err.is_recoverable() {
            TierOutcome::Next(err)
        } else {
            TierOutcome::Terminal(err)
        }
    }
}

#[async_trait]
pub trait Tier<Req, T>: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn attempt(&self, request: &Req, session: &Session) -> TierOutcome<T>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    pub value: T,
    pub choice: ServiceChoice,
    /// Name of the tier that produced `value`.
    pub tier: &'static str,
    /// Errors from tiers skipped on the way, in order.
    pub skipped: Vec<(&'static str, StudyError)>,
}

impl<T> Resolution<T> {
    pub fn fell_back(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Ordered fallback chain.
///
/// Tiers are tried in insertion order:
///   1. `Resolved` → done
///   2. `Next` → remember the error, try the following tier
///   3. `Terminal` → stop with that error
///
/// If every tier says `Next`, the last error is returned.
pub struct ResolutionChain<Req, T> {
    label: &'static str,
    tiers: Vec<Box<dyn Tier<Req, T>>>,
}

impl<Req: Sync, T> ResolutionChain<Req, T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            tiers: Vec::new(),
        }
    }

    pub fn with_tier(mut self, tier: impl Tier<Req, T> + 'static) -> Self {
        self.tiers.push(Box::new(tier));
        self
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    pub async fn resolve(&self, request: &Req, session: &Session) -> StudyResult<Resolution<T>> {
        if self.tiers.is_empty() {
            return Err(StudyError::Config(format!("{} chain has no tiers", self.label)));
        }

        let mut skipped = Vec::new();
        for tier in &self.tiers {
            match tier.attempt(request, session).await {
                TierOutcome::Resolved { value, choice } => {
                    tracing::info!("[{}] resolved by {} via {}", self.label, tier.name(), choice.tag());
                    return Ok(Resolution {
                        value,
                        choice,
                        tier: tier.name(),
                        skipped,
                    });
                }
                TierOutcome::Next(err) => {
                    tracing::warn!("[{}] {} failed, falling back: {}", self.label, tier.name(), err);
                    skipped.push((tier.name(), err));
                }
                TierOutcome::Terminal(err) => {
                    tracing::error!("[{}] {} failed terminally: {}", self.label, tier.name(), err);
                    return Err(err);
                }
            }
        }

        Err(skipped
            .pop()
            .map(|(_, err)| err)
            .unwrap_or_else(|| StudyError::RemoteUnavailable("all tiers exhausted".into())))
    }
}
