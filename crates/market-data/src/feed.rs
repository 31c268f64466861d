//! Feeds
//!
//! A feed is the fetch chain for one domain: primary provider, optional
//! secondary provider, static fallback. Providers are tried in order, once
//! each, with no retries.

use crate::error::MarketError;
use crate::fallback::fallback_quote;
use crate::model::{Domain, MarketQuote, Provenance};
use crate::provider::QuoteProvider;

pub type FallbackFn = Box<dyn Fn() -> MarketQuote + Send + Sync>;

/// One provider that did not produce a quote
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: &'static str,
    pub error: MarketError,
}

/// Result of walking the provider chain, before any fallback is applied
#[derive(Debug)]
pub enum FetchOutcome {
    /// A provider answered; earlier providers may have failed
    Fetched {
        quote: MarketQuote,
        failures: Vec<ProviderFailure>,
    },
    /// Every provider failed or was unconfigured
    Exhausted { failures: Vec<ProviderFailure> },
}

impl FetchOutcome {
    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            Self::Fetched { failures, .. } | Self::Exhausted { failures } => failures,
        }
    }

    pub fn quote(&self) -> Option<&MarketQuote> {
        match self {
            Self::Fetched { quote, .. } => Some(quote),
            Self::Exhausted { .. } => None,
        }
    }
}

pub struct Feed {
    domain: Domain,
    primary: Box<dyn QuoteProvider>,
    secondary: Option<Box<dyn QuoteProvider>>,
    fallback: FallbackFn,
}

impl Feed {
    pub fn new(primary: impl QuoteProvider + 'static) -> Self {
        let domain = primary.domain();
        Self {
            domain,
            primary: Box::new(primary),
            secondary: None,
            fallback: Box::new(move || fallback_quote(domain)),
        }
    }

    pub fn with_secondary(mut self, secondary: impl QuoteProvider + 'static) -> Self {
        self.secondary = Some(Box::new(secondary));
        self
    }

    /// Replace the domain's default fallback record
    pub fn with_fallback(mut self, fallback: impl Fn() -> MarketQuote + Send + Sync + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Try primary then secondary. Unconfigured providers are skipped
    /// without a network call and recorded as `MissingCredential`.
    pub async fn attempt(&self) -> FetchOutcome {
        let chain = std::iter::once((self.primary.as_ref(), Provenance::Live))
            .chain(self.secondary.as_deref().map(|p| (p, Provenance::Secondary)));

        let mut failures = Vec::new();

        for (provider, provenance) in chain {
            let result = if provider.is_configured() {
                provider.fetch().await
            } else {
                Err(MarketError::MissingCredential(provider.id()))
            };

            match result {
                Ok(quote) => {
                    return FetchOutcome::Fetched {
                        quote: quote.with_provenance(provenance),
                        failures,
                    };
                }
                Err(error) => {
                    if error.is_missing_credential() {
                        tracing::debug!(domain = %self.domain, provider = provider.id(), "Skipping unconfigured provider");
                    } else {
                        tracing::warn!(domain = %self.domain, provider = provider.id(), error = %error, "Provider failed");
                    }
                    failures.push(ProviderFailure {
                        provider: provider.id(),
                        error,
                    });
                }
            }
        }

        FetchOutcome::Exhausted { failures }
    }

    /// Never fails: the worst case is the fallback record
    pub async fn fetch_quote(&self) -> MarketQuote {
        match self.attempt().await {
            FetchOutcome::Fetched { quote, .. } => quote,
            FetchOutcome::Exhausted { failures } => {
                tracing::warn!(
                    domain = %self.domain,
                    attempts = failures.len(),
                    "All providers failed, serving fallback data"
                );
                (self.fallback)()
            }
        }
    }
}
