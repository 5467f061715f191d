//! Currency conversion abstractions and the cached USD converter

use crate::core::cache::Cache;
use crate::core::clock::Clock;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, warn};

pub const BASE_CURRENCY: &str = "USD";

/// Source of exchange rates relative to USD.
#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Units of `currency` that one US dollar buys.
    async fn get_rate(&self, currency: &str) -> Result<f64>;
}

/// Where the rate behind a [`Conversion`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Amount was already in USD.
    Identity,
    Cached,
    Fetched,
    /// The rate lookup failed; the amount is returned unconverted.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub amount_usd: f64,
    pub source: RateSource,
}

impl Conversion {
    pub fn is_fallback(&self) -> bool {
        self.source == RateSource::Fallback
    }
}

#[async_trait]
pub trait UsdConverter: Send + Sync {
    async fn convert(&self, amount: f64, from_currency: &str) -> Result<Conversion>;

    /// Converted amount only; callers cannot tell a fallback from a conversion.
    async fn convert_to_usd(&self, amount: f64, from_currency: &str) -> Result<f64> {
        Ok(self.convert(amount, from_currency).await?.amount_usd)
    }
}

/// Converts to USD through a per-currency rate cache in front of a provider.
pub struct CurrencyConverter {
    provider: Arc<dyn CurrencyRateProvider>,
    cache: Cache<String, f64>,
    clock: Arc<dyn Clock>,
}

impl CurrencyConverter {
    pub fn new(
        provider: Arc<dyn CurrencyRateProvider>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            cache: Cache::new(ttl),
            clock,
        }
    }

    async fn rate_for(&self, currency: &str) -> Result<(f64, RateSource)> {
        let key = currency.to_string();
        if let Some(rate) = self.cache.get(&key, self.clock.now()).await {
            return Ok((rate, RateSource::Cached));
        }

        let rate = self.provider.get_rate(currency).await?;
        if !rate.is_finite() || rate <= 0.0 {
            anyhow::bail!("Unusable rate {rate} for currency: {currency}");
        }
        self.cache.put(key, rate, self.clock.now()).await;
        Ok((rate, RateSource::Fetched))
    }
}

#[async_trait]
impl UsdConverter for CurrencyConverter {
    async fn convert(&self, amount: f64, from_currency: &str) -> Result<Conversion> {
        if from_currency == BASE_CURRENCY {
            return Ok(Conversion {
                amount_usd: amount,
                source: RateSource::Identity,
            });
        }

        match self.rate_for(from_currency).await {
            Ok((rate, source)) => {
                debug!(currency = %from_currency, rate, ?source, "Converted to USD");
                Ok(Conversion {
                    amount_usd: amount / rate,
                    source,
                })
            }
            Err(e) => {
                warn!(
                    currency = %from_currency,
                    error = %e,
                    "Currency conversion failed, using original amount"
                );
                Ok(Conversion {
                    amount_usd: amount,
                    source: RateSource::Fallback,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::expense::round2;
    use anyhow::anyhow;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockRateProvider {
        rates: HashMap<&'static str, f64>,
        call_count: AtomicUsize,
    }

    impl MockRateProvider {
        fn new(rates: &[(&'static str, f64)]) -> Self {
            Self {
                rates: rates.iter().copied().collect(),
                call_count: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CurrencyRateProvider for MockRateProvider {
        async fn get_rate(&self, currency: &str) -> Result<f64> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.rates
                .get(currency)
                .copied()
                .ok_or_else(|| anyhow!("No rate for {currency}"))
        }
    }

    fn setup(
        rates: &[(&'static str, f64)],
    ) -> (Arc<MockRateProvider>, Arc<ManualClock>, CurrencyConverter) {
        let provider = Arc::new(MockRateProvider::new(rates));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 5, 10, 8, 0, 0).unwrap(),
        ));
        let converter =
            CurrencyConverter::new(provider.clone(), Duration::hours(1), clock.clone());
        (provider, clock, converter)
    }

    #[tokio::test]
    async fn test_usd_is_identity_without_lookup() {
        let (provider, _, converter) = setup(&[]);

        let conversion = converter.convert(42.5, "USD").await.unwrap();
        assert_eq!(conversion.amount_usd, 42.5);
        assert_eq!(conversion.source, RateSource::Identity);
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_then_cache_within_ttl() {
        let (provider, clock, converter) = setup(&[("EUR", 1.1)]);

        let first = converter.convert(100.0, "EUR").await.unwrap();
        assert_eq!(first.source, RateSource::Fetched);
        assert_eq!(round2(first.amount_usd), 90.91);
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);

        clock.advance(Duration::minutes(59));
        let second = converter.convert(11.0, "EUR").await.unwrap();
        assert_eq!(second.source, RateSource::Cached);
        assert!((second.amount_usd - 10.0).abs() < 1e-9);
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetch_after_ttl() {
        let (provider, clock, converter) = setup(&[("GBP", 0.8)]);

        converter.convert(8.0, "GBP").await.unwrap();
        clock.advance(Duration::hours(1));
        let again = converter.convert(8.0, "GBP").await.unwrap();

        assert_eq!(again.source, RateSource::Fetched);
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_is_per_currency() {
        let (provider, _, converter) = setup(&[("EUR", 0.9), ("JPY", 150.0)]);

        converter.convert(9.0, "EUR").await.unwrap();
        converter.convert(300.0, "JPY").await.unwrap();
        converter.convert(9.0, "EUR").await.unwrap();

        assert_eq!(provider.call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_original_amount() {
        let (_, _, converter) = setup(&[("CAD", 0.0)]);

        let missing = converter.convert(75.0, "EGP").await.unwrap();
        assert_eq!(missing.amount_usd, 75.0);
        assert!(missing.is_fallback());

        let zero_rate = converter.convert(75.0, "CAD").await.unwrap();
        assert_eq!(zero_rate.amount_usd, 75.0);
        assert!(zero_rate.is_fallback());

        assert_eq!(converter.convert_to_usd(75.0, "EGP").await.unwrap(), 75.0);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (provider, _, converter) = setup(&[]);

        converter.convert(1.0, "AUD").await.unwrap();
        converter.convert(1.0, "AUD").await.unwrap();

        assert_eq!(provider.call_count.load(Ordering::SeqCst), 2);
    }
}
