/// Classification for provider failures.
///
/// Used by the registry to decide whether a failed attempt counts against
/// the provider's circuit breaker.
///
/// # Behavior Summary
///
/// | Class | Try Next Provider? | Record Circuit Breaker Failure? |
/// |-------|-------------------|--------------------------------|
/// | `Never` | No | No |
/// | `FailoverWithPenalty` | Yes | Yes (affects future requests) |
/// | `NextProvider` | Yes | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// The request itself is invalid (unknown provider, nothing left to try).
    Never,

    /// Failover to next provider and record a circuit breaker penalty.
    ///
    /// Used for transport failures, non-2xx responses and malformed payloads.
    /// After enough of these the provider is skipped in `auto` mode.
    FailoverWithPenalty,

    /// Try next provider without recording any penalty.
    ///
    /// Used when the provider is simply unable to serve this request
    /// (no API key, empty table, base currency it does not quote).
    NextProvider,
}
