//! Multi-voice, multi-attempt synthesis.
//!
//! The loop is an explicit state machine: a call is made in
//! [`RetryState::TryingVoice`], and [`RetryState::advance`] decides, from the call's
//! result alone, the next state and how long to wait before it. The number of
//! transport calls is bounded by `voices * max_attempts_per_voice`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::base::{AttemptError, SpeechTransport, SynthesisOutcome, SynthesisRequest};

/// Delays applied between attempts on the same voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Rate-limit wait is `backoff_base * 2^attempt`
    pub backoff_base: Duration,
    /// Wait after a generic failure status or an unexpected error
    pub retry_delay: Duration,
    /// Wait after a timeout or connection failure
    pub network_retry_delay: Duration,
}

impl RetryPolicy {
    /// Policy where every delay is a multiple of one time unit.
    pub fn from_unit(unit: Duration) -> Self {
        Self {
            backoff_base: unit,
            retry_delay: unit,
            network_retry_delay: unit.saturating_mul(2),
        }
    }

    fn delay_for(&self, error: &AttemptError, attempt: u32) -> Duration {
        match error {
            AttemptError::RateLimited => {
                let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
                self.backoff_base.saturating_mul(factor)
            }
            AttemptError::Timeout(_) | AttemptError::Connection(_) => self.network_retry_delay,
            AttemptError::Status { .. } | AttemptError::Other(_) => self.retry_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_unit(Duration::from_secs(1))
    }
}

/// Position of the retry loop.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryState {
    /// About to call voice `voice` (index into the candidates) for the given attempt
    TryingVoice { voice: usize, attempt: u32 },
    Success(Vec<u8>),
    Exhausted,
}

/// Next state plus the wait to apply before entering it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: RetryState,
    pub delay: Option<Duration>,
}

impl RetryState {
    pub fn initial(voice_count: usize) -> Self {
        if voice_count == 0 {
            RetryState::Exhausted
        } else {
            RetryState::TryingVoice {
                voice: 0,
                attempt: 0,
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RetryState::TryingVoice { .. })
    }

    /// Apply the result of the call made in this state.
    ///
    /// Terminal states do not move. No delay is ever scheduled after the final
    /// attempt of a voice.
    pub fn advance(
        self,
        result: Result<Vec<u8>, AttemptError>,
        voice_count: usize,
        max_attempts: u32,
        policy: &RetryPolicy,
    ) -> Transition {
        let RetryState::TryingVoice { voice, attempt } = self else {
            return Transition {
                next: self,
                delay: None,
            };
        };

        let error = match result {
            Ok(audio) => {
                return Transition {
                    next: RetryState::Success(audio),
                    delay: None,
                };
            }
            Err(error) => error,
        };

        if attempt + 1 < max_attempts {
            return Transition {
                next: RetryState::TryingVoice {
                    voice,
                    attempt: attempt + 1,
                },
                delay: Some(policy.delay_for(&error, attempt)),
            };
        }

        let next = if voice + 1 < voice_count {
            RetryState::TryingVoice {
                voice: voice + 1,
                attempt: 0,
            }
        } else {
            RetryState::Exhausted
        };
        Transition { next, delay: None }
    }
}

/// Drives a [`SpeechTransport`] through the retry state machine.
#[derive(Clone)]
pub struct SynthesisEngine {
    transport: Arc<dyn SpeechTransport>,
    policy: RetryPolicy,
}

impl SynthesisEngine {
    pub fn new(transport: Arc<dyn SpeechTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Try every voice in priority order until one returns complete audio.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> SynthesisOutcome {
        let voices = request.voice_candidates();
        let max_attempts = request.max_attempts_per_voice();
        let mut state = RetryState::initial(voices.len());

        while let RetryState::TryingVoice { voice, attempt } = state {
            let voice_id = &voices[voice];
            info!(
                "Attempting TTS with voice {}, attempt {}/{}",
                voice_id,
                attempt + 1,
                max_attempts
            );

            let result = self.transport.synthesize_once(voice_id, request.text()).await;
            match &result {
                Ok(audio) => info!("TTS succeeded with voice {}: {} bytes", voice_id, audio.len()),
                Err(AttemptError::RateLimited) => warn!("TTS rate limited on voice {}", voice_id),
                Err(e) => warn!("TTS attempt {} on voice {} failed: {}", attempt + 1, voice_id, e),
            }

            let transition = state.advance(result, voices.len(), max_attempts, &self.policy);

            if let RetryState::TryingVoice { voice: next, .. } = &transition.next
                && *next != voice
            {
                warn!("Failed with voice {}, trying next voice...", voice_id);
            }
            if let Some(delay) = transition.delay {
                debug!("Waiting {:?} before retrying voice {}", delay, voice_id);
                tokio::time::sleep(delay).await;
            }

            state = transition.next;
        }

        match state {
            RetryState::Success(audio) => SynthesisOutcome::Success(audio),
            _ => {
                warn!("All TTS attempts failed");
                SynthesisOutcome::Failure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::from_unit(Duration::from_secs(1))
    }

    #[test]
    fn test_success_is_terminal() {
        let t = RetryState::initial(2).advance(Ok(vec![1]), 2, 3, &policy());
        assert_eq!(t.next, RetryState::Success(vec![1]));
        assert_eq!(t.delay, None);
        assert!(t.next.is_terminal());
    }

    #[test]
    fn test_rate_limit_backs_off_exponentially_on_same_voice() {
        let p = policy();
        let t0 = RetryState::initial(1).advance(Err(AttemptError::RateLimited), 1, 4, &p);
        assert_eq!(
            t0.next,
            RetryState::TryingVoice {
                voice: 0,
                attempt: 1
            }
        );
        assert_eq!(t0.delay, Some(Duration::from_secs(1)));

        let t1 = t0.next.advance(Err(AttemptError::RateLimited), 1, 4, &p);
        assert_eq!(t1.delay, Some(Duration::from_secs(2)));

        let t2 = t1.next.advance(Err(AttemptError::RateLimited), 1, 4, &p);
        assert_eq!(t2.delay, Some(Duration::from_secs(4)));
    }

    #[test]
    fn test_network_errors_use_longer_fixed_delay() {
        let p = policy();
        let t = RetryState::initial(1).advance(Err(AttemptError::Timeout("45s".into())), 1, 3, &p);
        assert_eq!(t.delay, Some(Duration::from_secs(2)));
        let t = RetryState::initial(1).advance(
            Err(AttemptError::Connection("refused".into())),
            1,
            3,
            &p,
        );
        assert_eq!(t.delay, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_generic_errors_use_short_fixed_delay() {
        let p = policy();
        let status = AttemptError::Status {
            status: 500,
            body: "boom".into(),
        };
        let t = RetryState::initial(1).advance(Err(status), 1, 3, &p);
        assert_eq!(t.delay, Some(Duration::from_secs(1)));
        let t = RetryState::initial(1).advance(Err(AttemptError::Other("?".into())), 1, 3, &p);
        assert_eq!(t.delay, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_last_attempt_moves_to_next_voice_without_delay() {
        let state = RetryState::TryingVoice {
            voice: 0,
            attempt: 2,
        };
        for error in [
            AttemptError::RateLimited,
            AttemptError::Timeout("t".into()),
            AttemptError::Connection("c".into()),
            AttemptError::Other("o".into()),
        ] {
            let t = state.clone().advance(Err(error), 2, 3, &policy());
            assert_eq!(
                t.next,
                RetryState::TryingVoice {
                    voice: 1,
                    attempt: 0
                }
            );
            assert_eq!(t.delay, None);
        }
    }

    #[test]
    fn test_last_attempt_of_last_voice_exhausts() {
        let state = RetryState::TryingVoice {
            voice: 1,
            attempt: 2,
        };
        let t = state.advance(Err(AttemptError::RateLimited), 2, 3, &policy());
        assert_eq!(t.next, RetryState::Exhausted);
        assert_eq!(t.delay, None);
    }

    #[test]
    fn test_no_voices_starts_exhausted() {
        assert_eq!(RetryState::initial(0), RetryState::Exhausted);
    }

    #[test]
    fn test_terminal_states_do_not_move() {
        let t = RetryState::Exhausted.advance(Ok(vec![1]), 1, 1, &policy());
        assert_eq!(t.next, RetryState::Exhausted);
    }

    #[test]
    fn test_huge_attempt_backoff_saturates() {
        let d = policy().delay_for(&AttemptError::RateLimited, 40);
        assert!(d >= Duration::from_secs(u32::MAX as u64));
    }
}
