// SPDX-License-Identifier: MIT

//! The retry-scheduling decision, kept as a pure function so the bound and
//! backoff invariants (§8) can be tested without a store or a clock.

/// What a finished attempt means for the job's next state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Completed,
    Retry { attempts: u32, run_at_ms: i64 },
    Dead { attempts: u32 },
}

/// Decide the outcome of one execution attempt.
///
/// `attempts` is the count going into this attempt (0 for a job's first
/// run). The `+1-then-compare` ordering in `attempts' <= max_retries` is
/// what bounds total executions to `max_retries + 1` (§4.3).
pub fn settle(
    exit_code: i32,
    attempts: u32,
    max_retries: u32,
    backoff_base: u32,
    now_ms: i64,
) -> Settlement {
    if exit_code == 0 {
        return Settlement::Completed;
    }
    let next_attempts = attempts + 1;
    if next_attempts <= max_retries {
        let backoff_seconds = backoff_base.saturating_pow(next_attempts);
        let run_at_ms = now_ms + i64::from(backoff_seconds) * 1000;
        Settlement::Retry { attempts: next_attempts, run_at_ms }
    } else {
        Settlement::Dead { attempts: next_attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_always_completes_regardless_of_attempts() {
        assert_eq!(settle(0, 5, 0, 2, 1_000), Settlement::Completed);
    }

    #[test]
    fn failure_retries_while_budget_remains() {
        let outcome = settle(1, 0, 2, 2, 1_000);
        assert_eq!(outcome, Settlement::Retry { attempts: 1, run_at_ms: 1_000 + 2_000 });
    }

    #[test]
    fn failure_dies_once_budget_is_exhausted() {
        let outcome = settle(1, 2, 2, 2, 1_000);
        assert_eq!(outcome, Settlement::Dead { attempts: 3 });
    }

    #[test]
    fn max_retries_zero_dies_on_first_failure() {
        let outcome = settle(1, 0, 0, 2, 1_000);
        assert_eq!(outcome, Settlement::Dead { attempts: 1 });
    }

    #[test]
    fn backoff_grows_with_attempt_number() {
        let first = settle(1, 0, 5, 2, 0);
        let second = settle(1, 1, 5, 2, 0);
        let (Settlement::Retry { run_at_ms: a, .. }, Settlement::Retry { run_at_ms: b, .. }) =
            (first, second)
        else {
            panic!("expected retries");
        };
        assert!(b > a);
    }

    #[test]
    fn three_total_attempts_for_max_retries_two() {
        // initial attempt (attempts=0) fails -> retry, attempts=1
        let r1 = settle(1, 0, 2, 2, 0);
        assert_eq!(r1, Settlement::Retry { attempts: 1, run_at_ms: 2_000 });
        // second attempt (attempts=1) fails -> retry, attempts=2
        let r2 = settle(1, 1, 2, 2, 0);
        assert_eq!(r2, Settlement::Retry { attempts: 2, run_at_ms: 4_000 });
        // third attempt (attempts=2) fails -> dead, attempts=3
        let r3 = settle(1, 2, 2, 2, 0);
        assert_eq!(r3, Settlement::Dead { attempts: 3 });
    }
}
