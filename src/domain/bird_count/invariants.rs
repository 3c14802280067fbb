// src/domain/bird_count/invariants.rs

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Validates the start/end combination used by the restore constructor.
/// The start must not lie after the end.
pub fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
    if start > end {
        return Err(DomainError::StartAfterEnd { start, end });
    }
    Ok(())
}

/// Invariants that must hold true for the bird count aggregate:
///
/// 1. The start time is set at creation and never changes
/// 2. The end time is unset while ongoing and set exactly once at termination
/// 3. end time >= start time
/// 4. No mutation once terminated (neither sightings nor a second terminate)
/// 5. Watchlists are created lazily, one per area, owned by the aggregate
/// 6. Watchlist counts are always >= 1

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn start_before_end_is_accepted() {
        let start = Utc::now();
        let end = start + Duration::hours(2);
        assert!(validate_time_range(start, end).is_ok());
    }

    #[test]
    fn start_equal_to_end_is_accepted() {
        let instant = Utc::now();
        assert!(validate_time_range(instant, instant).is_ok());
    }

    #[test]
    fn start_after_end_is_rejected() {
        let start = Utc::now();
        let end = start - Duration::days(10);
        assert!(matches!(
            validate_time_range(start, end),
            Err(DomainError::StartAfterEnd { .. })
        ));
    }
}
