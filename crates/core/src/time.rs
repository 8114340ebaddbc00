use chrono::{DateTime, Duration, Utc};

/// Where drill sessions read the current time from.
///
/// The default follows the wall clock. A pinned clock answers the same instant every
/// time, which keeps start and completion stamps exact in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pinned: Option<DateTime<Utc>>,
}

impl Clock {
    #[must_use]
    pub fn pinned(at: DateTime<Utc>) -> Self {
        Self { pinned: Some(at) }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.pinned.unwrap_or_else(Utc::now)
    }
}

/// 2024-01-01T00:00:00Z.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_723)
}

/// A clock pinned to [`fixed_now`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::pinned(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_clock_never_moves() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn default_clock_follows_wall_time() {
        let before = Utc::now();
        let now = Clock::default().now();
        assert!(now >= before);
        assert!(now - before < Duration::seconds(5));
    }
}
