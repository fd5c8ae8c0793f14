use chrono::{DateTime, Duration, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Next `updated_at` value: the current time, but never at or before
/// `previous`, so consecutive updates are strictly ordered.
pub fn next_update_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_moves_forward_even_when_clock_is_behind() {
        let future = now() + Duration::hours(1);
        let next = next_update_stamp(future);
        assert!(next > future);
    }

    #[test]
    fn stamp_uses_current_time_when_ahead() {
        let past = now() - Duration::hours(1);
        let next = next_update_stamp(past);
        assert!(next > past + Duration::minutes(59));
    }
}
