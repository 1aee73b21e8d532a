use std::time::Duration;

pub const TIME_PLACEHOLDER: &str = "0:00";

/// Position of one output as last polled. `total` stays `None` until the
/// decoder has reported a length.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressSnapshot {
    pub elapsed: Duration,
    pub total: Option<Duration>,
}

impl ProgressSnapshot {
    pub fn new(elapsed: Duration, total: Option<Duration>) -> Self {
        ProgressSnapshot { elapsed, total }
    }

    pub fn ratio(&self) -> f64 {
        match self.total {
            Some(total) if !total.is_zero() => {
                (self.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn elapsed_label(&self) -> String {
        format_time(self.elapsed.as_secs_f64())
    }

    pub fn total_label(&self) -> String {
        match self.total {
            Some(total) => format_time(total.as_secs_f64()),
            None => TIME_PLACEHOLDER.to_string(),
        }
    }

    /// `m:ss / m:ss`
    pub fn label(&self) -> String {
        format!("{} / {}", self.elapsed_label(), self.total_label())
    }
}

/// `m:ss`. Anything that is not a finite, non-negative number of seconds
/// renders as the placeholder.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return TIME_PLACEHOLDER.to_string();
    }

    let secs = secs.floor() as u64;
    let mins = secs / 60;
    let secs = secs % 60;

    format!("{mins}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.99), "0:09");
        assert_eq!(format_time(272.0), "4:32");
        assert_eq!(format_time(3_725.0), "62:05");
    }

    #[test]
    fn non_finite_input_uses_placeholder() {
        assert_eq!(format_time(f64::NAN), TIME_PLACEHOLDER);
        assert_eq!(format_time(f64::INFINITY), TIME_PLACEHOLDER);
        assert_eq!(format_time(-3.0), TIME_PLACEHOLDER);
    }

    #[test]
    fn unknown_total_never_divides() {
        let snap = ProgressSnapshot::new(Duration::from_secs(30), None);
        assert_eq!(snap.ratio(), 0.0);
        assert_eq!(snap.label(), "0:30 / 0:00");

        let snap = ProgressSnapshot::new(Duration::from_secs(30), Some(Duration::ZERO));
        assert_eq!(snap.ratio(), 0.0);
    }

    #[test]
    fn ratio_is_clamped() {
        let snap = ProgressSnapshot::new(Duration::from_secs(90), Some(Duration::from_secs(60)));
        assert_eq!(snap.ratio(), 1.0);

        let snap = ProgressSnapshot::new(Duration::from_secs(15), Some(Duration::from_secs(60)));
        assert!((snap.ratio() - 0.25).abs() < 1e-9);
    }
}
