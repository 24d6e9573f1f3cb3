//! Active join-key tracking across the join chain.

/// Holds the column set later join steps key off.
///
/// After a required participant is consumed, its key becomes the active
/// key. After an optional one the active key is left alone: an optional
/// participant's columns may be null in the accumulated result (outer
/// join), and keying off them would drop rows that matched through a
/// required stage. In general: join on the required fields, not the
/// optional ones.
#[derive(Debug, Clone)]
pub struct JoinKeyTracker {
    active: Vec<String>,
}

impl JoinKeyTracker {
    pub fn new(left_key: Vec<String>) -> Self {
        Self { active: left_key }
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn advance(&mut self, required: bool, participant_key: &[String]) {
        if required {
            self.active = participant_key.to_vec();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_participant_keeps_the_active_key() {
        let mut tracker = JoinKeyTracker::new(vec!["a.id".into()]);
        tracker.advance(false, &["b.id".into()]);
        assert_eq!(tracker.active(), ["a.id".to_string()]);
    }

    #[test]
    fn required_participant_takes_over_the_key() {
        let mut tracker = JoinKeyTracker::new(vec!["a.id".into()]);
        tracker.advance(true, &["b.id".into()]);
        assert_eq!(tracker.active(), ["b.id".to_string()]);
        tracker.advance(false, &["c.id".into()]);
        assert_eq!(tracker.active(), ["b.id".to_string()]);
    }
}
