//! Join-kind derivation across a chain of required/optional participants.

use skewjoin_backend::join::JoinType;

/// Tracks whether at least one required stage has been consumed so far.
///
/// Needed for a join like A (optional), B (required), C (optional),
/// D (required), which must run as:
///
/// 1. A right-outer B as TMP1
/// 2. TMP1 left-outer C as TMP2
/// 3. TMP2 inner D
///
/// Step 2 is a left-outer because TMP1 carries required input B, and step 3
/// is inner even though the chain contains two optional stages. The
/// accumulation is order-dependent on purpose: once any required stage is
/// in, later optional stages attach via left-outer so nulls appear only on
/// their side.
#[derive(Debug, Clone, Copy)]
pub struct JoinTypeDeriver {
    seen_required: bool,
}

impl JoinTypeDeriver {
    pub fn new(left_required: bool) -> Self {
        Self {
            seen_required: left_required,
        }
    }

    pub fn seen_required(&self) -> bool {
        self.seen_required
    }

    /// Join kind for the next participant, processed in request order.
    pub fn next(&mut self, required: bool) -> JoinType {
        let kind = match (self.seen_required, required) {
            (true, true) => JoinType::Inner,
            (true, false) => JoinType::Left,
            (false, true) => JoinType::Right,
            (false, false) => JoinType::Full,
        };
        self.seen_required = self.seen_required || required;
        kind
    }
}
