use crate::ReactionId;
use std::fmt::{Display, Error, Formatter};

impl ReactionId {
    /// Construct a handle from a raw index. Only use indices obtained from the
    /// same `ReactionModel`.
    pub fn from_index(index: usize) -> ReactionId {
        ReactionId(index)
    }

    pub fn to_index(self) -> usize {
        self.0
    }
}

impl Display for ReactionId {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "Reaction({})", self.0)
    }
}
