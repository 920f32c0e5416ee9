//! A bridge design: its members and the two supports, storable as JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::PersistenceError;
use crate::geometry::{member, vector, Member};
use crate::solver::Supports;

/// Members plus the support positions they are solved against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// The bars of the truss.
    pub members: Vec<Member>,
    /// Pin (A) and roller (B).
    pub supports: Supports,
}

impl Design {
    /// Create a design from members and supports.
    #[must_use]
    pub fn new(members: Vec<Member>, supports: Supports) -> Self {
        Self { members, supports }
    }

    /// An eight-joint Pratt-style bridge over the reference 12-unit span.
    ///
    /// The deck has joints at `x = 0, 2.5, 6, 9.5, 12`; three top joints carry a
    /// polygonal top chord, with verticals at every interior deck joint and two
    /// diagonals running down from the crown.
    #[must_use]
    pub fn reference() -> Self {
        let a = vector(0.0, 0.0);
        let left_deck = vector(2.5, 0.0);
        let centre_deck = vector(6.0, 0.0);
        let right_deck = vector(9.5, 0.0);
        let b = vector(12.0, 0.0);
        let left_top = vector(2.25, 2.4);
        let crown = vector(6.0, 2.65);
        let right_top = vector(9.75, 2.4);

        let members = vec![
            member(a, left_deck),
            member(left_deck, centre_deck),
            member(centre_deck, right_deck),
            member(right_deck, b),
            member(a, left_top),
            member(left_top, crown),
            member(crown, right_top),
            member(right_top, b),
            member(left_deck, left_top),
            member(centre_deck, crown),
            member(right_deck, right_top),
            member(left_deck, crown),
            member(right_deck, crown),
        ];
        Self::new(members, Supports::new(a, b))
    }

    /// Serialise the design as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a design from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] when `text` is not a design document.
    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write the design to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when serialising or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a design from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when reading or parsing fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::reference()
    }
}
