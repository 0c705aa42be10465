//! Head role selectors.
//!
//! The top and bottom heads are handled by the same generic code: every routine that
//! scans for, moves or plants a head marker is written once over a [`HeadRole`] and
//! instantiated for [`Top`] and [`Bottom`].

use crate::alphabet::{LetterEncoding, Marker, TrackPair};
use crate::types::Symbol;

pub trait HeadRole {
    /// The role of the other head.
    type Other: HeadRole;

    /// Short label used in synthesized state names.
    const NAME: &'static str;

    /// The marker of a cell holding only this head.
    const MARKER: Marker;

    /// Selects this role's half out of a `(top, bottom)` pair of values.
    fn pick<'a, T: ?Sized>(top: &'a T, bottom: &'a T) -> &'a T;

    /// Arranges this role's symbol and the other role's symbol into a track pair.
    fn pair(this: &str, other: &str) -> TrackPair;

    /// The symbol of a cell holding only this head.
    fn this_marker(encoding: &LetterEncoding) -> &Symbol {
        encoding.symbol(Self::MARKER)
    }

    /// The symbol of a cell holding only the other head.
    fn other_marker(encoding: &LetterEncoding) -> &Symbol {
        encoding.symbol(<Self::Other as HeadRole>::MARKER)
    }

    /// This role's track symbol in `pair`.
    fn this_of(pair: &TrackPair) -> &Symbol {
        Self::pick(&pair.top, &pair.bottom)
    }

    /// The other role's track symbol in `pair`.
    fn other_of(pair: &TrackPair) -> &Symbol {
        <Self::Other as HeadRole>::pick(&pair.top, &pair.bottom)
    }
}

/// The head of the top track.
pub struct Top;

/// The head of the bottom track.
pub struct Bottom;

impl HeadRole for Top {
    type Other = Bottom;
    const NAME: &'static str = "top";
    const MARKER: Marker = Marker::Top;

    fn pick<'a, T: ?Sized>(top: &'a T, _bottom: &'a T) -> &'a T {
        top
    }

    fn pair(this: &str, other: &str) -> TrackPair {
        TrackPair::new(this, other)
    }
}

impl HeadRole for Bottom {
    type Other = Top;
    const NAME: &'static str = "bottom";
    const MARKER: Marker = Marker::Bottom;

    fn pick<'a, T: ?Sized>(_top: &'a T, bottom: &'a T) -> &'a T {
        bottom
    }

    fn pair(this: &str, other: &str) -> TrackPair {
        TrackPair::new(other, this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoding() -> LetterEncoding {
        LetterEncoding {
            no_head: "n".to_string(),
            top_head: "t".to_string(),
            bottom_head: "b".to_string(),
            both_heads: "tb".to_string(),
        }
    }

    #[test]
    fn test_markers_are_swapped_between_roles() {
        let encoding = encoding();

        assert_eq!(Top::this_marker(&encoding), "t");
        assert_eq!(Top::other_marker(&encoding), "b");
        assert_eq!(Bottom::this_marker(&encoding), "b");
        assert_eq!(Bottom::other_marker(&encoding), "t");
    }

    #[test]
    fn test_pair_places_this_symbol_on_own_track() {
        assert_eq!(Top::pair("x", "y"), TrackPair::new("x", "y"));
        assert_eq!(Bottom::pair("x", "y"), TrackPair::new("y", "x"));
    }

    #[test]
    fn test_pick_and_projection() {
        let pair = TrackPair::new("up", "down");

        assert_eq!(Top::this_of(&pair), "up");
        assert_eq!(Top::other_of(&pair), "down");
        assert_eq!(Bottom::this_of(&pair), "down");
        assert_eq!(Bottom::other_of(&pair), "up");
        assert_eq!(*Bottom::pick(&1, &2), 2);
    }

    #[test]
    fn test_pick_coerces_owned_symbols_to_str() {
        let (top, bottom) = ("a".to_string(), "b".to_string());

        let letter: &str = Top::pick(&top, &bottom);
        assert_eq!(letter, "a");
        let letter: &str = Bottom::pick(&top, &bottom);
        assert_eq!(letter, "b");
    }
}
