use serde::{Deserialize, Serialize};

/// Unit category. The four suits form a weakness cycle:
/// Spade beats Heart, Heart beats Club, Club beats Diamond, Diamond beats Spade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Suit {
    Spade,
    Heart,
    Club,
    Diamond,
}

string_enum!(Suit {
    Spade => "spade",
    Heart => "heart",
    Club => "club",
    Diamond => "diamond",
});

/// `BEATS[s]` is the suit that `s` deals weakness damage to.
const BEATS: [Suit; 4] = [Suit::Heart, Suit::Club, Suit::Diamond, Suit::Spade];

/// `WEAK_AGAINST[s]` is the suit that deals weakness damage to `s`.
const WEAK_AGAINST: [Suit; 4] = [Suit::Diamond, Suit::Spade, Suit::Heart, Suit::Club];

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond];

    pub fn beats(self) -> Suit {
        BEATS[self as usize]
    }

    /// The suit this one is weak against.
    pub fn weakness(self) -> Suit {
        WEAK_AGAINST[self as usize]
    }

    pub fn is_weak_against(self, other: Suit) -> bool {
        self.weakness() == other
    }

    pub fn from_index(index: usize) -> Suit {
        Suit::ALL[index % Suit::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heart_is_weak_against_spade() {
        assert!(Suit::Heart.is_weak_against(Suit::Spade));
        assert!(!Suit::Spade.is_weak_against(Suit::Heart));
    }

    #[test]
    fn weakness_cycle_closes() {
        let mut suit = Suit::Spade;
        for _ in 0..4 {
            assert!(suit.beats().is_weak_against(suit));
            assert_eq!(suit.beats().weakness(), suit);
            suit = suit.beats();
        }
        assert_eq!(suit, Suit::Spade);
    }

    #[test]
    fn no_suit_is_weak_against_itself_or_its_opposite() {
        for suit in Suit::ALL {
            assert!(!suit.is_weak_against(suit));
            assert!(!suit.is_weak_against(suit.beats().beats()));
        }
    }

    #[test]
    fn serializes_as_lowercase_name() {
        assert_eq!(serde_json::to_string(&Suit::Diamond).unwrap(), "\"diamond\"");
        let parsed: Suit = serde_json::from_str("\"club\"").unwrap();
        assert_eq!(parsed, Suit::Club);
    }
}
