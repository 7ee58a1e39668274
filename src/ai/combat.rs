//! Combat resolution shared by the live attack primitive and the abstract
//! attack consequences.

use crate::model::Suit;

/// Troops each side loses in one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Casualties {
    pub attacker: u32,
    pub defender: u32,
}

/// Losses when a unit of `attacker` suit strikes a unit of `defender` suit.
///
/// The attacker always pays one troop. A defender weak against the attacker
/// loses two; an attacker weak against the defender pays one more and the
/// defender loses one; any other matchup costs the defender one. With the
/// attacker's suit unknown the estimate assumes the defender loses two.
pub fn resolve(attacker: Option<Suit>, defender: Suit) -> Casualties {
    let Some(attacker) = attacker else {
        return Casualties {
            attacker: 1,
            defender: 2,
        };
    };
    if defender.is_weak_against(attacker) {
        Casualties {
            attacker: 1,
            defender: 2,
        }
    } else if attacker.is_weak_against(defender) {
        Casualties {
            attacker: 2,
            defender: 1,
        }
    } else {
        Casualties {
            attacker: 1,
            defender: 1,
        }
    }
}
