use crate::model::card::Card;
use crate::model::hand::{DealtHand, HandError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandSnapshot {
    pub cards: Vec<Card>,
    pub thrown: Vec<usize>,
}

impl HandSnapshot {
    pub fn capture(hand: &DealtHand) -> Self {
        let thrown = hand
            .thrown_flags()
            .iter()
            .enumerate()
            .filter(|(_, flag)| **flag)
            .map(|(index, _)| index)
            .collect();
        HandSnapshot {
            cards: hand.cards().to_vec(),
            thrown,
        }
    }

    pub fn restore(self) -> Result<DealtHand, HandError> {
        let mut hand = DealtHand::from_cards(self.cards)?;
        for index in self.thrown {
            hand.mark_thrown(index)?;
        }
        Ok(hand)
    }

    pub fn to_json(hand: &DealtHand) -> serde_json::Result<String> {
        let snapshot = Self::capture(hand);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::HandSnapshot;
    use crate::model::deck::Deck;
    use crate::model::hand::{DealtHand, HandError};

    #[test]
    fn snapshot_serializes_to_json() {
        let mut deck = Deck::standard();
        let mut hand = DealtHand::deal(&mut deck).unwrap();
        hand.mark_thrown(4).unwrap();
        let json = HandSnapshot::to_json(&hand).unwrap();
        assert!(json.contains("\"face\": \"Ace\""));
        assert!(json.contains("\"suit\": \"Clubs\""));
        assert!(json.contains("\"thrown\": [\n    4\n  ]"));
    }

    #[test]
    fn snapshot_roundtrip_restores_markers() {
        let mut deck = Deck::shuffled_with_seed(5);
        let mut hand = DealtHand::deal(&mut deck).unwrap();
        hand.apply_keep(&[0, 1, 3, 5]).unwrap();
        let restored = HandSnapshot::capture(&hand).restore().unwrap();
        assert_eq!(restored, hand);
        assert!(restored.is_valid());
    }

    #[test]
    fn restore_rejects_out_of_range_markers() {
        let legacy = r#"{
            "cards": [
                {"face": "Five", "suit": "Spades"},
                {"face": "Five", "suit": "Hearts"},
                {"face": "Five", "suit": "Diamonds"},
                {"face": "Jack", "suit": "Clubs"}
            ],
            "thrown": [7]
        }"#;
        let snapshot = HandSnapshot::from_json(legacy).unwrap();
        assert_eq!(snapshot.cards.len(), 4);
        assert_eq!(
            snapshot.restore(),
            Err(HandError::IndexOutOfRange { index: 7, size: 4 })
        );
    }
}
