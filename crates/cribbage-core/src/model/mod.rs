pub mod card;
pub mod deck;
pub mod face;
pub mod hand;
pub mod snapshot;
pub mod suit;
