//! Display lines for the pick flow

use rand::Rng;

/// Shown alongside a selected restaurant
pub const CELEBRATION_MESSAGES: &[&str] = &[
    "Destiny has spoken! 🌟",
    "It is written in the stars! ✨",
    "The gods of gastronomy have decided! 🍽️",
    "Your stomach chose for you! 🤤",
    "Chance has good taste! 🎲",
    "A sign from the cosmos! 🌌",
    "Your next meal awaits! 🍴",
    "The culinary roulette has ruled! 🎰",
    "Off on a tasty adventure! 🚀",
    "The die is cast! 🎯",
    "Your taste buds will thank you! 😇",
    "The universe picked this one! 🌍",
    "Your palate has decided! 👅",
    "Pure magic, right? ✨",
    "Luck smiles on the hungry! 🍀",
    "Today's restaurant is served! ☀️",
    "It is written on your plate! 🍽️",
    "Culinary fate strikes! ⚡",
    "Time to discover something new! 🗺️",
    "Fortune favors the hungry! 😋",
];

/// Shown while the suspense delay runs
pub const LOADING_MESSAGES: &[&str] = &[
    "Consulting the stars... ⭐",
    "Shuffling the cards... 🃏",
    "Rolling the dice... 🎲",
    "Spinning the wheel... 🎰",
    "Gazing into the crystal ball... 🔮",
    "Asking the oracle... 🧙",
    "Reading the great book of flavors... 📚",
    "Turning the wheel of fortune... 🎡",
    "Drawing lots... 🎫",
    "Trusting my sixth sense... 👁️",
];

/// One line from `messages`, or an empty string if there are none
pub fn random_message<R: Rng>(messages: &[&'static str], rng: &mut R) -> &'static str {
    crate::pick_random_with(messages, rng).copied().unwrap_or_default()
}

pub fn celebration_message() -> &'static str {
    random_message(CELEBRATION_MESSAGES, &mut rand::rng())
}

pub fn loading_message() -> &'static str {
    random_message(LOADING_MESSAGES, &mut rand::rng())
}
