//! # MindMeld Core
//!
//! Core library for the MindMeld creative-writing assistant.
//!
//! This crate provides:
//! - A rotating pool of image-API keys with remote balance validation
//! - Heuristic extraction of character-description sentences from narrative
//! - Portrait prompt building, generation, and curated gallery fallback
//! - Literary styles and prompt construction for the text model
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mindmeld_core::{
//!     extract_descriptions, HttpBalanceProbe, KeyRotator, PortraitGenerator,
//!     PortraitStyle,
//! };
//!
//! async fn portraits_for(story: &str, keys: Vec<String>) -> Vec<String> {
//!     let rotator = KeyRotator::new(keys, HttpBalanceProbe::default());
//!     let generator = PortraitGenerator::new(rotator, "https://images.example/generate");
//!
//!     let mut portraits = Vec::new();
//!     for description in extract_descriptions(story) {
//!         portraits.push(generator.generate(&description, PortraitStyle::Anime).await);
//!     }
//!     portraits
//! }
//! ```

pub mod balance;
pub mod extract;
pub mod portrait;
pub mod rotation;
pub mod secret;
pub mod story;

// Re-export commonly used types at crate root
pub use balance::{
    BalanceProbe,
    HttpBalanceProbe,
    ProbeError,
    ProbeOutcome,
    DEFAULT_BALANCE_URL,
};

pub use extract::extract_descriptions;

pub use portrait::{
    fallback_portrait,
    portrait_prompt,
    PortraitError,
    PortraitGenerator,
    PortraitStyle,
    DEFAULT_PORTRAIT_URL,
};

pub use rotation::{
    KeyRotator,
    KeyStatus,
    UNKNOWN_CREDITS,
};

pub use secret::ApiKey;

pub use story::{
    brainstorm_system_prompt,
    reverse_prompt,
    story_prompt,
    LiteraryStyle,
    ALL_STYLES,
};
