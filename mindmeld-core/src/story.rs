//! Literary styles and prompt construction.
//!
//! Pure builders for the prompts MindMeld sends to its hosted text model:
//! story generation from a thought, reverse analysis of a story back into
//! its inspiring thought, and the brainstorm-partner system prompt. The
//! request plumbing around the text API lives with the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A literary style the user can write in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteraryStyle {
    SurrealShortStory,
    Murakami,
    Cyberpunk,
    Noir,
    PoeticMonologue,
    SciFiScreenplay,
    Shakespearean,
    FairyTale,
    EpicPoem,
    Horror,
}

/// All styles, in menu order.
pub const ALL_STYLES: [LiteraryStyle; 10] = [
    LiteraryStyle::SurrealShortStory,
    LiteraryStyle::Murakami,
    LiteraryStyle::Cyberpunk,
    LiteraryStyle::Noir,
    LiteraryStyle::PoeticMonologue,
    LiteraryStyle::SciFiScreenplay,
    LiteraryStyle::Shakespearean,
    LiteraryStyle::FairyTale,
    LiteraryStyle::EpicPoem,
    LiteraryStyle::Horror,
];

impl LiteraryStyle {
    /// Human-readable style name, as shown to users and embedded in prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SurrealShortStory => "Surreal Short Story",
            Self::Murakami => "Haruki Murakami",
            Self::Cyberpunk => "Cyberpunk",
            Self::Noir => "Noir",
            Self::PoeticMonologue => "Poetic Monologue",
            Self::SciFiScreenplay => "Sci-Fi Screenplay Scene",
            Self::Shakespearean => "Shakespearean",
            Self::FairyTale => "Classic Fairy Tale",
            Self::EpicPoem => "Epic Poem Snippet",
            Self::Horror => "Horror",
        }
    }

    /// Stable slug for CLI arguments and config values.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::SurrealShortStory => "surreal-short-story",
            Self::Murakami => "murakami",
            Self::Cyberpunk => "cyberpunk",
            Self::Noir => "noir",
            Self::PoeticMonologue => "poetic-monologue",
            Self::SciFiScreenplay => "sci-fi-screenplay",
            Self::Shakespearean => "shakespearean",
            Self::FairyTale => "fairy-tale",
            Self::EpicPoem => "epic-poem",
            Self::Horror => "horror",
        }
    }
}

impl std::fmt::Display for LiteraryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error parsing a literary style slug.
#[derive(Debug, Error)]
#[error("unknown literary style '{0}'")]
pub struct ParseLiteraryStyleError(String);

impl std::str::FromStr for LiteraryStyle {
    type Err = ParseLiteraryStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        ALL_STYLES
            .into_iter()
            .find(|style| style.slug() == wanted)
            .ok_or_else(|| ParseLiteraryStyleError(s.to_string()))
    }
}

/// Compose the story-generation prompt for a thought and style.
pub fn story_prompt(thought: &str, style: LiteraryStyle) -> String {
    format!(
        "You are an expert storyteller with a deep understanding of various literary \
         styles. Generate a creative piece in the style of {style} based on the following \
         thought, dream, or feeling. Expand on it, be imaginative, and capture the essence \
         of the chosen style. Avoid any introductory or concluding remarks like \"Here is \
         a story...\" or \"I hope you liked it.\". Just provide the creative piece directly.\n\
         \n\
         Thought/Dream/Feeling: \"{thought}\"\n\
         \n\
         Style: {style}\n\
         \n\
         Generated Piece:",
        style = style.display_name(),
        thought = thought,
    )
}

/// Compose the reverse-analysis prompt that infers the thought behind a story.
pub fn reverse_prompt(story: &str) -> String {
    format!(
        "This is a piece of creative writing. Please analyze it and try to describe the \
         core, concise thought, feeling, or dream fragment that might have inspired it. \
         Focus on the essence of the original inspiration. Provide only the inferred \
         thought, feeling, or dream fragment, without any extra phrases like \"The \
         original thought might have been...\".\n\
         \n\
         Story:\n\
         \"\"\"\n\
         {}\n\
         \"\"\"\n\
         \n\
         Inferred original inspiring thought/feeling/dream fragment:",
        story,
    )
}

/// System prompt for the brainstorm-partner chat persona.
pub fn brainstorm_system_prompt() -> &'static str {
    "You are MindMeld, a creative AI muse. Your goal is to help users explore and expand \
     their fleeting thoughts, dreams, or feelings into richer concepts for stories, poems, \
     or scripts. Engage in a thoughtful conversation, ask clarifying questions, offer \
     evocative suggestions, and help them uncover deeper meanings or narrative \
     possibilities in their ideas. Be encouraging and inspiring."
}
