//! Button handlers.

mod multi_prompt;
mod pronouns;

pub use multi_prompt::MultiPromptComponent;
pub use pronouns::PronounsComponent;
