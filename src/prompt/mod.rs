//! Prompt: generation prompt composition.

pub mod composer;

pub use composer::PromptComposer;
