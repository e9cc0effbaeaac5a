//! Guard: content-shape rules applied to generated answers.

pub mod response_guard;

pub use response_guard::ResponseGuard;
