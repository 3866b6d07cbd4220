//! Domain model: users, letter types, letters, and content blocks.

pub mod block;
pub mod letter;
pub mod letter_type;
pub mod user;

pub use block::{BlockType, ContentBlock, NewContentBlock};
pub use letter::{Letter, LetterPublic, NewLetter, UpdateLetter};
pub use letter_type::{LetterType, NewLetterType, UpdateLetterType};
pub use user::User;
