pub mod claude;
pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use claude::Claude;
pub use error::AiError;
pub use gemini::Gemini;
pub use traits::{GenerationConfig, TextGenerator};
pub use util::{truncate_chars, truncate_to_char_boundary};
