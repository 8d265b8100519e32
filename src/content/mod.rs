//! Content module - post records, the post index, markdown and highlighting

mod highlight;
mod index;
mod markdown;
mod post;

pub use highlight::{Highlighter, NoHighlight, SyntectHighlighter};
pub use index::{PostIndex, Resolution};
pub use markdown::MarkdownRenderer;
pub use post::Post;
