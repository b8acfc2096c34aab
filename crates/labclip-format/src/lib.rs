pub mod editor;
pub mod render;
pub mod token;

pub use editor::{EditorState, TemplateEditor};
pub use render::{RenderError, reference_display, render, render_strict};
pub use token::next_token_id;
