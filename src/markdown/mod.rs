//! Markdown rendering for question labels and hints.
//!
//! Supports the small dialect form designers use in XLSForm labels. It is
//! not CommonMark: rendering is a fixed sequence of regex substitutions and
//! the sequence itself defines the output.
//!
//! ## Pass Order
//!
//! 1. Escape raw `<`/`>`, then restore escaped `<span>`, `<sup>` and `<sub>`
//!    pairs ([`escape::protect_inline_tags`])
//! 2. Escape `&` and hide `\\`, `\*`, `\_`, `\#` behind placeholder codes
//! 3. Strong (`__x__`, `**x**`)
//! 4. Emphasis (`_x_`, `*x*`)
//! 5. Links (`[text](url)`)
//! 6. Headers (`#` to `######`)
//! 7. Unordered lists (`*`, `+`, `-`)
//! 8. Ordered lists (`1.`; a different first ordinal sets `start`)
//! 9. Restore placeholder codes
//! 10. Paragraphs for lines followed by a blank line
//! 11. `<br>` for remaining newlines
//!
//! Strong runs before emphasis so `**` is never read as two `*`. Any other
//! markup stays escaped and shows up as text.

pub mod escape;
mod patterns;
mod render;

pub use render::to_html;
