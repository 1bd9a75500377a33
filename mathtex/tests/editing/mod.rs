//! Editing flow tests
//!
//! Drive [`mathtex::MathPlugin`] the way a host editor would: content in, clicks and toolbar
//! presses, modal input, content out.

mod rendering;
mod sessions;
