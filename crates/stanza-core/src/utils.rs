//! Utility functions for rule implementations.

pub mod edits;
pub mod lines;
pub mod names;

#[doc(inline)]
pub use edits::{
    dot_access, insert_blank_line, is_identifier_name, remove_blank_lines, remove_list_element,
    remove_whole_line, BracketAccess,
};
#[doc(inline)]
pub use lines::{has_blank_line, has_line_break, Gap};
#[doc(inline)]
pub use names::NameSet;
