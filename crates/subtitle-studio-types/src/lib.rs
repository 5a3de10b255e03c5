//! Shared subtitle data model with flat, easy-to-import modules.

pub mod normalize;
pub mod subtitle;
pub mod timecode;

pub use normalize::{clean_text, dedupe_and_sort, merge_overlapping};
pub use subtitle::{Subtitle, TimeField, renumber};
pub use timecode::{
    format_clock, format_edit_input, format_srt_timestamp, format_vtt_timestamp, parse_timestamp,
};
