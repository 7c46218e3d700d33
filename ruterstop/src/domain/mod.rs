//! Domain types for departure boards.
//!
//! A [`Departure`] is a plain value; the helpers here normalize upstream
//! text and turn timestamps into board countdowns.

mod departure;
mod text;
mod time;

pub use departure::{Departure, Direction, InvalidDirection};
pub use text::norwegian_ascii;
pub use time::{human_delta, minutes_until};
