pub mod errors;
pub mod event;
pub mod state;
pub mod table;

// -- Re-export structs for more concise usage

pub use errors::TableError;
pub use event::{Direction, EventCategory, PacketKind};
pub use state::CtState;
pub use table::{Transition, TransitionTable};
