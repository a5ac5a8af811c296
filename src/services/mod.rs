//! Service layer: the availability engine itself.
//!
//! `recurrence`, `busy` and `slots` are pure, side-effect-free
//! computations, safe to run fully in parallel across hosts and event
//! types. `availability` orchestrates them into the `GetSlots` seam, and
//! `committer` is the subsystem's only writer and only critical section.

pub mod availability;
pub mod busy;
pub mod committer;
pub mod recurrence;
pub mod slots;

pub use availability::{get_slots, AvailabilityError, SlotQuery, SlotQueryResponse};
pub use busy::AggregatedBusy;
pub use committer::{BookingCommitter, BookingRequest, CommitError};
pub use slots::{CandidateSlot, GeneratedSlots};
