//! Value Objects
//!
//! Taxonomy keys and run switches. Each taxonomy enum carries its own
//! read-only descriptive table via `info()`.

mod loss_circumstance;
mod loss_type;
mod personality_trait;
mod profile_selection;
mod support_preference;
mod time_since_loss;

pub use loss_circumstance::*;
pub use loss_type::*;
pub use personality_trait::*;
pub use profile_selection::*;
pub use support_preference::*;
pub use time_since_loss::*;
