//! Domain models for the Farm Intelligence Pipeline

mod alert;
mod area;
mod crop;
mod suggestion;
mod weather;
mod yield_prediction;

pub use alert::*;
pub use area::*;
pub use crop::*;
pub use suggestion::*;
pub use weather::*;
pub use yield_prediction::*;
