pub mod record;
pub mod set;
pub mod store;

pub use record::Sequence;
pub use set::SequenceSet;
pub use store::SequenceInputs;
