pub mod audit;
pub mod candidate_log;
pub mod dataset;
pub mod layout;
pub mod lists;

pub use candidate_log::CandidateLogger;
pub use layout::OutputLayout;
