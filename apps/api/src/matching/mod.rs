//! Resume/JD matching.
//!
//! Pipeline (per `/match` request):
//!   1. vocabulary — word tables that drive extraction
//!   2. keywords   — keyword and skill sets, keyword score
//!   3. roles      — role phrases, role score
//!   4. fusion     — semantic + keyword + role → final score
//!   5. ranking    — score every resume, stable sort best-first
//!
//! The JD is analyzed once per ranking call and reused for every resume.

pub mod fusion;
pub mod handlers;
pub mod keywords;
pub mod ranking;
pub mod roles;
pub mod vocabulary;

pub use fusion::{MatchEngine, WeightConfig};
pub use vocabulary::Vocabulary;
