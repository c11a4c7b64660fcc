//! Tool records and the operations that reconcile them
//!
//! Everything here is pure apart from [`AiMerger`], which talks to a
//! [`ModelGateway`](crate::llm::ModelGateway) and always falls back to
//! [`dedupe`] when the model cannot help.

mod dedupe;
mod merger;
mod parser;
pub mod prompts;
mod record;

pub use dedupe::dedupe;
pub use merger::{AiMerger, MergeOutcome, MergePath};
pub use parser::{parse_tools, strip_code_fence};
pub use record::ToolRecord;
