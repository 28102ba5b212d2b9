use crate::{
    ai::ExampleOutcome,
    core::WordId,
};

/// Results delivered back to the driving loop from worker threads.
#[derive(Debug, Clone)]
pub enum TaskResult {
    ExampleReady { generation: u64, item_id: WordId, outcome: ExampleOutcome },
    ChatReply { reply: String },
}
