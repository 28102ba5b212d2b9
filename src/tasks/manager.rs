use std::{
    sync::{
        mpsc,
        Arc,
        Mutex,
    },
    thread,
};

use tokio::runtime::Runtime;

use super::TaskResult;
use crate::{
    ai::{
        ContentProvider,
        Conversation,
    },
    core::{
        LanguageConfig,
        WordId,
    },
};

/// Runs provider calls off the driving thread. Workers block on the shared
/// runtime and report back over a channel that the driving loop polls.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));

        let (sender, receiver) = mpsc::channel();

        Self { runtime, receiver, sender }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    /// Request example content for one queue head. The result is tagged with
    /// the generation number so the session can discard stale replies.
    pub fn generate_example(
        &self,
        provider: Arc<ContentProvider>,
        languages: LanguageConfig,
        item_id: WordId,
        term: String,
        generation: u64,
    ) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let outcome = runtime.block_on(provider.generate_example(&languages, &term));

            let _ = sender.send(TaskResult::ExampleReady { generation, item_id, outcome });
        });
    }

    pub fn send_chat_message(&self, conversation: Arc<Mutex<Conversation>>, message: String) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let reply = runtime.block_on(async {
                let mut conversation = conversation.lock().expect("conversation lock poisoned");
                conversation.send(&message).await
            });

            let _ = sender.send(TaskResult::ChatReply { reply });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;
    use crate::ai::{
        api::DEFAULT_MODEL,
        conversation::APOLOGY,
    };

    fn wait_for_result(tasks: &mut TaskManager) -> TaskResult {
        for _ in 0..200 {
            if let Some(result) = tasks.poll_results().pop() {
                return result;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("no task result arrived");
    }

    #[test]
    fn test_generated_examples_carry_their_generation_tag() {
        let mut tasks = TaskManager::new();
        let provider = Arc::new(ContentProvider::new(None, DEFAULT_MODEL));
        let id = Uuid::new_v4();

        tasks.generate_example(provider, LanguageConfig::default(), id, "dom".to_string(), 7);

        match wait_for_result(&mut tasks) {
            TaskResult::ExampleReady { generation, item_id, outcome } => {
                assert_eq!(generation, 7);
                assert_eq!(item_id, id);
                assert!(outcome.degraded_reason().is_some());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_chat_failures_come_back_as_apologies() {
        let mut tasks = TaskManager::new();
        let provider = Arc::new(ContentProvider::new(None, DEFAULT_MODEL));
        let conversation =
            Arc::new(Mutex::new(Conversation::open(provider, &LanguageConfig::default())));

        tasks.send_chat_message(conversation.clone(), "cześć".to_string());

        match wait_for_result(&mut tasks) {
            TaskResult::ChatReply { reply } => assert_eq!(reply, APOLOGY),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(conversation.lock().unwrap().transcript().is_empty());
    }
}
