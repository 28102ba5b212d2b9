use std::{
    io::{
        self,
        Write,
    },
    sync::{
        Arc,
        Mutex,
    },
    thread,
    time::Duration,
};

use chrono::Local;
use clap::Parser;
use lexine::{
    ai::{
        degraded_mode,
        ContentProvider,
        Conversation,
    },
    core::{
        LexineError,
        PartOfSpeech,
        VocabularyItem,
    },
    scheduler::store::WordStore,
    session::{
        Completion,
        PracticeSession,
        SessionPhase,
    },
    settings::SettingsData,
    tasks::{
        TaskManager,
        TaskResult,
    },
};

#[derive(Parser)]
#[command(version, about = "Vocabulary practice with AI example sentences.")]
enum Command {
    /// Review due words as flashcards.
    Practice {
        /// Practice this word first, even if it is not due yet.
        #[arg(long)]
        word: Option<String>,
    },
    /// List stored words and their review schedule.
    List,
    /// Add a word to the collection. New words are due immediately.
    Add {
        term: String,
        translation: String,
        /// Part of speech (noun, verb, adjective, ...).
        #[arg(long, default_value = "other")]
        pos: String,
        /// An example sentence the word appeared in.
        #[arg(long)]
        context: Option<String>,
    },
    /// Talk with the language tutor.
    Chat,
}

pub fn entrypoint() -> Result<(), LexineError> {
    match Command::parse() {
        Command::Practice { word } => run_practice(word),
        Command::List => run_list(),
        Command::Add { term, translation, pos, context } => {
            run_add(term, translation, pos, context)
        }
        Command::Chat => run_chat(),
    }
}

fn run_practice(target_term: Option<String>) -> Result<(), LexineError> {
    let settings = SettingsData::load();
    let mut store = WordStore::load();
    let today = Local::now().date_naive();

    let target = match &target_term {
        Some(term) => Some(
            store
                .find_by_term(term)
                .map(|item| item.id)
                .ok_or_else(|| LexineError::Custom(format!("unknown word: {term}")))?,
        ),
        None => None,
    };

    let provider = Arc::new(ContentProvider::from_settings(&settings));
    let mut tasks = TaskManager::new();
    let mut session =
        PracticeSession::start(&store, target, today, settings.languages.clone(), provider, &tasks);

    loop {
        for result in tasks.poll_results() {
            if let TaskResult::ExampleReady { generation, outcome, .. } = result {
                session.content_ready(generation, outcome);
            }
        }

        match session.phase() {
            SessionPhase::Loading => thread::sleep(Duration::from_millis(50)),

            SessionPhase::Ready { revealed: false } => {
                match session.current_card(&store) {
                    Some(card) => {
                        println!();
                        println!("[{}/{}] {}", card.position, card.total, card.prompt);
                        println!("  {} ({})", card.term, card.part_of_speech.as_str());
                    }
                    None => continue,
                }
                print!("Press Enter to reveal (q to quit): ");
                if read_line()?.trim() == "q" {
                    break;
                }
                session.reveal();
            }

            SessionPhase::Ready { revealed: true } => {
                if let Some(card) = session.current_card(&store) {
                    println!("  = {}", card.answer);
                    if !card.note.is_empty() {
                        println!("  note: {}", card.note);
                    }
                }
                if degraded_mode() {
                    println!("  (placeholder content -- the AI service is unavailable)");
                }
                print!("Remembered? 0 = not at all, 2 = almost, 5 = yes, d = delete, q = quit: ");
                match read_line()?.trim() {
                    "q" => break,
                    "d" => session.delete_current(&mut store, &tasks)?,
                    "0" => session.score_current(0, &mut store, &settings.scheduler, today, &tasks)?,
                    "2" => session.score_current(2, &mut store, &settings.scheduler, today, &tasks)?,
                    "5" => session.score_current(5, &mut store, &settings.scheduler, today, &tasks)?,
                    _ => println!("Please answer 0, 2, 5, d or q."),
                }
            }

            SessionPhase::Complete(Completion::NothingDue) => {
                println!("Nothing to review today. Add words or come back tomorrow.");
                break;
            }

            SessionPhase::Complete(Completion::Finished) => {
                println!();
                println!("Practice complete! Reviewed {} cards.", session.reviewed());
                break;
            }
        }
    }

    store.save()?;
    Ok(())
}

fn run_list() -> Result<(), LexineError> {
    let store = WordStore::load();
    let today = Local::now().date_naive();

    if store.is_empty() {
        println!("No words yet. Add one with `lexine add <term> <translation>`.");
        return Ok(());
    }

    println!("{} words, {} due today:", store.len(), store.due_count(today));
    for item in store.items() {
        let due_marker = if item.is_due(today) { "  (due)" } else { "" };
        println!(
            "  {:<20} {:<20} {:<13} next review {}{}",
            item.term,
            item.translation,
            item.part_of_speech.as_str(),
            item.next_review,
            due_marker,
        );
    }
    Ok(())
}

fn run_add(
    term: String,
    translation: String,
    pos: String,
    context: Option<String>,
) -> Result<(), LexineError> {
    let mut store = WordStore::load();
    if store.find_by_term(&term).is_some() {
        return Err(LexineError::Custom(format!("\"{term}\" is already in the collection")));
    }

    let part_of_speech: PartOfSpeech = pos.parse()?;
    let today = Local::now().date_naive();

    let mut item = VocabularyItem::new(&term, &translation, part_of_speech, today);
    item.context = context;
    store.add(item);
    store.save()?;

    println!("Added \"{term}\". It is due for practice right away.");
    Ok(())
}

fn run_chat() -> Result<(), LexineError> {
    let settings = SettingsData::load();
    let provider = Arc::new(ContentProvider::from_settings(&settings));
    let conversation = Arc::new(Mutex::new(Conversation::open(provider, &settings.languages)));
    let mut tasks = TaskManager::new();

    println!(
        "Chatting with your {} tutor. Type a message, or q to quit.",
        settings.languages.learning
    );

    loop {
        print!("> ");
        let line = read_line()?;
        let message = line.trim();
        if message == "q" {
            break;
        }
        if message.is_empty() {
            continue;
        }

        tasks.send_chat_message(conversation.clone(), message.to_string());
        println!("{}", wait_for_reply(&mut tasks));
        if degraded_mode() {
            println!("(the tutoring service is unavailable right now)");
        }
    }
    Ok(())
}

fn wait_for_reply(tasks: &mut TaskManager) -> String {
    loop {
        for result in tasks.poll_results() {
            if let TaskResult::ChatReply { reply } = result {
                return reply;
            }
        }
        thread::sleep(Duration::from_millis(50));
    }
}

fn read_line() -> Result<String, LexineError> {
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
