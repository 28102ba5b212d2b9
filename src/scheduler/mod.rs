pub mod store;

use std::collections::VecDeque;

use chrono::{
    Days,
    NaiveDate,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    LexineError,
    VocabularyItem,
    WordId,
};

/// Learner-reported confidence bucket. The display surface emits the raw
/// values 0 ("not at all"), 2 ("almost") and 5 ("yes"); anything else is
/// rejected at this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallScore {
    NotAtAll,
    Almost,
    Yes,
}

impl RecallScore {
    pub fn as_u8(&self) -> u8 {
        match self {
            RecallScore::NotAtAll => 0,
            RecallScore::Almost => 2,
            RecallScore::Yes => 5,
        }
    }
}

impl TryFrom<u8> for RecallScore {
    type Error = LexineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RecallScore::NotAtAll),
            2 => Ok(RecallScore::Almost),
            5 => Ok(RecallScore::Yes),
            other => Err(LexineError::InvalidScore(other)),
        }
    }
}

/// Interval growth tuning. The multipliers are a reconstruction, not a
/// contract; they live here so they can be adjusted from settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub max_interval_days: u32,
    pub almost_factor: f64,
    pub yes_factor: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_interval_days: 90, almost_factor: 1.3, yes_factor: 2.0 }
    }
}

/// Build the ordered review queue for one session: every item due today or
/// earlier, ascending by next review date, ties in insertion order. A target
/// item is placed first regardless of its due date and never duplicated; a
/// target id the collection does not contain is ignored. The queue is fixed
/// for the session's lifetime.
pub fn build_queue(
    items: &[VocabularyItem],
    target: Option<WordId>,
    today: NaiveDate,
) -> VecDeque<WordId> {
    let mut queue = VecDeque::new();

    let pinned = target.filter(|id| items.iter().any(|item| item.id == *id));
    if let Some(id) = pinned {
        queue.push_back(id);
    }

    let mut due: Vec<&VocabularyItem> = items
        .iter()
        .filter(|item| item.is_due(today) && Some(item.id) != pinned)
        .collect();
    due.sort_by_key(|item| item.next_review);
    queue.extend(due.into_iter().map(|item| item.id));

    queue
}

/// Reschedule an item after a recall score. The next review date always
/// moves forward; a failed card comes back tomorrow.
pub fn record_outcome(
    item: &mut VocabularyItem,
    score: RecallScore,
    today: NaiveDate,
    config: &SchedulerConfig,
) {
    let interval = match score {
        RecallScore::NotAtAll => 1,
        RecallScore::Almost => grow(item.interval, config.almost_factor, config.max_interval_days),
        RecallScore::Yes if item.interval == 0 => 2.min(config.max_interval_days),
        RecallScore::Yes => grow(item.interval, config.yes_factor, config.max_interval_days),
    };

    item.interval = interval;
    item.next_review = today + Days::new(u64::from(interval));
}

fn grow(interval: u32, factor: f64, cap: u32) -> u32 {
    let grown = (f64::from(interval) * factor).round() as u32;
    grown.clamp(1, cap)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::core::PartOfSpeech;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn item(term: &str, interval: u32, next_review: NaiveDate) -> VocabularyItem {
        let mut item = VocabularyItem::new(term, "translation", PartOfSpeech::Noun, next_review);
        item.interval = interval;
        item
    }

    #[test]
    fn test_queue_only_contains_due_items() {
        let items = vec![
            item("due", 1, today()),
            item("overdue", 3, today() - Days::new(2)),
            item("future", 5, today() + Days::new(3)),
        ];
        let queue = build_queue(&items, None, today());
        assert_eq!(queue.len(), 2);
        assert!(!queue.contains(&items[2].id));
    }

    #[test]
    fn test_queue_orders_by_next_review_then_insertion() {
        let items = vec![
            item("b", 1, today()),
            item("a", 1, today() - Days::new(3)),
            item("c", 1, today()),
        ];
        let queue: Vec<_> = build_queue(&items, None, today()).into();
        assert_eq!(queue, vec![items[1].id, items[0].id, items[2].id]);
    }

    #[test]
    fn test_pinned_target_comes_first_even_when_not_due() {
        let items = vec![
            item("due", 1, today()),
            item("pinned", 7, today() + Days::new(7)),
        ];
        let queue: Vec<_> = build_queue(&items, Some(items[1].id), today()).into();
        assert_eq!(queue, vec![items[1].id, items[0].id]);
    }

    #[test]
    fn test_pinned_target_is_not_duplicated_when_due() {
        let items = vec![item("due", 1, today()), item("pinned", 1, today())];
        let queue: Vec<_> = build_queue(&items, Some(items[1].id), today()).into();
        assert_eq!(queue, vec![items[1].id, items[0].id]);
    }

    #[test]
    fn test_unknown_target_is_ignored() {
        let items = vec![item("due", 1, today())];
        let queue = build_queue(&items, Some(uuid::Uuid::new_v4()), today());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0], items[0].id);
    }

    #[test]
    fn test_empty_collection_builds_an_empty_queue() {
        assert!(build_queue(&[], None, today()).is_empty());
    }

    #[test]
    fn test_failed_card_comes_back_tomorrow() {
        let config = SchedulerConfig::default();
        let mut word = item("dom", 30, today());
        record_outcome(&mut word, RecallScore::NotAtAll, today(), &config);
        assert_eq!(word.interval, 1);
        assert_eq!(word.next_review, today() + Days::new(1));
    }

    #[test]
    fn test_almost_grows_the_interval_by_a_third() {
        let config = SchedulerConfig::default();
        let mut word = item("dom", 10, today());
        record_outcome(&mut word, RecallScore::Almost, today(), &config);
        assert_eq!(word.interval, 13);
        assert_eq!(word.next_review, today() + Days::new(13));
    }

    #[test]
    fn test_almost_on_a_new_card_still_advances() {
        let config = SchedulerConfig::default();
        let mut word = item("dom", 0, today());
        record_outcome(&mut word, RecallScore::Almost, today(), &config);
        assert_eq!(word.interval, 1);
        assert_eq!(word.next_review, today() + Days::new(1));
    }

    #[test]
    fn test_yes_doubles_the_interval() {
        let config = SchedulerConfig::default();
        let mut word = item("dom", 10, today());
        record_outcome(&mut word, RecallScore::Yes, today(), &config);
        assert_eq!(word.interval, 20);
    }

    #[test]
    fn test_yes_on_a_new_card_means_two_days() {
        let config = SchedulerConfig::default();
        let mut word = item("dom", 0, today());
        record_outcome(&mut word, RecallScore::Yes, today(), &config);
        assert_eq!(word.interval, 2);
        assert_eq!(word.next_review, today() + Days::new(2));
    }

    #[test]
    fn test_interval_growth_is_capped() {
        let config = SchedulerConfig::default();
        let mut word = item("dom", 80, today());
        record_outcome(&mut word, RecallScore::Yes, today(), &config);
        assert_eq!(word.interval, 90);
    }

    #[test]
    fn test_next_review_always_moves_forward() {
        let config = SchedulerConfig::default();
        for (score, interval) in
            [(RecallScore::NotAtAll, 0), (RecallScore::NotAtAll, 40), (RecallScore::Almost, 4), (RecallScore::Yes, 4)]
        {
            let mut word = item("dom", interval, today());
            let before = word.next_review;
            record_outcome(&mut word, score, today(), &config);
            assert!(word.next_review > before, "score {:?} did not advance", score);
        }
    }

    #[test]
    fn test_repeated_yes_growth_is_monotonic() {
        let config = SchedulerConfig::default();
        let mut word = item("dom", 3, today());

        record_outcome(&mut word, RecallScore::Yes, today(), &config);
        let first = word.interval;
        let next_review = word.next_review;
        record_outcome(&mut word, RecallScore::Yes, next_review, &config);

        assert!(word.interval >= first * 2);
    }

    #[test]
    fn test_scores_other_than_0_2_5_are_rejected() {
        for raw in [1u8, 3, 4, 6, 255] {
            assert!(matches!(RecallScore::try_from(raw), Err(LexineError::InvalidScore(v)) if v == raw));
        }
        assert_eq!(RecallScore::try_from(5).unwrap(), RecallScore::Yes);
    }

    // The walkthrough from the engine description: A is new and due, B is
    // three days out. Only A is drilled; a "yes" pushes it two days.
    #[test]
    fn test_first_session_walkthrough() {
        let config = SchedulerConfig::default();
        let items = vec![item("a", 0, today()), item("b", 5, today() + Days::new(3))];

        let queue: Vec<_> = build_queue(&items, None, today()).into();
        assert_eq!(queue, vec![items[0].id]);

        let mut a = items[0].clone();
        record_outcome(&mut a, RecallScore::Yes, today(), &config);
        assert_eq!(a.interval, 2);
        assert_eq!(a.next_review, today() + Days::new(2));
    }
}
