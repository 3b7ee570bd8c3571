//! Process-wide demand-card decks.
//!
//! Deck state (draw pile, discard pile, dealt set) is shared runtime state
//! outside the relational transaction. Callers that mutate a deck inside a
//! larger transaction must write through a [`DeckJournal`] so the changes
//! can be unwound when the transaction fails.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct DeckState {
    /// Top of the pile is the back of the vec.
    draw_pile: Vec<i64>,
    discard_pile: Vec<i64>,
    /// Cards currently held in some player's hand.
    dealt: HashSet<i64>,
}

/// Registry of per-game decks.
#[derive(Clone, Default)]
pub struct CardDecks {
    inner: Arc<DashMap<i64, Mutex<DeckState>>>,
}

impl CardDecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly shuffled deck for a game. The shuffle is seeded so
    /// a game replays identically from its persisted seed.
    pub fn init_game(&self, game_id: i64, mut card_ids: Vec<i64>, seed: i64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        card_ids.shuffle(&mut rng);
        debug!(game_id, cards = card_ids.len(), "deck initialized");
        self.inner.insert(
            game_id,
            Mutex::new(DeckState {
                draw_pile: card_ids,
                ..DeckState::default()
            }),
        );
    }

    fn with_state<R>(&self, game_id: i64, f: impl FnOnce(&mut DeckState) -> R) -> R {
        let entry = self.inner.entry(game_id).or_default();
        let mut state = entry.lock();
        f(&mut state)
    }

    /// Draw the top card, marking it dealt. None when the pile is empty.
    pub fn draw_card(&self, game_id: i64) -> Option<i64> {
        self.with_state(game_id, |state| {
            let card = state.draw_pile.pop()?;
            state.dealt.insert(card);
            Some(card)
        })
    }

    /// Move a dealt card onto the discard pile.
    pub fn discard_card(&self, game_id: i64, card_id: i64) {
        self.with_state(game_id, |state| {
            if state.dealt.remove(&card_id) {
                state.discard_pile.push(card_id);
            } else {
                warn!(game_id, card_id, "discard of a card that was not dealt");
            }
        })
    }

    /// Mark a card as dealt regardless of where it currently sits. Used when
    /// rebuilding deck state from persisted hands.
    pub fn ensure_dealt(&self, game_id: i64, card_id: i64) {
        self.with_state(game_id, |state| {
            state.draw_pile.retain(|c| *c != card_id);
            state.discard_pile.retain(|c| *c != card_id);
            state.dealt.insert(card_id);
        })
    }

    /// Compensation for a draw: put a dealt card back on top of the pile.
    pub fn return_dealt_card_to_top(&self, game_id: i64, card_id: i64) -> bool {
        self.with_state(game_id, |state| {
            if state.dealt.remove(&card_id) {
                state.draw_pile.push(card_id);
                true
            } else {
                false
            }
        })
    }

    /// Compensation for a discard: move a discarded card back to dealt.
    pub fn return_discarded_card_to_dealt(&self, game_id: i64, card_id: i64) -> bool {
        self.with_state(game_id, |state| {
            if let Some(pos) = state.discard_pile.iter().rposition(|c| *c == card_id) {
                state.discard_pile.remove(pos);
                state.dealt.insert(card_id);
                true
            } else {
                false
            }
        })
    }

    // Introspection, used by callers reporting deck state and by tests.

    pub fn draw_pile_len(&self, game_id: i64) -> usize {
        self.with_state(game_id, |state| state.draw_pile.len())
    }

    pub fn discard_pile_len(&self, game_id: i64) -> usize {
        self.with_state(game_id, |state| state.discard_pile.len())
    }

    pub fn is_dealt(&self, game_id: i64, card_id: i64) -> bool {
        self.with_state(game_id, |state| state.dealt.contains(&card_id))
    }

    pub fn top_of_draw_pile(&self, game_id: i64) -> Option<i64> {
        self.with_state(game_id, |state| state.draw_pile.last().copied())
    }
}

#[derive(Debug, Clone, Copy)]
enum DeckChange {
    Drew(i64),
    Discarded(i64),
    ReturnedToTop(i64),
    RestoredToDealt(i64),
}

/// Records deck mutations made inside one guarded operation so they can be
/// compensated when the surrounding transaction fails. Cloneable handle;
/// clones share the same change log.
#[derive(Clone)]
pub struct DeckJournal {
    decks: CardDecks,
    game_id: i64,
    changes: Arc<Mutex<Vec<DeckChange>>>,
}

impl DeckJournal {
    pub fn new(decks: &CardDecks, game_id: i64) -> Self {
        Self {
            decks: decks.clone(),
            game_id,
            changes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn draw_card(&self) -> Option<i64> {
        let card = self.decks.draw_card(self.game_id)?;
        self.changes.lock().push(DeckChange::Drew(card));
        Some(card)
    }

    pub fn discard_card(&self, card_id: i64) {
        self.decks.discard_card(self.game_id, card_id);
        self.changes.lock().push(DeckChange::Discarded(card_id));
    }

    pub fn return_dealt_card_to_top(&self, card_id: i64) -> bool {
        let ok = self.decks.return_dealt_card_to_top(self.game_id, card_id);
        if ok {
            self.changes.lock().push(DeckChange::ReturnedToTop(card_id));
        }
        ok
    }

    pub fn return_discarded_card_to_dealt(&self, card_id: i64) -> bool {
        let ok = self
            .decks
            .return_discarded_card_to_dealt(self.game_id, card_id);
        if ok {
            self.changes
                .lock()
                .push(DeckChange::RestoredToDealt(card_id));
        }
        ok
    }

    /// Reverse every recorded change, newest first. Called by the mutation
    /// guard after a failed transaction.
    pub fn unwind(&self) {
        let mut changes = self.changes.lock();
        if changes.is_empty() {
            return;
        }
        debug!(
            game_id = self.game_id,
            reverted = changes.len(),
            "unwinding deck changes after failed mutation"
        );
        while let Some(change) = changes.pop() {
            match change {
                DeckChange::Drew(card) => {
                    self.decks.return_dealt_card_to_top(self.game_id, card);
                }
                DeckChange::Discarded(card) => {
                    self.decks.return_discarded_card_to_dealt(self.game_id, card);
                }
                DeckChange::ReturnedToTop(card) => {
                    self.decks.ensure_dealt(self.game_id, card);
                }
                DeckChange::RestoredToDealt(card) => {
                    self.decks.discard_card(self.game_id, card);
                }
            }
        }
    }
}
