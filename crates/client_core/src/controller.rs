//! Orchestration of the "fetch player, then fetch advice" flow.
//!
//! The controller is the only owner of view state. Each action runs in two
//! steps: an entry transition taken under the state lock, then a single
//! network call with the lock released, then a completion transition. Every
//! issued call carries a sequence number and its completion is dropped unless
//! that number is still the latest for its action, so a slow earlier response
//! can never overwrite a newer one. Starting a player lookup also retires any
//! advice call in flight, because advice must never outlive the snapshot it was
//! requested against.

use std::sync::Arc;

use shared::{
    domain::PlayerTag,
    protocol::{PlayerAdvice, PlayerSnapshot},
};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::{error::ControllerError, schema::validate_snapshot, transport::AdviceApi};

#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Idle,
    RetrievingPlayer,
    PlayerLoaded {
        player: Arc<PlayerSnapshot>,
        advice: Option<Arc<PlayerAdvice>>,
    },
    RetrievingAdvice {
        player: Arc<PlayerSnapshot>,
        /// Result of the previous advice call; kept if this one fails.
        advice: Option<Arc<PlayerAdvice>>,
    },
}

/// Everything a view may render, published after every transition.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    player_tag: String,
    war_focus: bool,
    phase: Phase,
    error: Option<ControllerError>,
}

impl ControllerState {
    pub fn player_tag(&self) -> &str {
        &self.player_tag
    }

    pub fn war_focus(&self) -> bool {
        self.war_focus
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn player(&self) -> Option<&PlayerSnapshot> {
        match &self.phase {
            Phase::PlayerLoaded { player, .. } | Phase::RetrievingAdvice { player, .. } => {
                Some(player.as_ref())
            }
            Phase::Idle | Phase::RetrievingPlayer => None,
        }
    }

    pub fn advice(&self) -> Option<&PlayerAdvice> {
        match &self.phase {
            Phase::PlayerLoaded { advice, .. } | Phase::RetrievingAdvice { advice, .. } => {
                advice.as_deref()
            }
            Phase::Idle | Phase::RetrievingPlayer => None,
        }
    }

    pub fn loading_player(&self) -> bool {
        matches!(self.phase, Phase::RetrievingPlayer)
    }

    pub fn loading_advice(&self) -> bool {
        matches!(self.phase, Phase::RetrievingAdvice { .. })
    }

    pub fn can_fetch_advice(&self) -> bool {
        matches!(self.phase, Phase::PlayerLoaded { .. })
    }

    pub fn error(&self) -> Option<&ControllerError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ControllerError::message)
    }
}

/// What an action did to the published state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The call succeeded and its result is now displayed.
    Applied,
    /// The call failed and its error is now displayed.
    Failed,
    /// The tag was empty; no call was issued.
    Rejected,
    /// The action was not available in the current phase; nothing changed.
    Skipped,
    /// A newer call was issued before this one resolved; its result was dropped.
    Superseded,
}

struct Inner {
    view: ControllerState,
    player_seq: u64,
    advice_seq: u64,
}

/// Result of an entry transition: either a call to issue or an early outcome.
enum Entry<T> {
    Issued(T),
    Finished(ActionOutcome),
}

struct PlayerCall {
    seq: u64,
    tag: PlayerTag,
}

struct AdviceCall {
    seq: u64,
    tag: PlayerTag,
    war_focus: bool,
}

pub struct AdviceController<A: AdviceApi> {
    api: Arc<A>,
    inner: Mutex<Inner>,
    published: watch::Sender<ControllerState>,
}

impl<A: AdviceApi> AdviceController<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (published, _) = watch::channel(ControllerState::default());
        Self {
            api,
            inner: Mutex::new(Inner {
                view: ControllerState::default(),
                player_seq: 0,
                advice_seq: 0,
            }),
            published,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.published.subscribe()
    }

    pub fn snapshot(&self) -> ControllerState {
        self.published.borrow().clone()
    }

    pub async fn set_player_tag(&self, text: impl Into<String>) {
        let text = text.into();
        self.transition(|inner| inner.view.player_tag = text).await;
    }

    pub async fn set_war_focus(&self, war_focus: bool) {
        self.transition(|inner| inner.view.war_focus = war_focus).await;
    }

    pub async fn fetch_player(&self) -> ActionOutcome {
        let entry = self
            .transition(|inner| {
                // Either way, anything still in flight is now stale.
                inner.player_seq += 1;
                inner.advice_seq += 1;
                inner.view.phase = Phase::Idle;

                match parse_tag(&inner.view.player_tag) {
                    Ok(tag) => {
                        inner.view.phase = Phase::RetrievingPlayer;
                        inner.view.error = None;
                        Entry::Issued(PlayerCall {
                            seq: inner.player_seq,
                            tag,
                        })
                    }
                    Err(err) => {
                        inner.view.error = Some(err);
                        Entry::Finished(ActionOutcome::Rejected)
                    }
                }
            })
            .await;

        let PlayerCall { seq, tag } = match entry {
            Entry::Issued(call) => call,
            Entry::Finished(outcome) => return outcome,
        };

        info!(%tag, seq, "fetching player snapshot");
        let result = self.api.retrieve_player(&tag).await.and_then(|snapshot| {
            validate_snapshot(&snapshot)?;
            Ok(snapshot)
        });

        self.transition(|inner| {
            if inner.player_seq != seq {
                debug!(%tag, seq, latest = inner.player_seq, "discarding stale player response");
                return ActionOutcome::Superseded;
            }
            match result {
                Ok(snapshot) => {
                    info!(%tag, name = %snapshot.name, "player snapshot loaded");
                    inner.view.phase = Phase::PlayerLoaded {
                        player: Arc::new(snapshot),
                        advice: None,
                    };
                    ActionOutcome::Applied
                }
                Err(err) => {
                    warn!(%tag, "player lookup failed: {err}");
                    inner.view.phase = Phase::Idle;
                    inner.view.error = Some(ControllerError::from(err));
                    ActionOutcome::Failed
                }
            }
        })
        .await
    }

    pub async fn fetch_advice(&self) -> ActionOutcome {
        let entry = self
            .transition(|inner| {
                if let Err(err) = parse_tag(&inner.view.player_tag) {
                    inner.view.error = Some(err);
                    return Entry::Finished(ActionOutcome::Rejected);
                }

                let (player, advice) = match &inner.view.phase {
                    Phase::PlayerLoaded { player, advice }
                    | Phase::RetrievingAdvice { player, advice } => {
                        (Arc::clone(player), advice.clone())
                    }
                    Phase::Idle | Phase::RetrievingPlayer => {
                        return Entry::Finished(ActionOutcome::Skipped);
                    }
                };

                // Advice always targets the displayed snapshot, even if the
                // tag field was edited after it loaded.
                let tag = player.tag.clone();
                inner.advice_seq += 1;
                inner.view.phase = Phase::RetrievingAdvice { player, advice };
                inner.view.error = None;
                Entry::Issued(AdviceCall {
                    seq: inner.advice_seq,
                    tag,
                    war_focus: inner.view.war_focus,
                })
            })
            .await;

        let AdviceCall {
            seq,
            tag,
            war_focus,
        } = match entry {
            Entry::Issued(call) => call,
            Entry::Finished(outcome) => return outcome,
        };

        info!(%tag, seq, war_focus, "requesting advice");
        let result = self.api.retrieve_advice(&tag, war_focus).await;

        self.transition(|inner| {
            if inner.advice_seq != seq {
                debug!(%tag, seq, latest = inner.advice_seq, "discarding stale advice response");
                return ActionOutcome::Superseded;
            }
            let (player, advice) = match &inner.view.phase {
                Phase::RetrievingAdvice { player, advice } => (Arc::clone(player), advice.clone()),
                // Only a player lookup leaves this phase, and it retires our sequence.
                _ => return ActionOutcome::Superseded,
            };
            match result {
                Ok(fresh) => {
                    info!(%tag, "advice loaded");
                    inner.view.phase = Phase::PlayerLoaded {
                        player,
                        advice: Some(Arc::new(fresh)),
                    };
                    ActionOutcome::Applied
                }
                Err(err) => {
                    warn!(%tag, "advice request failed: {err}");
                    inner.view.phase = Phase::PlayerLoaded { player, advice };
                    inner.view.error = Some(ControllerError::from(err));
                    ActionOutcome::Failed
                }
            }
        })
        .await
    }

    async fn transition<R>(&self, apply: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock().await;
        let out = apply(&mut *inner);
        self.published.send_replace(inner.view.clone());
        out
    }
}

fn parse_tag(input: &str) -> Result<PlayerTag, ControllerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ControllerError::empty_tag());
    }
    Ok(PlayerTag::new(trimmed))
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
