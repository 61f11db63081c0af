//! Agents: interchangeable decision makers that act on a shared [`GameState`].
//!
//! - [`Agent`]: the call contract every policy satisfies (episode hooks,
//!   `take_action`, identity lookup).
//! - [`BaseAgent`]: identity only; always answers with [`Action::NoOp`].
//! - [`RandomAgent`]: identity plus a private [`RandomStream`].
//! - [`RndEnv`]: places tiles after each player move.
//! - [`Player`]: greedy one-ply slide selection.
//!
//! Quick start
//! ```
//! use ai_2048_agents::agent::{Agent, Player, RndEnv};
//! use ai_2048_agents::state::GameState;
//!
//! let mut env = RndEnv::new("seed=1").unwrap();
//! let mut player = Player::new("").unwrap();
//! let mut state = GameState::new();
//! env.open_episode("");
//! player.open_episode("");
//! for _ in 0..2 {
//!     env.take_action(&state).apply(&mut state);
//! }
//! let slide = player.take_action(&state);
//! assert!(slide.apply(&mut state) >= 0);
//! assert_eq!(player.role(), Some("player"));
//! ```

use tracing::debug;

use crate::action::Action;
use crate::error::AgentError;
use crate::state::GameState;

mod environment;
mod options;
mod player;
mod rng;

pub use environment::{RndEnv, TileBag};
pub use options::{AgentInfo, OptionValue};
pub use player::Player;
pub use rng::RandomStream;

/// Call contract shared by the environment and every player policy.
///
/// Only `info`/`info_mut` are required; the rest default to the behavior of
/// an agent that never acts.
pub trait Agent {
    fn info(&self) -> &AgentInfo;

    fn info_mut(&mut self) -> &mut AgentInfo;

    /// Called before the first action of an episode.
    fn open_episode(&mut self, _flag: &str) {}

    /// Called after the last action of an episode.
    fn close_episode(&mut self, _flag: &str) {}

    fn take_action(&mut self, _state: &GameState) -> Action { Action::NoOp }

    fn check_for_win(&self, _state: &GameState) -> bool { false }

    fn property(&self, key: &str) -> Option<&OptionValue> { self.info().property(key) }

    /// Merge one `key=value` (or bare flag) token into this agent's options.
    fn notify(&mut self, message: &str) {
        debug!(token = message, "agent notified");
        self.info_mut().upsert(message.trim());
    }

    fn name(&self) -> Option<&str> { self.info().name().and_then(OptionValue::as_str) }

    fn role(&self) -> Option<&str> { self.info().role().and_then(OptionValue::as_str) }
}

/// Agent with identity only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseAgent {
    info: AgentInfo,
}

impl BaseAgent {
    pub fn new(options: &str) -> Self { Self { info: AgentInfo::parse(options) } }
}

impl Agent for BaseAgent {
    fn info(&self) -> &AgentInfo { &self.info }

    fn info_mut(&mut self) -> &mut AgentInfo { &mut self.info }
}

/// Base for agents with random behavior.
///
/// Seeded from the `seed` option when present, from OS entropy otherwise.
/// All randomness goes through [`RandomAgent::choice`] and
/// [`RandomAgent::shuffle`], which advance only this agent's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomAgent {
    base: BaseAgent,
    stream: RandomStream,
}

impl RandomAgent {
    pub fn new(options: &str) -> Result<Self, AgentError> {
        let base = BaseAgent::new(options);
        let stream = match base.info.seed()? {
            Some(seed) => RandomStream::from_seed(seed),
            None => RandomStream::from_entropy(),
        };
        Ok(Self { base, stream })
    }

    pub fn choice<'a, T>(&mut self, seq: &'a [T]) -> Result<&'a T, AgentError> { self.stream.choice(seq) }

    pub fn shuffle<T>(&mut self, seq: &mut [T]) { self.stream.shuffle(seq) }

    pub fn stream(&self) -> &RandomStream { &self.stream }

    pub fn stream_mut(&mut self) -> &mut RandomStream { &mut self.stream }
}

impl Agent for RandomAgent {
    fn info(&self) -> &AgentInfo { &self.base.info }

    fn info_mut(&mut self) -> &mut AgentInfo { &mut self.base.info }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;

    #[test]
    fn base_agent_never_acts() {
        let mut agent = BaseAgent::new("");
        agent.open_episode("");
        let state = GameState::from_board(Board::from_raw(0x1000_0000_0000_0000));
        assert_eq!(agent.take_action(&state), Action::NoOp);
        assert!(!agent.check_for_win(&state));
        agent.close_episode("");
        agent.close_episode("");
        assert_eq!(agent.name(), Some("unknown"));
        assert_eq!(agent.role(), Some("unknown"));
    }

    #[test]
    fn notify_upserts_one_token() {
        let mut agent = BaseAgent::new("name=a");
        agent.notify("name=b");
        agent.notify("quiet");
        assert_eq!(agent.name(), Some("b"));
        assert_eq!(agent.property("quiet"), Some(&OptionValue::Flag));
        assert_eq!(agent.property("missing"), None);
    }

    #[test]
    fn random_agent_rejects_bad_seed() {
        assert_eq!(
            RandomAgent::new("seed=abc").unwrap_err(),
            AgentError::InvalidSeed("abc".to_string())
        );
    }

    #[test]
    fn random_agent_unseeded_still_draws() {
        let mut agent = RandomAgent::new("").unwrap();
        let items = [10, 20, 30];
        assert!(items.contains(agent.choice(&items).unwrap()));
    }

    #[test]
    fn random_agents_are_isolated_from_each_other() {
        let items: Vec<u32> = (0..1000).collect();
        let solo: Vec<u32> = {
            let mut a = RandomAgent::new("seed=1").unwrap();
            (0..20).map(|_| *a.choice(&items).unwrap()).collect()
        };
        let mut a = RandomAgent::new("seed=1").unwrap();
        let mut b = RandomAgent::new("seed=1").unwrap();
        let mut interleaved = Vec::new();
        for i in 0..20 {
            // b draws a varying number of times between a's draws
            for _ in 0..(i % 3) {
                let _ = b.choice(&items);
            }
            let mut scratch = [1, 2, 3, 4];
            b.shuffle(&mut scratch);
            interleaved.push(*a.choice(&items).unwrap());
        }
        assert_eq!(solo, interleaved);
    }

    #[test]
    fn random_agent_shuffle_keeps_elements() {
        let mut agent = RandomAgent::new("seed=4").unwrap();
        let mut xs = vec![3, 1, 4, 1, 5, 9, 2, 6];
        agent.shuffle(&mut xs);
        xs.sort();
        assert_eq!(xs, vec![1, 1, 2, 3, 4, 5, 6, 9]);
    }
}
