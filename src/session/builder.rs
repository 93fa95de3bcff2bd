//! Match setup.

use super::game::Match;
use super::SessionError;
use crate::audit::StateAuditor;
use crate::cards::Card;
use crate::core::{
    EngineConfig, Faction, GameRng, GameState, PlayerId, PlayerPair, PlayerState, SelectorConfig,
};
use crate::events::{EventCatalog, EventSelector, SelectorState};
use crate::map::StateDirectory;
use crate::rules::TurnEngine;

/// Builder for a `Match`.
///
/// ```
/// use shadow_rules::session::MatchBuilder;
///
/// let game = MatchBuilder::new().seed(7).build().unwrap();
/// assert_eq!(game.state().turn, 1);
/// ```
pub struct MatchBuilder {
    seed: u64,
    factions: PlayerPair<Faction>,
    decks: PlayerPair<Vec<Card>>,
    starting_ip: u32,
    shuffle_decks: bool,
    audit_turns: bool,
    directory: Option<StateDirectory>,
    catalog: EventCatalog,
    engine_config: EngineConfig,
    selector_config: SelectorConfig,
}

impl Default for MatchBuilder {
    fn default() -> Self {
        Self {
            seed: 0,
            factions: PlayerPair::new(Faction::Truth, Faction::Government),
            decks: PlayerPair::default(),
            starting_ip: 0,
            shuffle_decks: true,
            audit_turns: cfg!(debug_assertions),
            directory: None,
            catalog: EventCatalog::new(),
            engine_config: EngineConfig::default(),
            selector_config: SelectorConfig::default(),
        }
    }
}

impl MatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn factions(mut self, p1: Faction, p2: Faction) -> Self {
        self.factions = PlayerPair::new(p1, p2);
        self
    }

    #[must_use]
    pub fn deck(mut self, player: PlayerId, cards: Vec<Card>) -> Self {
        self.decks[player] = cards;
        self
    }

    #[must_use]
    pub fn decks(self, p1: Vec<Card>, p2: Vec<Card>) -> Self {
        self.deck(PlayerId::P1, p1).deck(PlayerId::P2, p2)
    }

    #[must_use]
    pub fn starting_ip(mut self, ip: u32) -> Self {
        self.starting_ip = ip;
        self
    }

    /// Keep decks in the given order instead of shuffling them.
    #[must_use]
    pub fn shuffle_decks(mut self, shuffle: bool) -> Self {
        self.shuffle_decks = shuffle;
        self
    }

    /// Audit the state at every turn end. On by default in debug builds.
    #[must_use]
    pub fn audit_turns(mut self, audit: bool) -> Self {
        self.audit_turns = audit;
        self
    }

    /// Map to play on. Defaults to the US map.
    #[must_use]
    pub fn directory(mut self, directory: StateDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    #[must_use]
    pub fn catalog(mut self, catalog: EventCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    #[must_use]
    pub fn selector_config(mut self, config: SelectorConfig) -> Self {
        self.selector_config = config;
        self
    }

    /// Validate configuration, deal decks and start P1's first turn.
    pub fn build(self) -> Result<Match, SessionError> {
        self.engine_config.validate()?;
        let selector_config = self.selector_config.normalized()?;
        let directory = self.directory.unwrap_or_default();

        let mut rng = GameRng::new(self.seed);
        let [p1, p2] = PlayerId::ALL.map(|player| {
            let mut deck = self.decks[player].clone();
            if self.shuffle_decks {
                rng.shuffle(&mut deck);
            }
            PlayerState::new(player, self.factions[player])
                .with_ip(self.starting_ip)
                .with_deck(deck)
        });
        let state = GameState::for_map(&directory, p1, p2);

        let engine = TurnEngine::new(self.engine_config.clone());
        let auditor = self.audit_turns.then(|| StateAuditor::new(self.engine_config));
        let selector = EventSelector::new(self.catalog, selector_config).with_directory(directory);

        Ok(Match::start(engine, auditor, selector, SelectorState::new(), rng, state))
    }
}
