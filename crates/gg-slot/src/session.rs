//! Game session: the reel spin/stop/settlement state machine
//!
//! One session owns the balance, the three reels, the prize ledger and the
//! purchase modal. Commands mutate it sequentially; timers are driven by
//! `advance`. Every balance or ledger change is persisted, and every state
//! change is rendered through the injected `GameUi`.

use gg_state::{KeyValueStore, PersistenceGateway};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandOutcome};
use crate::config::SlotConfig;
use crate::error::{ExchangeError, PurchaseError};
use crate::message::GameMessage;
use crate::paytable::REEL_COUNT;
use crate::prizes::{Prize, PrizeLedger, PrizeView};
use crate::purchase::{PurchaseGate, PurchaseModal};
use crate::random::{RandomSource, RngSource};
use crate::reel::Reel;
use crate::spin::{ReelStop, Settlement};
use crate::symbols::Symbol;
use crate::timing::{Scheduler, TimerEvent};
use crate::ui::{GameUi, SessionSnapshot};

/// Per-process statistics, not persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Settled lever-pull cycles
    pub plays: u64,
    pub total_bet: u64,
    pub total_won: u64,
    pub wins: u64,
    /// Cycles settled with the bonus armed
    pub bonus_hits: u64,
    pub coins_purchased: u64,
    pub prizes_exchanged: u64,
}

impl SessionStats {
    /// Return-to-player percentage
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_won as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Percentage of plays that paid
    pub fn hit_rate(&self) -> f64 {
        if self.plays > 0 {
            (self.wins as f64 / self.plays as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Slot machine session
pub struct GameSession {
    config: SlotConfig,
    gate: PurchaseGate,
    coins: u64,
    /// Coins inserted, lever not yet pulled
    insertion_active: bool,
    bonus_armed: bool,
    lamp_active: bool,
    reels: [Reel; REEL_COUNT],
    message: GameMessage,
    ledger: PrizeLedger,
    purchase: PurchaseModal,
    scheduler: Scheduler,
    /// Final symbols and the bonus trial
    source: Box<dyn RandomSource>,
    /// Visual churn only, never a result
    churn_rng: ChaCha8Rng,
    persistence: PersistenceGateway,
    ui: Box<dyn GameUi>,
    stats: SessionStats,
    last_settlement: Option<Settlement>,
}

impl GameSession {
    /// Create a session and load persisted state
    pub fn new(config: SlotConfig, store: Box<dyn KeyValueStore>, ui: Box<dyn GameUi>) -> Self {
        Self::with_source(config, store, ui, Box::new(RngSource::from_os_rng()))
    }

    /// Create with a specific outcome source
    pub fn with_source(
        config: SlotConfig,
        store: Box<dyn KeyValueStore>,
        ui: Box<dyn GameUi>,
        source: Box<dyn RandomSource>,
    ) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Running with invalid slot config: {}", e);
        }

        let persistence = PersistenceGateway::new(store);
        let saved = persistence.load();

        let mut ledger = PrizeLedger::new(config.prizes.clone());
        ledger.apply_records(&saved.prizes);

        log::info!(
            "Session started: {} coins, {}/{} prizes collected",
            saved.coins,
            ledger.collected().count(),
            ledger.prizes().len()
        );

        let mut session = Self {
            gate: PurchaseGate::new(config.key_multiplier),
            config,
            coins: saved.coins,
            insertion_active: false,
            bonus_armed: false,
            lamp_active: false,
            reels: [Reel::new(0), Reel::new(1), Reel::new(2)],
            message: GameMessage::Welcome,
            ledger,
            purchase: PurchaseModal::default(),
            scheduler: Scheduler::new(),
            source,
            churn_rng: ChaCha8Rng::from_os_rng(),
            persistence,
            ui,
            stats: SessionStats::default(),
            last_settlement: None,
        };
        session.render();
        session
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn insertion_active(&self) -> bool {
        self.insertion_active
    }

    pub fn bonus_armed(&self) -> bool {
        self.bonus_armed
    }

    pub fn lamp_active(&self) -> bool {
        self.lamp_active
    }

    pub fn reels(&self) -> &[Reel; REEL_COUNT] {
        &self.reels
    }

    pub fn any_spinning(&self) -> bool {
        self.reels.iter().any(Reel::is_spinning)
    }

    pub fn message(&self) -> &GameMessage {
        &self.message
    }

    pub fn ledger(&self) -> &PrizeLedger {
        &self.ledger
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.last_settlement.as_ref()
    }

    /// Virtual time of the session clock
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> SessionSnapshot {
        let spinning = self.any_spinning();
        SessionSnapshot {
            coins: self.coins,
            reels: [self.reels[0].view(), self.reels[1].view(), self.reels[2].view()],
            lamp_active: self.lamp_active,
            insert_enabled: !self.insertion_active
                && !spinning
                && self.coins >= self.config.play_cost,
            lever_enabled: self.insertion_active && !spinning,
            message: self.message.to_string(),
            purchasable: self
                .ledger
                .purchasable()
                .map(|p| PrizeView {
                    id: p.id,
                    name: p.name.clone(),
                    cost: p.cost,
                    affordable: self.coins >= p.cost,
                })
                .collect(),
            collected: self.ledger.collected().map(|p| p.name.clone()).collect(),
            purchase: self.purchase.view(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REEL CYCLE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Pay for one play. Returns false if nothing changed.
    pub fn insert(&mut self) -> bool {
        if self.insertion_active || self.any_spinning() {
            return false;
        }
        if self.coins < self.config.play_cost {
            self.message = GameMessage::InsufficientCoins;
            self.render();
            return false;
        }

        self.coins -= self.config.play_cost;
        self.insertion_active = true;
        self.lamp_active = false;
        self.message = GameMessage::PullLever;
        self.stats.total_bet += self.config.play_cost;
        log::debug!("Inserted {} coins, {} left", self.config.play_cost, self.coins);

        self.persist_coins();
        self.render();
        true
    }

    /// Start all reels. Returns false unless coins are inserted and no reel
    /// is spinning.
    pub fn pull_lever(&mut self) -> bool {
        if !self.insertion_active || self.any_spinning() {
            return false;
        }

        self.bonus_armed = self.source.chance(self.config.bonus_probability);
        self.insertion_active = false;

        let tick = self.config.timing.spin_tick_ms;
        for reel in self.reels.iter_mut() {
            let timer = self
                .scheduler
                .schedule_repeating(tick, TimerEvent::SpinTick { reel: reel.index() });
            reel.start(timer);
        }

        if self.bonus_armed {
            // Fires even if the reels settle first
            self.scheduler
                .schedule_once(self.config.timing.bonus_lamp_delay_ms, TimerEvent::BonusLamp);
            log::debug!("Bonus armed");
        }

        self.message = GameMessage::StopReels;
        self.render();
        true
    }

    /// Stop reel `index`. `None` if it is not spinning.
    ///
    /// With the bonus armed the bonus reel (index 2 by default) always lands
    /// on the bonus symbol, whatever the stop order. The stop that halts the
    /// last spinning reel settles the cycle.
    pub fn stop(&mut self, index: usize) -> Option<ReelStop> {
        if !self.reels.get(index)?.is_spinning() {
            return None;
        }

        let symbol = if self.bonus_armed && index == self.config.bonus_reel {
            self.config.bonus_symbol
        } else {
            self.source.symbol()
        };

        if let Some(timer) = self.reels[index].halt(symbol) {
            self.scheduler.cancel(timer);
        }
        log::debug!("Reel {} stopped on {}", index, symbol);

        let settlement = match self.settled_outcome() {
            Some(symbols) if !self.any_spinning() => Some(self.settle(symbols)),
            _ => {
                self.render();
                None
            }
        };

        Some(ReelStop {
            reel: index,
            symbol,
            settlement,
        })
    }

    fn settled_outcome(&self) -> Option<[Symbol; REEL_COUNT]> {
        let [a, b, c] = &self.reels;
        Some([a.settled()?, b.settled()?, c.settled()?])
    }

    fn settle(&mut self, symbols: [Symbol; REEL_COUNT]) -> Settlement {
        let win = self.config.paytable.find_match(&symbols);
        let payout = win.map(|w| w.rule.payout).unwrap_or(0);

        self.coins = self.coins.saturating_add(payout);
        self.insertion_active = false;
        self.message = if payout > 0 {
            GameMessage::Win(payout)
        } else {
            GameMessage::NoWin
        };

        self.stats.plays += 1;
        self.stats.total_won += payout;
        if payout > 0 {
            self.stats.wins += 1;
        }
        if self.bonus_armed {
            self.stats.bonus_hits += 1;
        }

        log::info!(
            "Settled [{} {} {}]: {} coins (balance {})",
            symbols[0],
            symbols[1],
            symbols[2],
            payout,
            self.coins
        );

        let settlement = Settlement {
            symbols,
            payout,
            win,
            bonus: self.bonus_armed,
        };
        self.last_settlement = Some(settlement);

        self.persist_coins();
        self.render();
        settlement
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TIMERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Let `delta_ms` of virtual time pass and handle every timer that came
    /// due. Returns the number of timers fired.
    pub fn advance(&mut self, delta_ms: u64) -> usize {
        let fired = self.scheduler.advance(delta_ms);
        if fired.is_empty() {
            return 0;
        }

        for timer in &fired {
            match timer.event {
                TimerEvent::SpinTick { reel } => {
                    let symbol = Symbol::from_index(self.churn_rng.random_range(0..Symbol::COUNT));
                    if let Some(reel) = self.reels.get_mut(reel) {
                        reel.churn(symbol);
                    }
                }
                TimerEvent::BonusLamp => {
                    self.lamp_active = true;
                    log::debug!("GOGO lamp on at {} ms", timer.at_ms);
                }
                TimerEvent::PurchaseClose => self.purchase.on_close_timer(timer.id),
            }
        }

        self.render();
        fired.len()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PRIZES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Exchange coins for a prize after the player confirms
    pub fn exchange(&mut self, prize_id: u32) -> Result<Prize, ExchangeError> {
        let prize = match self.ledger.check(prize_id, self.coins) {
            Ok(prize) => prize.clone(),
            Err(e) => {
                self.message = match &e {
                    ExchangeError::InsufficientFunds { cost, .. } => {
                        GameMessage::CannotAfford { cost: *cost }
                    }
                    _ => GameMessage::NotExchangeable,
                };
                self.render();
                return Err(e);
            }
        };

        let prompt = format!("Exchange {} coins for \"{}\"?", prize.cost, prize.name);
        if !self.ui.confirm(&prompt) {
            self.message = GameMessage::ExchangeDeclined;
            self.render();
            return Err(ExchangeError::Declined(prize_id));
        }

        self.coins -= prize.cost;
        self.ledger.mark_collected(prize_id);
        self.stats.prizes_exchanged += 1;
        self.message = GameMessage::PrizeExchanged(prize.name.clone());
        log::info!("Exchanged {} coins for prize {} ({})", prize.cost, prize.id, prize.name);

        self.persist_coins();
        self.persist_prizes();
        self.render();

        Ok(Prize {
            collected: true,
            ..prize
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // COIN PURCHASE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Show the purchase modal for a preset amount
    pub fn open_purchase(&mut self, amount: u64) {
        self.purchase.open(amount);
        self.render();
    }

    /// Hide the purchase modal
    pub fn close_purchase(&mut self) {
        if let Some(timer) = self.purchase.close() {
            self.scheduler.cancel(timer);
        }
        self.render();
    }

    /// Credit `amount` coins if the serial key matches
    pub fn confirm_purchase(&mut self, amount: u64, entered_key: &str) -> Result<u64, PurchaseError> {
        match self.gate.verify(amount, entered_key) {
            Ok(credited) => {
                self.coins = self.coins.saturating_add(credited);
                self.stats.coins_purchased += credited;
                self.purchase
                    .set_message(GameMessage::CoinsPurchased(credited).to_string());

                let timer = self.scheduler.schedule_once(
                    self.config.timing.purchase_close_delay_ms,
                    TimerEvent::PurchaseClose,
                );
                if let Some(previous) = self.purchase.arm_close(timer) {
                    self.scheduler.cancel(previous);
                }
                log::info!("Purchased {} coins (balance {})", credited, self.coins);

                self.persist_coins();
                self.render();
                Ok(credited)
            }
            Err(e) => {
                let message = match e {
                    PurchaseError::WrongKey => GameMessage::WrongSerialKey,
                    PurchaseError::InvalidAmount(_) => GameMessage::InvalidPurchase,
                };
                self.purchase.set_message(message.to_string());
                log::debug!("Purchase of {} rejected: {}", amount, e);
                self.render();
                Err(e)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DISPATCH
    // ═══════════════════════════════════════════════════════════════════════════

    /// Route a front-end command
    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Insert => {
                if self.insert() {
                    CommandOutcome::Inserted
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::PullLever => {
                if self.pull_lever() {
                    CommandOutcome::LeverPulled
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::Stop(index) => self
                .stop(index)
                .map(CommandOutcome::Stopped)
                .unwrap_or(CommandOutcome::Ignored),
            Command::Exchange(id) => match self.exchange(id) {
                Ok(prize) => CommandOutcome::Exchanged(prize),
                Err(e) => CommandOutcome::ExchangeFailed(e),
            },
            Command::OpenPurchase(amount) => {
                self.open_purchase(amount);
                CommandOutcome::PurchaseOpened
            }
            Command::ConfirmPurchase { amount, key } => match self.confirm_purchase(amount, &key) {
                Ok(credited) => CommandOutcome::Purchased(credited),
                Err(e) => CommandOutcome::PurchaseFailed(e),
            },
            Command::ClosePurchase => {
                self.close_purchase();
                CommandOutcome::PurchaseClosed
            }
            Command::Advance(ms) => CommandOutcome::Advanced(self.advance(ms)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNALS
    // ═══════════════════════════════════════════════════════════════════════════

    fn render(&mut self) {
        let snapshot = self.snapshot();
        self.ui.render(&snapshot);
    }

    fn persist_coins(&mut self) {
        if let Err(e) = self.persistence.save_coins(self.coins) {
            log::warn!("Failed to persist coin balance: {}", e);
        }
    }

    fn persist_prizes(&mut self) {
        let records = self.ledger.records();
        if let Err(e) = self.persistence.save_prizes(&records) {
            log::warn!("Failed to persist prize ledger: {}", e);
        }
    }
}
