use crate::errors::SpendError;

/// Money, score and lives for one session.
///
/// Money never goes negative, score never decreases, and lives stop at zero.
/// Everything here is driven by kill and leak events plus player spending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Economy {
    money: u32,
    score: u64,
    lives: u32,
    game_over: bool,
}

/// Result of `Economy::lose_life`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeLoss {
    pub remaining: u32,
    /// True only on the call that took lives to zero.
    pub game_over: bool,
}

impl Economy {
    pub fn new(money: u32, lives: u32) -> Self {
        Self {
            money,
            score: 0,
            lives,
            game_over: lives == 0,
        }
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn can_afford(&self, amount: u32) -> bool {
        self.money >= amount
    }

    /// Debits `amount`, or leaves money untouched when it is short.
    pub fn spend(&mut self, amount: u32) -> Result<u32, SpendError> {
        if self.money < amount {
            return Err(SpendError::InsufficientFunds {
                cost: amount,
                have: self.money,
            });
        }
        self.money -= amount;
        Ok(self.money)
    }

    pub fn earn(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    pub fn credit_kill(&mut self, money: u32, score: u64) {
        self.earn(money);
        self.score = self.score.saturating_add(score);
    }

    pub fn lose_life(&mut self) -> LifeLoss {
        if self.game_over {
            return LifeLoss {
                remaining: 0,
                game_over: false,
            };
        }
        self.lives = self.lives.saturating_sub(1);
        self.game_over = self.lives == 0;
        LifeLoss {
            remaining: self.lives,
            game_over: self.game_over,
        }
    }
}
