use std::fmt;

use serde::{Deserialize, Serialize};

use super::ledger::{Ledger, Stats};
use super::GameError;

const SPEED_BONUS_PER_DEGREE: i32 = 80;
const LUCK_BONUS_PER_DEGREE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum UpgradeKind {
    Speed,
    Luck,
    Basket,
}

impl UpgradeKind {
    pub(crate) const ALL: [UpgradeKind; 3] =
        [UpgradeKind::Speed, UpgradeKind::Luck, UpgradeKind::Basket];

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            UpgradeKind::Speed => "speed",
            UpgradeKind::Luck => "luck",
            UpgradeKind::Basket => "basket",
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// How an upgrade's price grows after each purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub(crate) enum PriceGrowth {
    /// `price += price / 2`
    #[default]
    HalfAgain,
    FixedStep { step: u32 },
}

impl PriceGrowth {
    /// Always strictly greater than `price`.
    pub(crate) fn next_price(self, price: u32) -> u32 {
        let delta = match self {
            PriceGrowth::HalfAgain => price / 2,
            PriceGrowth::FixedStep { step } => step,
        };
        price.saturating_add(delta.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Affordability {
    Affordable,
    TooExpensive,
    Maxed,
}

/// Receipt for a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Purchase {
    pub(crate) kind: UpgradeKind,
    pub(crate) price_paid: u32,
    pub(crate) new_degree: u32,
    pub(crate) next_price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Upgrade {
    kind: UpgradeKind,
    price: u32,
    degree: u32,
    effect: i32,
    max_degree: Option<u32>,
    icon_key: &'static str,
    growth: PriceGrowth,
}

impl Upgrade {
    /// Effect is walking speed in px/s.
    pub(crate) fn speed(growth: PriceGrowth) -> Self {
        Self::new(UpgradeKind::Speed, 5, 200, Some(5), "upgrades/speed", growth)
    }

    /// Effect scales the golden-apple odds.
    pub(crate) fn luck(growth: PriceGrowth) -> Self {
        Self::new(UpgradeKind::Luck, 7, 1, Some(4), "upgrades/luck", growth)
    }

    /// Degree is the basket tier; the effect stays 0.
    pub(crate) fn basket(growth: PriceGrowth) -> Self {
        Self::new(UpgradeKind::Basket, 12, 0, Some(2), "upgrades/basket", growth)
    }

    fn new(
        kind: UpgradeKind,
        price: u32,
        effect: i32,
        max_degree: Option<u32>,
        icon_key: &'static str,
        growth: PriceGrowth,
    ) -> Self {
        Self {
            kind,
            price,
            degree: 0,
            effect,
            max_degree,
            icon_key,
            growth,
        }
    }

    pub(crate) fn kind(&self) -> UpgradeKind {
        self.kind
    }

    pub(crate) fn price(&self) -> u32 {
        self.price
    }

    pub(crate) fn degree(&self) -> u32 {
        self.degree
    }

    pub(crate) fn effect(&self) -> i32 {
        self.effect
    }

    pub(crate) fn max_degree(&self) -> Option<u32> {
        self.max_degree
    }

    pub(crate) fn icon_key(&self) -> &'static str {
        self.icon_key
    }

    pub(crate) fn is_maxed(&self) -> bool {
        self.max_degree.is_some_and(|max| self.degree >= max)
    }

    pub(crate) fn affordability(&self, excess_apples: u32) -> Affordability {
        if self.is_maxed() {
            Affordability::Maxed
        } else if excess_apples < self.price {
            Affordability::TooExpensive
        } else {
            Affordability::Affordable
        }
    }

    pub(crate) fn purchase(
        &mut self,
        ledger: &mut Ledger,
        stats: &mut Stats,
    ) -> Result<Purchase, GameError> {
        if let Some(max) = self.max_degree.filter(|max| self.degree >= *max) {
            return Err(GameError::MaxDegreeReached {
                kind: self.kind,
                max,
            });
        }
        ledger.spend(self.price)?;

        let price_paid = self.price;
        self.degree += 1;
        self.effect += match self.kind {
            UpgradeKind::Speed => SPEED_BONUS_PER_DEGREE,
            UpgradeKind::Luck => LUCK_BONUS_PER_DEGREE,
            UpgradeKind::Basket => 0,
        };
        self.price = self.growth.next_price(self.price);
        stats.upgrades_purchased += 1;

        Ok(Purchase {
            kind: self.kind,
            price_paid,
            new_degree: self.degree,
            next_price: self.price,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UpgradeSet {
    speed: Upgrade,
    luck: Upgrade,
    basket: Upgrade,
}

impl Default for UpgradeSet {
    fn default() -> Self {
        Self::new(PriceGrowth::default())
    }
}

impl UpgradeSet {
    pub(crate) fn new(growth: PriceGrowth) -> Self {
        Self {
            speed: Upgrade::speed(growth),
            luck: Upgrade::luck(growth),
            basket: Upgrade::basket(growth),
        }
    }

    pub(crate) fn get(&self, kind: UpgradeKind) -> &Upgrade {
        match kind {
            UpgradeKind::Speed => &self.speed,
            UpgradeKind::Luck => &self.luck,
            UpgradeKind::Basket => &self.basket,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: UpgradeKind) -> &mut Upgrade {
        match kind {
            UpgradeKind::Speed => &mut self.speed,
            UpgradeKind::Luck => &mut self.luck,
            UpgradeKind::Basket => &mut self.basket,
        }
    }

    pub(crate) fn total_degree(&self) -> u32 {
        UpgradeKind::ALL
            .iter()
            .map(|kind| self.get(*kind).degree())
            .sum()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        [&self.speed, &self.luck, &self.basket].into_iter()
    }
}
