// compliance.rs: participation gate. consulted when a subscribe/redeem request is
// created, never at execution time. implementations decide who may invest.

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::types::ParticipantId;

pub trait Compliance {
    fn is_subscription_permitted(
        &self,
        participant: ParticipantId,
        give_quantity: Decimal,
        share_quantity: Decimal,
    ) -> bool;

    fn is_redemption_permitted(
        &self,
        participant: ParticipantId,
        share_quantity: Decimal,
        receive_quantity: Decimal,
    ) -> bool;
}

/// Permits everyone. The default for an open-ended fund.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCompliance;

impl Compliance for OpenCompliance {
    fn is_subscription_permitted(&self, _: ParticipantId, _: Decimal, _: Decimal) -> bool {
        true
    }

    fn is_redemption_permitted(&self, _: ParticipantId, _: Decimal, _: Decimal) -> bool {
        true
    }
}

/// Permits only an explicit participant list. Redemption is always allowed so a
/// delisted investor can still exit.
#[derive(Debug, Clone, Default)]
pub struct WhitelistCompliance {
    allowed: HashSet<ParticipantId>,
}

impl WhitelistCompliance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&mut self, participant: ParticipantId) {
        self.allowed.insert(participant);
    }

    pub fn revoke(&mut self, participant: ParticipantId) {
        self.allowed.remove(&participant);
    }
}

impl Compliance for WhitelistCompliance {
    fn is_subscription_permitted(&self, participant: ParticipantId, _: Decimal, _: Decimal) -> bool {
        self.allowed.contains(&participant)
    }

    fn is_redemption_permitted(&self, _: ParticipantId, _: Decimal, _: Decimal) -> bool {
        true
    }
}
