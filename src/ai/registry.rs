use std::collections::BTreeMap;

use super::action::Action;
use super::order::Order;
use super::profile::Profile;
use super::stat::Stat;
use crate::error::AiError;

/// The fixed catalog of stats, actions, orders and profiles for one run.
///
/// Built once at startup and handed to the planner by reference, so several
/// independent simulations can coexist in one process.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    stats: Vec<Stat>,
    actions: Vec<Action>,
    orders: Vec<Order>,
    profiles: BTreeMap<String, Profile>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in stat, action and order, plus the standard profile.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for stat in Stat::ALL {
            registry.register_stat(stat);
        }
        for action in Action::ALL {
            registry.register_action(action);
        }
        for order in Order::ALL {
            registry.register_order(order);
        }
        registry.profiles.insert(Profile::standard().name.clone(), Profile::standard());
        registry
    }

    pub fn register_stat(&mut self, stat: Stat) {
        if !self.stats.contains(&stat) {
            self.stats.push(stat);
        }
    }

    pub fn register_action(&mut self, action: Action) {
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    pub fn register_order(&mut self, order: Order) {
        if !self.orders.contains(&order) {
            self.orders.push(order);
        }
    }

    /// Add a profile after checking it scores every registered stat and
    /// order. Replaces any profile of the same name.
    pub fn register_profile(&mut self, profile: Profile) -> Result<(), AiError> {
        for &stat in &self.stats {
            profile.stat_rule(stat)?;
        }
        for &order in &self.orders {
            profile.order_rule(order)?;
        }
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Stats in registration order.
    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    /// Actions in registration order, which is also the tie-break order of
    /// the planner's ranking.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, AiError> {
        self.profiles
            .get(name)
            .ok_or_else(|| AiError::UnknownProfile(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::STANDARD_PROFILE;

    #[test]
    fn standard_registry_is_complete_and_ordered() {
        let registry = Registry::standard();
        assert_eq!(registry.stats(), &Stat::ALL);
        assert_eq!(registry.actions(), &Action::ALL);
        assert_eq!(registry.orders(), &Order::ALL);
        assert!(registry.profile(STANDARD_PROFILE).is_ok());
    }

    #[test]
    fn registration_is_idempotent() {
        let mut registry = Registry::standard();
        registry.register_action(Action::Claim);
        registry.register_stat(Stat::Troops);
        assert_eq!(registry.actions().len(), Action::ALL.len());
        assert_eq!(registry.stats().len(), Stat::ALL.len());
    }

    #[test]
    fn incomplete_profiles_are_rejected() {
        let mut registry = Registry::standard();
        let mut profile = Profile::standard();
        profile.name = "forgetful".to_string();
        profile.orders.retain(|r| r.order != Order::Attack);
        assert_eq!(
            registry.register_profile(profile),
            Err(AiError::MissingOrderUtility(Order::Attack))
        );
        assert_eq!(
            registry.profile("forgetful").map(|p| p.name.clone()),
            Err(AiError::UnknownProfile("forgetful".to_string()))
        );
    }
}
