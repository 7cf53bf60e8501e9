//! Provider registry for managing action providers.
//!
//! The [`ProviderRegistry`] maps units to the provider that decides their
//! actions.
//!
//! # Design
//!
//! - **Provider instances**: Stored by `ProviderKind`, shared across units
//! - **Unit mappings**: Each unit can be bound to a specific `ProviderKind`
//! - **Fallback chain**: Unit mapping → side default (allies: player,
//!   enemies: AI)

use std::collections::HashMap;
use std::sync::Arc;

use combat_core::{CombatUnit, Side, UnitId};

use super::{ActionProvider, ProviderKind, Result, RuntimeError};

/// Registry for managing action providers with unit-specific bindings.
///
/// ```text
/// ProviderRegistry
/// ├── providers: HashMap<ProviderKind, Provider>  (provider instances)
/// └── unit_mappings: HashMap<UnitId, ProviderKind>  (unit bindings)
/// ```
pub struct ProviderRegistry {
    /// Uses Arc instead of Box to allow cloning providers out of the registry
    providers: HashMap<ProviderKind, Arc<dyn ActionProvider>>,

    /// Unit-to-provider mappings (sparse - only non-default units)
    unit_mappings: HashMap<UnitId, ProviderKind>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            unit_mappings: HashMap::new(),
        }
    }

    /// Register a provider for a specific kind.
    ///
    /// If a provider already exists for this kind, it will be replaced.
    pub fn register(&mut self, kind: ProviderKind, provider: impl ActionProvider + 'static) {
        self.providers.insert(kind, Arc::new(provider));
    }

    /// Register an already shared provider.
    pub fn register_arc(&mut self, kind: ProviderKind, provider: Arc<dyn ActionProvider>) {
        self.providers.insert(kind, provider);
    }

    /// Bind a unit to a specific provider kind.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // let the AI fight for a party member
    /// registry.bind_unit(UnitId(2), ProviderKind::Ai);
    /// ```
    pub fn bind_unit(&mut self, unit: UnitId, kind: ProviderKind) {
        self.unit_mappings.insert(unit, kind);
    }

    /// Unbind a unit, reverting it to its side default.
    ///
    /// Returns the previous provider kind if it was bound.
    pub fn unbind_unit(&mut self, unit: UnitId) -> Option<ProviderKind> {
        self.unit_mappings.remove(&unit)
    }

    /// Provider kind for a unit: its binding, or its side default.
    pub fn kind_for(&self, unit: &CombatUnit) -> ProviderKind {
        self.unit_mappings
            .get(&unit.id)
            .copied()
            .unwrap_or(match unit.side() {
                Side::Allies => ProviderKind::Player,
                Side::Enemies => ProviderKind::Ai,
            })
    }

    /// Get a provider for a specific unit.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::ProviderNotSet` if the resolved provider kind
    /// has no registered provider instance.
    pub fn get_for_unit(&self, unit: &CombatUnit) -> Result<Arc<dyn ActionProvider>> {
        self.get(self.kind_for(unit))
    }

    /// Get a provider for a specific kind.
    pub fn get(&self, kind: ProviderKind) -> Result<Arc<dyn ActionProvider>> {
        self.providers
            .get(&kind)
            .cloned()
            .ok_or(RuntimeError::ProviderNotSet { kind })
    }

    /// Check if a provider is registered for a specific kind.
    pub fn has(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn binding_count(&self) -> usize {
        self.unit_mappings.len()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
