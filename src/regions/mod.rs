//! Region rule registry: account kinds, contribution limits, tax tables and
//! tax-drag constants for each supported jurisdiction

mod tables;
mod tax;

pub use tax::{DividendGainsParams, PieParams, TaxBracket, TaxDragKind, TaxDragModel, TaxRate};

use crate::error::{EngineError, EngineResult};
use crate::projection::FeeComponent;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Display metadata consumed by formatting collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMeta {
    pub name: String,
    /// ISO 4217 code
    pub currency: String,
    pub currency_symbol: String,
    /// BCP 47 locale tag
    pub locale: String,
}

/// A named bundle of fee components offered by a typical provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeePreset {
    pub name: String,
    pub components: Vec<FeeComponent>,
}

/// Immutable rule set for one jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRules {
    pub region_id: String,

    /// Valid account kinds, in display order
    pub account_kinds: Vec<String>,

    /// Annual contribution caps; an absent kind is unlimited
    pub contribution_limits: HashMap<String, f64>,

    /// Bracket id -> rates
    pub tax_brackets: BTreeMap<String, TaxBracket>,

    pub tax_drag: TaxDragModel,

    pub meta: RegionMeta,

    pub fee_presets: Vec<FeePreset>,
}

impl RegionRules {
    pub fn has_account_kind(&self, account_kind: &str) -> bool {
        self.account_kinds.iter().any(|k| k == account_kind)
    }

    /// Annual cap for an account kind, `None` when unlimited
    pub fn contribution_limit(&self, account_kind: &str) -> Option<f64> {
        self.contribution_limits.get(account_kind).copied()
    }

    pub fn bracket(&self, bracket_id: &str) -> Option<&TaxBracket> {
        self.tax_brackets.get(bracket_id)
    }

    pub fn tax_drag_kind(&self) -> TaxDragKind {
        self.tax_drag.kind()
    }

    pub fn preset(&self, name: &str) -> Option<&FeePreset> {
        self.fee_presets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Fixed set of supported regions
#[derive(Debug, Clone)]
pub struct RegionRegistry {
    regions: Vec<RegionRules>,
}

impl RegionRegistry {
    /// Registry holding every built-in region
    pub fn builtin() -> Self {
        Self {
            regions: tables::all_regions(),
        }
    }

    /// Look up a region by id (case-insensitive, surrounding whitespace ignored)
    pub fn get(&self, region_id: &str) -> EngineResult<&RegionRules> {
        let wanted = region_id.trim();
        self.regions
            .iter()
            .find(|r| r.region_id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownRegion(region_id.to_string()))
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.region_id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionRules> {
        self.regions.iter()
    }
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

static BUILTIN: OnceLock<RegionRegistry> = OnceLock::new();

/// Process-wide built-in registry, populated on first use
pub fn registry() -> &'static RegionRegistry {
    BUILTIN.get_or_init(RegionRegistry::builtin)
}

/// Rules for `region_id` from the built-in registry
pub fn get_region_rules(region_id: &str) -> EngineResult<&'static RegionRules> {
    registry().get(region_id)
}
