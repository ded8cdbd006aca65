//! Subdivision and link records.
//!
//! Both entities are read fresh from the store at the start of every
//! analysis pass and are never mutated by the engine. Links are directed
//! (`from_id -> to_id`) and may reference subdivision ids that do not exist
//! in the loaded set; [`NameIndex`] resolves such references to a
//! placeholder label instead of failing.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Subdivision identifier, unique within a company.
pub type SubdivisionId = i64;

/// Link identifier.
pub type LinkId = i64;

/// Company identifier scoping every store query.
pub type CompanyId = i64;

// ---------------------------------------------------------------------------
// Value ranges
// ---------------------------------------------------------------------------

/// Closed numeric range accepted for a user-entered attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` when `value` is finite and inside `[min, max]`.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}; {}]", self.min, self.max)
    }
}

/// Subdivision resources `R_i`.
pub const RESOURCES_RANGE: ValueRange = ValueRange::new(0.0, 1_000_000.0);
/// KPI, as a percentage.
pub const KPI_RANGE: ValueRange = ValueRange::new(0.0, 100.0);
/// State `S_i` (load / risk indicator).
pub const STATE_RANGE: ValueRange = ValueRange::new(0.0, 1.0);
/// Link importance `W_ij`.
pub const IMPORTANCE_RANGE: ValueRange = ValueRange::new(0.0, 10.0);
/// Link delay `Δt_ij`, in hours.
pub const DELAY_RANGE: ValueRange = ValueRange::new(0.0, 72.0);

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A company subdivision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subdivision {
    pub id: SubdivisionId,
    /// Display-only name.
    pub name: String,
    pub resources: f64,
    /// Percentage in `[0, 100]`.
    pub kpi: f64,
    /// Risk / load indicator `S_i` in `[0, 1]`.
    pub state: f64,
}

/// A directed, weighted, delayed dependency from one subdivision to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub from_id: SubdivisionId,
    pub to_id: SubdivisionId,
    /// Weight `W_ij` in `[0, 10]`.
    pub importance: f64,
    /// Delay `Δt_ij` in hours, `[0, 72]`.
    pub delay: f64,
}

/// Attributes for a subdivision that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubdivision {
    pub name: String,
    pub resources: f64,
    pub kpi: f64,
    pub state: f64,
}

/// Attributes for a link that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewLink {
    pub from_id: SubdivisionId,
    pub to_id: SubdivisionId,
    pub importance: f64,
    pub delay: f64,
}

/// Consistent view of one company's records for a single analysis pass.
///
/// Callers must not mutate the underlying store while a snapshot is being
/// analyzed; the engine provides no isolation of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanySnapshot {
    /// Ordered by ascending id.
    pub subdivisions: Vec<Subdivision>,
    /// Ordered by ascending id.
    pub links: Vec<Link>,
}

impl CompanySnapshot {
    /// Returns `true` when the company has no subdivisions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subdivisions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

/// Placeholder label for a subdivision id that is not in the loaded set.
#[must_use]
pub fn placeholder_label(id: SubdivisionId) -> String {
    format!("ID{id}")
}

/// Id → subdivision lookup with a total label function.
#[derive(Debug, Clone, Default)]
pub struct NameIndex<'a> {
    by_id: HashMap<SubdivisionId, &'a Subdivision>,
}

impl<'a> NameIndex<'a> {
    #[must_use]
    pub fn new(subdivisions: &'a [Subdivision]) -> Self {
        Self {
            by_id: subdivisions.iter().map(|s| (s.id, s)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: SubdivisionId) -> Option<&'a Subdivision> {
        self.by_id.get(&id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: SubdivisionId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Name of `id`, or `ID{id}` when the reference dangles.
    #[must_use]
    pub fn label(&self, id: SubdivisionId) -> Cow<'a, str> {
        match self.get(id) {
            Some(sub) => Cow::Borrowed(sub.name.as_str()),
            None => Cow::Owned(placeholder_label(id)),
        }
    }
}
