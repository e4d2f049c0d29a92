//! Program references and resolution.
//!
//! Programs (the content played in a window) belong to the caller. The
//! engine only asks for a reference once per logical program name and
//! records it on windows.
//!
//! # Logical Names
//! - Class entries: one program per weekday and period, named like the
//!   content file stem (`"3-7"` = Wednesday, period 7).
//! - Everything else: one program per category (`"recess"`, `"lunch"`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::Category;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Opaque program identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramRef(pub String);

impl ProgramRef {
    /// Creates a reference from an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a program is requested for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramKey {
    /// Category of the entry.
    pub category: Category,
    /// Period instance of the entry, if any.
    pub instance: Option<u32>,
    /// Weekday, set only for class programs (which differ per day).
    pub weekday: Option<u8>,
}

impl ProgramKey {
    /// Key for an entry of `category` placed on `weekday`.
    pub fn new(category: Category, instance: Option<u32>, weekday: u8) -> Self {
        let weekday = (category == Category::Class).then_some(weekday);
        Self {
            category,
            instance,
            weekday,
        }
    }

    /// Logical program name; the memoization key.
    pub fn name(&self) -> String {
        match (self.category, self.weekday, self.instance) {
            (Category::Class, Some(weekday), Some(instance)) => {
                format!("{}-{}", u32::from(weekday) + 1, instance)
            }
            (category, _, _) => category.as_str().to_string(),
        }
    }

    /// Human-readable name (e.g. `"Monday period 3"`).
    pub fn display_name(&self) -> String {
        match (self.category, self.weekday, self.instance) {
            (Category::Class, Some(weekday), Some(instance)) => {
                let day = WEEKDAY_NAMES
                    .get(usize::from(weekday))
                    .copied()
                    .unwrap_or("Day");
                format!("{day} period {instance}")
            }
            (category, _, _) => category.as_str().to_string(),
        }
    }
}

/// Resolves a program for a logical name.
///
/// Called by the consolidator at most once per [`ProgramKey::name`].
/// Any `FnMut(&ProgramKey) -> ProgramRef` closure is a resolver.
pub trait ProgramResolver {
    /// Returns the program to play for `key`.
    fn resolve(&mut self, key: &ProgramKey) -> ProgramRef;
}

impl<F> ProgramResolver for F
where
    F: FnMut(&ProgramKey) -> ProgramRef,
{
    fn resolve(&mut self, key: &ProgramKey) -> ProgramRef {
        self(key)
    }
}

/// Monotonic identifier sequence.
///
/// Injected wherever ids are allocated so runs are reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Creates a sequence whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Creates a sequence seeded from the current Unix time (seconds).
    ///
    /// Matches the id scheme expected by signage players, where ids double
    /// as creation stamps.
    pub fn from_clock() -> Self {
        let now = chrono::Utc::now().timestamp();
        Self::starting_at(u64::try_from(now).unwrap_or(0))
    }

    /// Allocates the next id.
    ///
    /// The sequence wraps to 0 after `u64::MAX`.
    pub fn next_id(&mut self) -> String {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id.to_string()
    }

    /// Peeks at the id the next call will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// A program registered for playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Allocated identifier.
    pub id: ProgramRef,
    /// Logical name (memoization key).
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Key the program was created for.
    pub key: ProgramKey,
}

/// Resolver that allocates a fresh id for every requested program and
/// keeps the created programs in request order.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Category, IdSequence, ProgramKey, ProgramRegistry, ProgramResolver};
///
/// let mut registry = ProgramRegistry::new(IdSequence::starting_at(100));
/// let key = ProgramKey::new(Category::Class, Some(3), 0);
/// assert_eq!(registry.resolve(&key).as_str(), "100");
/// assert_eq!(registry.programs()[0].name, "1-3");
/// ```
#[derive(Debug, Clone)]
pub struct ProgramRegistry {
    ids: IdSequence,
    programs: Vec<Program>,
}

impl ProgramRegistry {
    /// Creates an empty registry.
    pub fn new(ids: IdSequence) -> Self {
        Self {
            ids,
            programs: Vec::new(),
        }
    }

    /// Programs created so far, in creation order.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Finds a program by logical name.
    pub fn find(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.name == name)
    }

    /// Consumes the registry, returning its programs.
    pub fn into_programs(self) -> Vec<Program> {
        self.programs
    }
}

impl ProgramResolver for ProgramRegistry {
    fn resolve(&mut self, key: &ProgramKey) -> ProgramRef {
        let id = ProgramRef::new(self.ids.next_id());
        self.programs.push(Program {
            id: id.clone(),
            name: key.name(),
            display_name: key.display_name(),
            key: key.clone(),
        });
        id
    }
}
