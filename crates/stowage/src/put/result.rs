use std::sync::Arc;

use stowage_types::{Location, Target};

// ---------------------------------------------------------------------------
// PutResult
// ---------------------------------------------------------------------------

/// Outcome of putting one object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PutResult {
    /// A new record was created at `location`.
    Inserted { location: Location, affected: u64 },
    /// Existing records in `target` were updated.
    Updated { target: Target, affected: u64 },
}

impl PutResult {
    pub fn inserted(location: Location) -> Self {
        Self::Inserted {
            location,
            affected: 1,
        }
    }

    pub fn updated(target: Target, affected: u64) -> Self {
        Self::Updated { target, affected }
    }

    pub fn was_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }

    pub fn was_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    /// Number of rows this put touched.
    pub fn affected(&self) -> u64 {
        match self {
            Self::Inserted { affected, .. } | Self::Updated { affected, .. } => *affected,
        }
    }

    /// Location of the inserted record, `None` for updates.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Inserted { location, .. } => Some(location),
            Self::Updated { .. } => None,
        }
    }

    pub fn target(&self) -> &Target {
        match self {
            Self::Inserted { location, .. } => &location.target,
            Self::Updated { target, .. } => target,
        }
    }
}

// ---------------------------------------------------------------------------
// PutResults
// ---------------------------------------------------------------------------

/// Per-object outcomes of a collection put, aligned by position with the
/// input collection.
///
/// Identity is positional: an object appearing twice in the input has two
/// entries. Results are only ever produced for a fully successful put.
#[derive(Debug)]
pub struct PutResults<T> {
    objects: Arc<Vec<T>>,
    results: Vec<PutResult>,
}

impl<T> PutResults<T> {
    pub(crate) fn new(objects: Arc<Vec<T>>, results: Vec<PutResult>) -> Self {
        debug_assert_eq!(objects.len(), results.len());
        Self { objects, results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The input collection these results belong to (shared, not copied).
    pub fn objects(&self) -> &Arc<Vec<T>> {
        &self.objects
    }

    /// Outcomes in input order.
    pub fn results(&self) -> &[PutResult] {
        &self.results
    }

    /// Object and outcome at `index`.
    pub fn get(&self, index: usize) -> Option<(&T, &PutResult)> {
        Some((self.objects.get(index)?, self.results.get(index)?))
    }

    /// `(object, outcome)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &PutResult)> {
        self.objects.iter().zip(self.results.iter())
    }

    /// How many objects were inserted.
    pub fn number_of_inserts(&self) -> usize {
        self.results.iter().filter(|r| r.was_inserted()).count()
    }

    /// Total rows touched by updates.
    pub fn number_of_updates(&self) -> u64 {
        self.results
            .iter()
            .filter(|r| r.was_updated())
            .map(PutResult::affected)
            .sum()
    }
}

impl<T> Clone for PutResults<T> {
    fn clone(&self) -> Self {
        Self {
            objects: Arc::clone(&self.objects),
            results: self.results.clone(),
        }
    }
}
