use super::TranscriptResult;

/// A processed reference together with its 1-based position in the submitted batch
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub index: usize,
    pub reference: String,
    pub result: TranscriptResult,
}

/// Caller-owned, insertion-ordered collection of results.
///
/// The same reference may appear more than once; every submission keeps its own entry.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    entries: Vec<StoredResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result and return the stored entry
    pub fn insert(&mut self, reference: String, result: TranscriptResult) -> &StoredResult {
        let index = self.entries.len() + 1;
        self.entries.push(StoredResult {
            index,
            reference,
            result,
        });
        &self.entries[index - 1]
    }

    /// Result of the first submission of `reference`
    pub fn get(&self, reference: &str) -> Option<&TranscriptResult> {
        self.entries
            .iter()
            .find(|entry| entry.reference == reference)
            .map(|entry| &entry.result)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a StoredResult;
    type IntoIter = std::slice::Iter<'a, StoredResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
