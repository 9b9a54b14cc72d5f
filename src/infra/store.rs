// ============================================================
// Layer 6 — Note Store
// ============================================================
// Persists the two ingestion artifacts a generation run needs:
//
//   notes.json       — the full training token stream, used to
//                      rebuild the seed windows
//   vocabulary.json  — the ordered token list; position in the
//                      list IS the index the model was trained
//                      against, so it is restored verbatim and
//                      never re-derived
//
// Both are written immediately after ingestion, before the
// first training epoch, so a crash mid-training loses neither.
// Training writes them once per run; generation only reads.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json documentation

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::data::vocab::Vocabulary;
use crate::domain::error::ComposerError;

pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist the full training token stream.
    pub fn save_notes(&self, notes: &[String]) -> Result<()> {
        fs::create_dir_all(&self.dir).ok();
        let path = self.dir.join("notes.json");
        fs::write(&path, serde_json::to_string(notes)?)
            .with_context(|| format!("cannot write '{}'", path.display()))?;
        tracing::debug!("Saved {} notes to '{}'", notes.len(), path.display());
        Ok(())
    }

    /// Load the token stream of the most recent training run.
    pub fn load_notes(&self) -> Result<Vec<String>> {
        let path = self.dir.join("notes.json");
        if !path.exists() {
            return Err(ComposerError::ModelNotTrained(self.dir.display().to_string()).into());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("cannot read '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Persist the vocabulary as its ordered token list.
    pub fn save_vocab(&self, vocab: &Vocabulary) -> Result<()> {
        fs::create_dir_all(&self.dir).ok();
        let path = self.dir.join("vocabulary.json");
        fs::write(&path, serde_json::to_string(vocab.tokens())?)
            .with_context(|| format!("cannot write '{}'", path.display()))?;
        tracing::debug!("Saved vocabulary ({} tokens)", vocab.len());
        Ok(())
    }

    /// Restore the persisted vocabulary with its exact index order.
    pub fn load_vocab(&self) -> Result<Vocabulary> {
        let path = self.dir.join("vocabulary.json");
        if !path.exists() {
            return Err(ComposerError::ModelNotTrained(self.dir.display().to_string()).into());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("cannot read '{}'", path.display()))?;
        let tokens: Vec<String> = serde_json::from_str(&json)?;
        Ok(Vocabulary::from_tokens(tokens))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());

        let notes: Vec<String> = vec!["C4".into(), "0.4.7".into(), "E4".into()];
        store.save_notes(&notes).unwrap();
        assert_eq!(store.load_notes().unwrap(), notes);
    }

    #[test]
    fn test_vocab_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());

        let vocab = Vocabulary::build(&["G4".into(), "C4".into(), "E4".into()]);
        store.save_vocab(&vocab).unwrap();

        let restored = store.load_vocab().unwrap();
        assert_eq!(restored.tokens(), vocab.tokens());
        assert_eq!(restored.encode("E4").unwrap(), vocab.encode("E4").unwrap());
    }

    #[test]
    fn test_missing_artifacts_mean_model_not_trained() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());

        let err = store.load_notes().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ComposerError>(),
            Some(ComposerError::ModelNotTrained(_))
        ));
        assert!(store.load_vocab().is_err());
    }
}
