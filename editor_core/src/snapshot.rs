//! Editor snapshot for deterministic replay tests

use crate::buffer::{Cursor, LineBuffer, TextBuffer};
use crate::router::KeyEventRouter;
use alloc::string::String;
use alloc::vec::Vec;
#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Buffer, cursor, and completion state after a key sequence
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct EditorSnapshot {
    pub buffer_lines: Vec<String>,
    pub cursor: Cursor,
    pub completion_open: bool,
    pub completion_prefix: String,
    pub candidates: Vec<String>,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl EditorSnapshot {
    pub fn capture(buffer: &LineBuffer, router: &KeyEventRouter) -> Self {
        let completion = router.completion();
        Self {
            buffer_lines: buffer.lines().to_vec(),
            cursor: buffer.cursor(),
            completion_open: completion.is_open(),
            completion_prefix: String::from(completion.prefix()),
            candidates: completion.candidates().to_vec(),
            undo_depth: buffer.undo_depth(),
            redo_depth: buffer.redo_depth(),
        }
    }

    /// Compute a deterministic hash of the snapshot state
    #[cfg(test)]
    pub fn hash(&self) -> u64 {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();

        for line in &self.buffer_lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }

        hasher.update(self.cursor.position.to_le_bytes());
        match self.cursor.anchor {
            Some(anchor) => {
                hasher.update([1]);
                hasher.update(anchor.to_le_bytes());
            }
            None => hasher.update([0]),
        }

        hasher.update([self.completion_open as u8]);
        hasher.update(self.completion_prefix.as_bytes());
        for candidate in &self.candidates {
            hasher.update(candidate.as_bytes());
            hasher.update(b"\0");
        }

        hasher.update(self.undo_depth.to_le_bytes());
        hasher.update(self.redo_depth.to_le_bytes());

        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        u64::from_le_bytes(bytes)
    }
}
