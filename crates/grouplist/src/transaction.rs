//! The open/close state of a structural mutation.

use std::fmt;

use crate::error::ModifyError;
use crate::index::RowIndex;

/// Kind of structural mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifyKind {
    InsertItems,
    RemoveItems,
    InsertGroup,
    RemoveGroup,
}

impl fmt::Display for ModifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModifyKind::InsertItems => "insert-items",
            ModifyKind::RemoveItems => "remove-items",
            ModifyKind::InsertGroup => "insert-group",
            ModifyKind::RemoveGroup => "remove-group",
        })
    }
}

/// At most one mutation is open at a time. `begin` only latches the
/// parameters; the matching `end` applies them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transaction {
    #[default]
    Idle,
    Pending {
        kind: ModifyKind,
        index: RowIndex,
        count: i32,
    },
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        matches!(self, Transaction::Pending { .. })
    }

    pub fn open_kind(&self) -> Option<ModifyKind> {
        match self {
            Transaction::Idle => None,
            Transaction::Pending { kind, .. } => Some(*kind),
        }
    }

    /// Latches a new transaction.
    pub fn begin(&mut self, kind: ModifyKind, index: RowIndex, count: i32) -> Result<(), ModifyError> {
        if let Transaction::Pending { kind: open, .. } = *self {
            return Err(ModifyError::TransactionOpen {
                open,
                requested: kind,
            });
        }
        *self = Transaction::Pending { kind, index, count };
        Ok(())
    }

    /// Checks that `kind` is open and returns its latched index and count.
    /// The transaction stays open until [`Transaction::finish`].
    pub fn expect(&self, kind: ModifyKind) -> Result<(RowIndex, i32), ModifyError> {
        match *self {
            Transaction::Pending {
                kind: open,
                index,
                count,
            } if open == kind => Ok((index, count)),
            _ => Err(ModifyError::ModeMismatch {
                open: self.open_kind(),
                expected: kind,
            }),
        }
    }

    pub fn finish(&mut self) {
        *self = Transaction::Idle;
    }
}
