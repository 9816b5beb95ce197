use crate::index::RowIndex;
use crate::transaction::ModifyKind;

/// Misuse of the two-phase mutation protocol.
///
/// These are host programming errors. The engine refuses the call and leaves
/// its state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyError {
    /// A `begin_*` call while another transaction is still open.
    TransactionOpen { open: ModifyKind, requested: ModifyKind },
    /// An `end_*` call that does not match the open transaction.
    ModeMismatch {
        open: Option<ModifyKind>,
        expected: ModifyKind,
    },
    /// `begin_*` parameters that do not fit the current geometry.
    OutOfRange {
        kind: ModifyKind,
        index: RowIndex,
        count: i32,
    },
}

impl std::fmt::Display for ModifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModifyError::TransactionOpen { open, requested } => {
                write!(f, "cannot begin {requested}: {open} is still open")
            }
            ModifyError::ModeMismatch {
                open: Some(open),
                expected,
            } => write!(f, "cannot end {expected}: the open transaction is {open}"),
            ModifyError::ModeMismatch {
                open: None,
                expected,
            } => write!(f, "cannot end {expected}: no transaction is open"),
            ModifyError::OutOfRange { kind, index, count } => {
                write!(f, "{kind} of {count} at {index} is out of range")
            }
        }
    }
}

impl std::error::Error for ModifyError {}
