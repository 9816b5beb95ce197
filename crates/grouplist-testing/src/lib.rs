//! Testing fixtures and harness for grouplist

pub mod fixture;
pub mod harness;

pub use fixture::*;
pub use harness::*;

pub mod prelude {
    pub use crate::fixture::*;
    pub use crate::harness::*;
    pub use grouplist::*;
}
