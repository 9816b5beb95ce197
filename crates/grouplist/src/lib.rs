//! Virtualized grouped list engine.
//!
//! `grouplist` decides which rows of an arbitrarily large, grouped,
//! variable-height list need a view, hands views out from a type-keyed
//! recycling pool and keeps every cached measurement consistent while the
//! list is scrolled, resized or edited. It never draws anything: hosts mirror
//! the engine's [`ViewHandle`]s onto real widgets.
//!
//! ```text
//! ListModel ──notifications──▶ ListView ──measure/prepare──▶ ListDelegate
//!                                  │
//!                                  └──▶ ViewHandle records + ListEvent queue
//! ```
//!
//! A minimal host binds a model and a delegate, sets the viewport size and
//! forwards scroll events:
//!
//! ```ignore
//! let view = ListView::new(ListViewConfig::default().with_viewport(320, 480));
//! view.borrow_mut().set_model(Some(model.clone()));
//! view.borrow_mut().set_delegate(Some(Box::new(MyDelegate)));
//! view.borrow_mut().set_scroll_offset(1200);
//! for event in view.borrow_mut().drain_events() { /* ... */ }
//! ```

pub mod collections;
mod config;
mod delegate;
mod error;
mod event;
mod geometry;
mod index;
mod list_view;
mod model;
mod mutation;
mod pending;
mod pool;
mod reflow;
mod selection;
mod transaction;
mod view;
mod viewport;
mod window;

pub use config::ListViewConfig;
pub use delegate::ListDelegate;
pub use error::ModifyError;
pub use event::{ListEvent, PointerButton};
pub use geometry::GeometryCache;
pub use index::{IndexSpace, RowIndex};
pub use list_view::{ListView, SharedListView};
pub use model::{DataSource, ListModel};
pub use pending::PendingMap;
pub use pool::{Acquired, RecycleStats, ViewPool};
pub use selection::SelectionSet;
pub use transaction::{ModifyKind, Transaction};
pub use view::{ViewGeometry, ViewHandle, ViewId, ViewRole, ViewType};
pub use viewport::Viewport;
pub use window::{LoadedRow, LoadedWindow, Span};
