//! `antmark` - Annotation persistence for ant-tracking frame sequences
//!
//! # Features
//!
//! - **Markers**: simple and interaction markers with activity and location
//! - **Marker files**: reads all three file generations, writes version 3 atomically
//! - **Frame images**: bounded LRU cache with pluggable loader and background prefetch
//! - **Documents**: open/save round trip with unsaved-change tracking
//!
//! # Example
//!
//! ```rust,no_run
//! use antmark::{Activity, AnnotationDocument, Location, MarkerRecord};
//!
//! fn main() -> antmark::Result<()> {
//!     let mut doc = AnnotationDocument::open("colony-a.csv")?;
//!     doc.store_mut().push(
//!         120,
//!         MarkerRecord::simple(311, 87, Activity::Walking, Location::Edge).with_subject(4),
//!     );
//!     assert!(doc.has_unsaved_changes());
//!     doc.save()?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod frames;
pub mod model;
pub mod prefetch;
pub mod store;

pub use cache::{CacheDiagnostic, CollectingSink, DiagnosticSink, FrameImageCache, FrameLoader, TracingSink};
pub use codec::FileGeneration;
pub use config::Config;
pub use document::AnnotationDocument;
pub use error::{Error, IoOperation, ParseCause, Result};
pub use frames::{FrameDirectory, FrameImage};
pub use model::{
    Activity, AntIdentity, AntKind, Interaction, InteractionKind, LegacyMarkerType, LegacyRecord, Location,
    MarkerKind, MarkerRecord,
};
pub use prefetch::FramePrefetcher;
pub use store::{FrameEdit, FrameRecordStore, SaveStatus, StoreChange};

/// Version of antmark
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
