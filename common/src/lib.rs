//! SNHA Tools Common Library
//!
//! 各コマンドで共有される名前照合・突き合わせロジック（ホスト非依存）

pub mod error;
pub mod types;
pub mod matcher;
pub mod rating;
pub mod naming;
pub mod sheet_note;
pub mod revision;

pub use error::{Error, Result};
pub use types::{lookup_parameter, ElementId, Named, Parameter, ParameterValue};
pub use matcher::exactly_one;
pub use rating::{format_rating, select_style, RatingCategory, RatingToken};
pub use naming::UniqueNameResolver;
pub use sheet_note::{FamilyTypeRecord, SheetNoteField, SheetNoteFields, SheetNoteSchema};
pub use revision::{reconcile, ParameterMatch, RevisionAction, RevisionMatcher, RevisionRecord};
