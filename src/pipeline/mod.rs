//! Pipeline stages for transcript verification.
//!
//! Each submodule implements exactly one step, and every step after text
//! extraction is a pure function over `&str` or a course slice.
//!
//! ## Data Flow
//!
//! ```text
//!                       ┌──▶ columns  ──┐
//! input ──▶ text ──▶ normalize          ├──▶ reconcile ──▶ score
//!                       └──▶ patterns ──┘                   ▲
//!                       └──▶ reported ──────────────────────┘
//! ```
//!
//! 1. [`input`]    : classify the path as PDF or UTF-8 text
//! 2. [`text`]     : pdfium text layer, table rows flattened with `" | "`
//! 3. [`normalize`]: line endings, invisible characters, whitespace runs
//! 4. [`columns`]  : column-alignment strategy (grade anchored at line end)
//! 5. [`patterns`] : fixed-template strategy
//! 6. [`reconcile`]: first row per course code wins
//! 7. [`reported`] : the transcript's own credits / EGP / SGPA
//! 8. [`score`]    : aggregates and the tolerance comparison
//!
//! [`validate`] is shared by both strategies and is the only gate a
//! candidate row passes through.

pub mod columns;
pub mod input;
pub mod normalize;
pub mod patterns;
pub mod reconcile;
pub mod reported;
pub mod score;
pub mod text;
pub mod validate;
