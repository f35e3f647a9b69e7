//! Order Splitter Common Library
//!
//! 発注書ページの分類コア。I/Oを持たない純粋な処理のみ:
//! 品番候補の抽出 → キー正規化 → ベンダー索引の照合 → 振り分け判定 → 監査ログ

pub mod anchor;
pub mod audit;
pub mod classify;
pub mod columns;
pub mod error;
pub mod extract;
pub mod index;
pub mod normalize;
pub mod routing;

pub use anchor::{AnchorPattern, AnchorSet};
pub use audit::{AuditLog, LogRecord, LOG_COLUMNS};
pub use classify::{classify, Classifier, Decision, Match, PageDecision, PageRef};
pub use columns::{resolve_columns, ColumnSelection, MappingTable};
pub use error::{Error, Result};
pub use extract::{extract_candidates, Candidate};
pub use index::{ConflictPolicy, IndexOptions, KeyConflict, VendorIndex};
pub use normalize::{normalize_key, NormalizeOptions};
pub use routing::{safe_name, Artifact, Destination, RoutingPlan, RunSummary, MIXED, UNMATCHED};
