//! Vantage Directory - User Directory Search
//!
//! Client-side search over the user directory. The directory source returns
//! every record unfiltered; ranking, structured filtering and pagination all
//! happen here.
//!
//! Key Features:
//! - Two-tier ranking: exact identifier matches before substring matches
//! - Stable ordering within each tier
//! - Role, organization, business unit and active-flag filters
//! - Deterministic, never-failing pagination
//!
//! @version 0.1.0
//! @author Vantage Development Team

pub mod types;
pub mod query;
pub mod matcher;
pub mod page;
pub mod directory;

pub use types::DirectoryRecord;
pub use query::{DirectoryFilters, ListFilters, ListParams, SearchQuery};
pub use matcher::{match_records, MatchResult, MatchTier, RecordMatcher};
pub use page::{paginate, Page};
pub use directory::{Directory, Facets};
