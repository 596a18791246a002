//! Query construction
//!
//! Filters are typed predicates, rendered into SQL text plus an ordered
//! argument list. User-supplied values only ever reach the database as bound
//! parameters; the SQL text is assembled from fixed fragments and
//! placeholders.

pub mod criteria;
pub mod dialect;
pub mod predicate;
pub mod statements;

pub use criteria::QueryCriteria;
pub use dialect::Dialect;
pub use predicate::{BindValue, Column, Predicate, TagFilter, TagMatch};
pub use statements::{find_questions_query, BuiltQuery, SqlWriter};
