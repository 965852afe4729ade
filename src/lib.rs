//! Package implement ordered map and ordered set using [red-black][wiki-rb]
//! tree.
//!
//! Following types implement ordered collections for single threaded use:
//!
//! * [RbMap] implements an ephemeral ordered-map.
//! * [RbSet] implements an ephemeral ordered-set, on top of [RbMap].
//!
//! Ordered-map
//! -----------
//!
//! - Each entry in RbMap instance correspond to a {Key, Value} pair.
//! - Parametrised over `key-type` and `value-type`, keys are ordered by
//!   their [Ord] implementation.
//! - CRUD operations, via insert(), set(), get(), remove() api.
//! - Full table scan, to iterate over all entries in ascending key order.
//! - Nodes are held in an arena, parent links are plain indices.
//! - Uses ownership model and borrow semantics to ensure safety, an
//!   iterator cannot outlive a mutation of its map.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Constructing a new [RbMap] instance and CRUD operations:
//!
//! ```
//! use rbmap::RbMap;
//!
//! let mut index: RbMap<String,String> = RbMap::new();
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! index.insert("key1".to_string(), "value1".to_string()).unwrap();
//! index.insert("key2".to_string(), "value2".to_string()).unwrap();
//!
//! let n = index.len();
//! assert_eq!(n, 2);
//!
//! let value = index.get("key1").unwrap();
//! assert_eq!(value, "value1");
//! let value = index.get("key2").unwrap();
//! assert_eq!(value, "value2");
//!
//! let old_value = index.remove("key1").unwrap();
//! assert_eq!(old_value, "value1".to_string());
//! ```
//!
//! [wiki-rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(AllocationFailure, nodes.try_reserve(1));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(AllocationFailure, nodes.try_reserve(1), "node {}", n);
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

mod iter;
mod node;
mod rbmap;
mod rbset;

pub use iter::{Iter, Keys, Values};
pub use rbmap::RbMap;
pub use rbset::{RbSet, SetIter};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    /// Tree invariants are broken, reported by `validate()`.
    Fatal(String, String),
    /// Heap could not supply memory for a new node. The map is left
    /// unchanged.
    AllocationFailure(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            AllocationFailure(p, msg) => write!(f, "{} AllocationFailure: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
