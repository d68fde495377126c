//! assetq Query - provider query translation.
//!
//! Users type queries the way they remember them: `ip=1.1.1.1`, or
//! `app=nginx&&port=443`. Providers want the literal syntax with quoted
//! values. [`QueryTranslator`] rewrites a fragment into that syntax without
//! touching keys, operators, or connectives.
//!
//! # Example
//!
//! ```rust
//! use assetq_query::{Dialect, QueryTranslator};
//!
//! let translator = QueryTranslator::new(Dialect::Symbolic);
//! assert_eq!(translator.translate("ip=1.1.1.1"), r#"ip="1.1.1.1""#);
//! assert_eq!(
//!     translator.translate("a=1&&b=2||c=3"),
//!     r#"a="1" && b="2" || c="3""#
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod translator;

pub use translator::{parse, Dialect, Expr, QueryTranslator};
