//! The compiled route table: insertion-ordered `(path, method, pipeline)`
//! triples plus path-template rendering for the hosting router's
//! parameter syntax.

mod table;

pub use table::{ParamStyle, PathSegment, RoutePath, RouteTable, RouteTableEntry};
