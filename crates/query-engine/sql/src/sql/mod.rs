//! Filter, ordering and paging types, and their conversion to parameterized SQL strings.

pub mod ast;
pub mod convert;
pub mod execution_plan;
pub mod helpers;
pub mod string;
