mod value_table;

pub use value_table::{Entry, Keyspace, ValueTable};
