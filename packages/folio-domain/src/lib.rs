pub mod filter;
pub mod kind;
pub mod pagination;
pub mod people;
pub mod slug;
pub mod sort;
pub mod validate;

pub use filter::KindFilter;
pub use kind::{Kind, ParseEnumError, PublicationType, TextField};
pub use pagination::{PageMeta, Pagination};
pub use people::Person;
pub use sort::{Direction, SortField, SortKey};
