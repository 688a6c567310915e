pub mod cards;
pub mod page;
