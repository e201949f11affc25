pub mod allow_list;
pub mod constants;
pub mod permissions;

pub use allow_list::AllowList;
