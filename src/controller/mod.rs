//! Controllers
//!
//! The list/form pair driving every resource view. Both are generic over
//! [`crate::resource::ResourceDef`]; no entity has its own code.

mod form;
mod list;

pub use form::{FormController, FormState, SelectOption};
pub use list::{ListController, LoadState};
