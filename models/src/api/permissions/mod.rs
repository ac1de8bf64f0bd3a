mod my_permissions;
mod update_permissions;

pub use self::{my_permissions::*, update_permissions::*};
