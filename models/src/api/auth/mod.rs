mod change_password;
mod delete_user;
mod list_users;
mod login;
mod password_reset;
mod refresh_token;
mod register_user;
mod update_profile;

pub use self::{
	change_password::*,
	delete_user::*,
	list_users::*,
	login::*,
	password_reset::*,
	refresh_token::*,
	register_user::*,
	update_profile::*,
};
