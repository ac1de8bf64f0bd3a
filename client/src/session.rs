use std::{
	sync::{Arc, Weak},
	time::Duration,
};

use models::api::{
	auth::*,
	permissions::{MyPermissionsPath, MyPermissionsRequest},
	MessageResponse,
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use strum::Display;
use time::OffsetDateTime;
use tokio::{sync::watch, task::JoinHandle};

use crate::prelude::*;

/// A source of the current time. Injected so that idle timeouts can be tested
/// without waiting.
pub trait Clock: Send + Sync + 'static {
	/// The current time
	fn now(&self) -> OffsetDateTime;
}

/// The wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
	/// The time the clock shows
	now: Mutex<OffsetDateTime>,
}

impl ManualClock {
	/// Creates a clock showing `now`
	pub fn new(now: OffsetDateTime) -> Self {
		Self {
			now: Mutex::new(now),
		}
	}

	/// Moves the clock forward
	pub fn advance(&self, duration: Duration) {
		*self.now.lock() += duration;
	}
}

impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.now.lock()
	}
}

/// The state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
	/// Nobody is logged in
	Unauthenticated,
	/// A user is logged in and active
	Authenticated,
	/// The session went idle and its credentials are being cleared
	Expiring,
}

/// The kinds of user interaction that count as activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum InteractionKind {
	/// A pointer button or movement
	Pointer,
	/// A key press
	Key,
	/// Scrolling
	Scroll,
	/// A touch
	Touch,
	/// A command run from the command line
	Command,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum LogoutReason {
	/// The user asked to logout
	Explicit,
	/// The user was inactive for longer than the idle timeout
	IdleTimeout,
	/// The access token could not be refreshed
	RefreshFailed,
}

/// How long sessions may stay idle and how often that is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
	/// The inactivity after which the session is ended
	pub idle_timeout: Duration,
	/// How often the idle watcher checks the session
	pub check_interval: Duration,
}

impl Default for SessionSettings {
	fn default() -> Self {
		ClientConfig::default().into()
	}
}

impl From<ClientConfig> for SessionSettings {
	fn from(config: ClientConfig) -> Self {
		Self {
			idle_timeout: config.idle_timeout(),
			check_interval: config.idle_check_interval(),
		}
	}
}

/// The credentials and user of a live session
#[derive(Debug, Clone)]
struct ActiveSession {
	/// The bearer token for protected requests
	access_token: String,
	/// The token used to get a new access token
	refresh_token: String,
	/// The logged in user
	user: User,
	/// The last time the user did something
	last_activity: OffsetDateTime,
}

impl From<&ActiveSession> for StoredSession {
	fn from(session: &ActiveSession) -> Self {
		StoredSession::LoggedIn {
			access_token: session.access_token.clone(),
			refresh_token: session.refresh_token.clone(),
			user: session.user.clone(),
			last_activity: session.last_activity,
		}
	}
}

/// Everything behind the controller's lock
#[derive(Debug)]
struct Inner {
	/// The state of the session
	state: SessionState,
	/// The live session, present only while authenticated
	session: Option<ActiveSession>,
	/// Bumped every time a session starts or ends, so that responses to
	/// requests made for an older session are ignored
	epoch: u64,
}

/// The single owner of the session. Every change to the tokens, the user or
/// the last activity goes through here, and readers always get a consistent
/// copy.
pub struct SessionController<T> {
	/// The transport to the backend
	transport: T,
	/// Where the session is kept between runs
	store: Arc<dyn SessionStore>,
	/// The source of the current time
	clock: Arc<dyn Clock>,
	/// The idle timeout and check interval
	settings: SessionSettings,
	/// The state of the session
	inner: RwLock<Inner>,
	/// Publishes the reason every time a session ends
	logout_tx: watch::Sender<Option<LogoutReason>>,
}

impl<T> SessionController<T>
where
	T: Transport,
{
	/// Creates a controller with nobody logged in, using the wall clock
	pub fn new(transport: T, store: Arc<dyn SessionStore>, settings: SessionSettings) -> Self {
		Self::with_clock(transport, store, settings, Arc::new(SystemClock))
	}

	/// Creates a controller with nobody logged in
	pub fn with_clock(
		transport: T,
		store: Arc<dyn SessionStore>,
		settings: SessionSettings,
		clock: Arc<dyn Clock>,
	) -> Self {
		let (logout_tx, _) = watch::channel(None);
		Self {
			transport,
			store,
			clock,
			settings,
			inner: RwLock::new(Inner {
				state: SessionState::Unauthenticated,
				session: None,
				epoch: 0,
			}),
			logout_tx,
		}
	}

	/// The transport to the backend
	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// The current time, as seen by the session
	pub fn now(&self) -> OffsetDateTime {
		self.clock.now()
	}

	/// The idle timeout and check interval
	pub fn settings(&self) -> SessionSettings {
		self.settings
	}

	/// The state of the session
	pub fn state(&self) -> SessionState {
		self.inner.read().state
	}

	/// Returns true if a user is logged in
	pub fn is_authenticated(&self) -> bool {
		self.state() == SessionState::Authenticated
	}

	/// The logged in user
	pub fn user(&self) -> Option<User> {
		self.inner
			.read()
			.session
			.as_ref()
			.map(|session| session.user.clone())
	}

	/// The access token of the session
	pub fn access_token(&self) -> Option<String> {
		self.inner
			.read()
			.session
			.as_ref()
			.map(|session| session.access_token.clone())
	}

	/// The last time the user did something
	pub fn last_activity(&self) -> Option<OffsetDateTime> {
		self.inner
			.read()
			.session
			.as_ref()
			.map(|session| session.last_activity)
	}

	/// A receiver that sees the reason every time a session ends. The UI uses
	/// it to go back to the login screen.
	pub fn subscribe(&self) -> watch::Receiver<Option<LogoutReason>> {
		self.logout_tx.subscribe()
	}

	/// Logs in with an email and a password. When `role` is given, accounts of
	/// other roles are refused by the backend. On failure the controller stays
	/// unauthenticated.
	#[instrument(skip(self, password))]
	pub async fn login(
		&self,
		email: &str,
		password: &str,
		role: Option<Role>,
	) -> Result<User, ApiErrorResponse> {
		let email = email.trim();
		if email.is_empty() || password.is_empty() {
			return Err(ApiErrorResponse::validation(
				"Email and password are required",
			));
		}

		let LoginResponse {
			access,
			refresh,
			user,
		} = self
			.transport
			.send(
				ApiRequest::<LoginRequest>::builder()
					.path(LoginPath)
					.query(())
					.body(LoginRequest {
						email: email.to_string(),
						password: password.to_string(),
						role,
					})
					.build(),
				None,
			)
			.await
			.inspect_err(|err| info!("Login failed: {err}"))?;

		let session = ActiveSession {
			access_token: access,
			refresh_token: refresh,
			user: user.clone(),
			last_activity: self.clock.now(),
		};
		self.persist(&StoredSession::from(&session));

		let mut inner = self.inner.write();
		inner.state = SessionState::Authenticated;
		inner.session = Some(session);
		inner.epoch += 1;
		info!("Logged in as `{}`", user.email);

		Ok(user)
	}

	/// Loads the session kept from a previous run. A session that went idle
	/// in the meantime is ended straight away. Returns true if a session was
	/// restored.
	#[instrument(skip(self))]
	pub fn restore(&self) -> Result<bool, StorageError> {
		let StoredSession::LoggedIn {
			access_token,
			refresh_token,
			user,
			last_activity,
		} = self.store.load()?
		else {
			return Ok(false);
		};

		if self.clock.now() - last_activity > self.settings.idle_timeout {
			info!("Stored session of `{}` has gone idle", user.email);
			self.store.clear()?;
			self.logout_tx.send_replace(Some(LogoutReason::IdleTimeout));
			return Ok(false);
		}

		let mut inner = self.inner.write();
		inner.state = SessionState::Authenticated;
		inner.session = Some(ActiveSession {
			access_token,
			refresh_token,
			user,
			last_activity,
		});
		inner.epoch += 1;
		Ok(true)
	}

	/// Marks the user as active. Does nothing without a session.
	pub fn record_activity(&self, kind: InteractionKind) {
		let stored = {
			let mut inner = self.inner.write();
			if inner.state != SessionState::Authenticated {
				return;
			}
			let Some(session) = inner.session.as_mut() else {
				return;
			};
			session.last_activity = self.clock.now();
			StoredSession::from(&*session)
		};
		trace!("Activity recorded: {kind}");
		self.persist(&stored);
	}

	/// Ends the session if the user has been inactive for longer than the
	/// idle timeout. Returns true if the session was ended by this call; a
	/// session is only ever ended once.
	#[instrument(skip(self))]
	pub fn check_idle(&self) -> bool {
		let now = self.clock.now();
		let epoch = {
			let mut inner = self.inner.write();
			let idle = inner.state == SessionState::Authenticated &&
				inner
					.session
					.as_ref()
					.is_some_and(|session| now - session.last_activity > self.settings.idle_timeout);
			if !idle {
				return false;
			}
			inner.state = SessionState::Expiring;
			inner.session = None;
			inner.epoch
		};

		info!("Session has been idle for too long. Logging out");
		self.clear_store();

		let mut inner = self.inner.write();
		if inner.state == SessionState::Expiring && inner.epoch == epoch {
			inner.state = SessionState::Unauthenticated;
			inner.epoch += 1;
		}
		drop(inner);

		self.logout_tx.send_replace(Some(LogoutReason::IdleTimeout));
		true
	}

	/// Starts a task that checks the session for inactivity at every check
	/// interval. The task ends once there is no session left to watch, or
	/// when the controller is dropped.
	pub fn spawn_idle_watcher(self: &Arc<Self>) -> JoinHandle<()> {
		let controller: Weak<Self> = Arc::downgrade(self);
		let period = self.settings.check_interval;

		tokio::spawn(async move {
			let mut interval = tokio::time::interval(period);
			// The first tick completes immediately
			interval.tick().await;
			loop {
				interval.tick().await;
				let Some(controller) = controller.upgrade() else {
					break;
				};
				if controller.check_idle() || !controller.is_authenticated() {
					break;
				}
			}
			debug!("Idle watcher stopped");
		})
	}

	/// Ends the session at the user's request
	#[instrument(skip(self))]
	pub fn logout(&self) {
		self.end_session(LogoutReason::Explicit);
	}

	/// Gets a new access token using the refresh token. A failed refresh
	/// ends the session and is not retried.
	#[instrument(skip(self))]
	pub async fn refresh(&self) -> Result<(), ApiErrorResponse> {
		let (refresh_token, epoch) = {
			let inner = self.inner.read();
			match inner.session.as_ref() {
				Some(session) if inner.state == SessionState::Authenticated => {
					(session.refresh_token.clone(), inner.epoch)
				}
				_ => return Err(ApiErrorResponse::error(ErrorType::NotLoggedIn)),
			}
		};

		let result = self
			.transport
			.send(
				ApiRequest::<RefreshTokenRequest>::builder()
					.path(RefreshTokenPath)
					.query(())
					.body(RefreshTokenRequest {
						refresh: refresh_token,
					})
					.build(),
				None,
			)
			.await;

		match result {
			Ok(RefreshTokenResponse { access, refresh }) => {
				let stored = {
					let mut inner = self.inner.write();
					if inner.epoch != epoch {
						debug!("Session changed while refreshing. Ignoring new token");
						return Ok(());
					}
					let Some(session) = inner.session.as_mut() else {
						return Ok(());
					};
					session.access_token = access;
					if let Some(refresh) = refresh {
						session.refresh_token = refresh;
					}
					StoredSession::from(&*session)
				};
				self.persist(&stored);
				debug!("Access token refreshed");
				Ok(())
			}
			Err(error) => {
				warn!("Unable to refresh the access token: {error}");
				if self.inner.read().epoch == epoch {
					self.end_session(LogoutReason::RefreshFailed);
				}
				Err(error)
			}
		}
	}

	/// Sends a request, attaching the access token when the endpoint needs
	/// one. When the token is rejected, it is refreshed once and the request
	/// is sent again once. If the refresh fails, the session ends.
	pub async fn call<E>(&self, request: ApiRequest<E>) -> Result<E::ResponseBody, ApiErrorResponse>
	where
		E: ApiEndpoint,
	{
		if !E::IS_PROTECTED {
			return self.transport.send(request, None).await;
		}

		let token = self
			.access_token()
			.ok_or_else(|| ApiErrorResponse::error(ErrorType::NotLoggedIn))?;

		match self.transport.send(request.clone(), Some(token)).await {
			Err(error) if *error.error_type() == ErrorType::AuthorizationTokenInvalid => {
				debug!("Access token rejected. Refreshing");
				self.refresh().await?;
				let token = self
					.access_token()
					.ok_or_else(|| ApiErrorResponse::error(ErrorType::NotLoggedIn))?;
				self.transport.send(request, Some(token)).await
			}
			result => result,
		}
	}

	/// Gets the permissions of the logged in user from the backend and keeps
	/// them on the cached user
	#[instrument(skip(self))]
	pub async fn reload_permissions(&self) -> Result<PermissionMatrix, ApiErrorResponse> {
		let epoch = self.inner.read().epoch;
		let permissions = self
			.call(
				ApiRequest::<MyPermissionsRequest>::builder()
					.path(MyPermissionsPath)
					.query(())
					.body(())
					.build(),
			)
			.await?;

		self.update_user(epoch, |user| user.permissions = permissions.clone());
		Ok(permissions)
	}

	/// Resolves the access of the logged in user. A restricted user gets
	/// their permissions from the backend again; an unrestricted one needs no
	/// request at all.
	#[instrument(skip(self))]
	pub async fn reload_access(&self) -> Result<AccessPolicy, ApiErrorResponse> {
		let user = self
			.user()
			.ok_or_else(|| ApiErrorResponse::error(ErrorType::NotLoggedIn))?;
		match user.access_policy() {
			AccessPolicy::Restricted(_) => {
				Ok(AccessPolicy::Restricted(self.reload_permissions().await?))
			}
			unrestricted @ AccessPolicy::Unrestricted => Ok(unrestricted),
		}
	}

	/// Changes the username of the logged in user
	#[instrument(skip(self))]
	pub async fn update_profile(&self, username: &str) -> Result<User, ApiErrorResponse> {
		let username = username.trim();
		if username.is_empty() {
			return Err(ApiErrorResponse::validation("Username cannot be empty"));
		}

		let epoch = self.inner.read().epoch;
		let UpdateProfileResponse { username } = self
			.call(
				ApiRequest::<UpdateProfileRequest>::builder()
					.path(UpdateProfilePath)
					.query(())
					.body(UpdateProfileRequest {
						username: username.to_string(),
					})
					.build(),
			)
			.await?;

		self.update_user(epoch, |user| user.username = username.clone())
			.ok_or_else(|| ApiErrorResponse::error(ErrorType::NotLoggedIn))
	}

	/// Changes the password of the logged in user. The new password has to be
	/// typed twice.
	#[instrument(skip_all)]
	pub async fn change_password(
		&self,
		old_password: &str,
		new_password: &str,
		confirm_password: &str,
	) -> Result<MessageResponse, ApiErrorResponse> {
		check_new_password(new_password, confirm_password)?;
		if old_password.is_empty() {
			return Err(ApiErrorResponse::validation(
				"The current password is required",
			));
		}

		self.call(
			ApiRequest::<ChangePasswordRequest>::builder()
				.path(ChangePasswordPath)
				.query(())
				.body(ChangePasswordRequest {
					old_password: old_password.to_string(),
					new_password: new_password.to_string(),
				})
				.build(),
		)
		.await
	}

	/// Asks the backend to email a one-time password for a password reset
	#[instrument(skip(self))]
	pub async fn request_password_reset(
		&self,
		email: &str,
	) -> Result<MessageResponse, ApiErrorResponse> {
		let email = email.trim();
		if email.is_empty() {
			return Err(ApiErrorResponse::validation("Email is required"));
		}

		self.call(
			ApiRequest::<PasswordResetRequest>::builder()
				.path(PasswordResetPath)
				.query(())
				.body(PasswordResetRequest {
					email: email.to_string(),
				})
				.build(),
		)
		.await
	}

	/// Sets a new password using the one-time password that was emailed
	#[instrument(skip(self, otp, new_password, confirm_password))]
	pub async fn verify_password_reset(
		&self,
		email: &str,
		otp: &str,
		new_password: &str,
		confirm_password: &str,
	) -> Result<MessageResponse, ApiErrorResponse> {
		check_new_password(new_password, confirm_password)?;
		let otp = otp.trim();
		if otp.len() != OTP_LENGTH || !otp.bytes().all(|byte| byte.is_ascii_digit()) {
			return Err(ApiErrorResponse::validation(format!(
				"The code must be {OTP_LENGTH} digits"
			)));
		}

		self.call(
			ApiRequest::<VerifyPasswordResetRequest>::builder()
				.path(VerifyPasswordResetPath)
				.query(())
				.body(VerifyPasswordResetRequest {
					email: email.trim().to_string(),
					otp: otp.to_string(),
					new_password: new_password.to_string(),
				})
				.build(),
		)
		.await
	}

	/// Applies a change to the cached user, unless the session changed since
	/// `epoch`. Returns the updated user.
	fn update_user(&self, epoch: u64, change: impl FnOnce(&mut User)) -> Option<User> {
		let (user, stored) = {
			let mut inner = self.inner.write();
			if inner.epoch != epoch {
				return None;
			}
			let session = inner.session.as_mut()?;
			change(&mut session.user);
			(session.user.clone(), StoredSession::from(&*session))
		};
		self.persist(&stored);
		Some(user)
	}

	/// Drops the session, clears the store and tells the subscribers why
	fn end_session(&self, reason: LogoutReason) {
		let ended = {
			let mut inner = self.inner.write();
			let ended = inner.session.take().is_some();
			inner.state = SessionState::Unauthenticated;
			inner.epoch += 1;
			ended
		};
		self.clear_store();
		if ended {
			info!("Session ended: {reason}");
			self.logout_tx.send_replace(Some(reason));
		}
	}

	/// Writes the session to the store. A session that cannot be stored still
	/// works for this run.
	fn persist(&self, session: &StoredSession) {
		if let Err(err) = self.store.save(session) {
			error!("Unable to store the session: {err}");
		}
	}

	/// Removes the credentials from the store
	fn clear_store(&self) {
		if let Err(err) = self.store.clear() {
			error!("Unable to clear the stored session: {err}");
		}
	}
}

/// The number of digits in a password reset code
pub const OTP_LENGTH: usize = 6;

/// Checks a new password and its confirmation before anything is sent
fn check_new_password(new_password: &str, confirm_password: &str) -> Result<(), ApiErrorResponse> {
	if new_password.is_empty() {
		return Err(ApiErrorResponse::validation("The new password is required"));
	}
	if new_password != confirm_password {
		return Err(ApiErrorResponse::validation("New passwords do not match"));
	}
	Ok(())
}
