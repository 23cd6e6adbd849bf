//! Deployment edition and the authority that reports it.
//!
//! # Role
//!
//! Variant selection filters on the running edition when a caller does not
//! say otherwise. The edition comes from an [`EditionAuthority`]; the
//! [`CachedEdition`] authority wraps a possibly remote [`EditionProbe`] with a
//! time-to-live cache.
//!
//! # Invariants
//!
//! - A lookup never fails and never blocks behind a refresh: callers that
//!   lose the refresh race read the previous value.
//!   - Enforced in: [`CachedEdition::current_edition`].
//!   - Tested by: `tests::test_cached_edition_serves_stale_during_refresh`.
//! - A failed probe keeps the previous edition and retries after the retry
//!   interval instead of the refresh interval.
//!   - Enforced in: [`CachedEdition::refresh`].
//!   - Tested by: `tests::test_cached_edition_keeps_value_on_failure`.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use scriptenv_config::{EditionName, EditionSettings};
use tracing::{debug, warn};

/// Deployment flavor. Community sorts below enterprise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Edition {
	Community,
	Enterprise,
}

impl Edition {
	/// Interprets an edition report from the host environment.
	///
	/// `enterprise` and `team` mean enterprise; `community`, `unknown` and an
	/// empty report mean community. Anything else is logged and treated as
	/// community.
	pub fn from_report(report: &str) -> Self {
		let report = report.trim();
		if report.eq_ignore_ascii_case("enterprise") || report.eq_ignore_ascii_case("team") {
			Self::Enterprise
		} else if report.is_empty() || report.eq_ignore_ascii_case("community") || report.eq_ignore_ascii_case("unknown") {
			Self::Community
		} else {
			warn!(edition = report, "unexpected edition report, assuming community");
			Self::Community
		}
	}

	/// Edition named in configuration; `general` has none.
	pub fn from_name(name: EditionName) -> Option<Self> {
		match name {
			EditionName::Community => Some(Self::Community),
			EditionName::Enterprise => Some(Self::Enterprise),
			EditionName::General => None,
		}
	}

	pub fn is_community(self) -> bool {
		self == Self::Community
	}
}

impl fmt::Display for Edition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Community => "community",
			Self::Enterprise => "enterprise",
		})
	}
}

/// Source of the running edition.
pub trait EditionAuthority: Send + Sync {
	fn current_edition(&self) -> Edition;
}

/// Authority with a fixed answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedEdition(pub Edition);

impl Default for FixedEdition {
	fn default() -> Self {
		Self(Edition::Community)
	}
}

impl EditionAuthority for FixedEdition {
	fn current_edition(&self) -> Edition {
		self.0
	}
}

/// Remote or otherwise expensive edition lookup.
pub trait EditionProbe: Send + Sync {
	type Error: fmt::Display;

	/// Returns the raw edition report, e.g. `"enterprise"`.
	fn probe(&self) -> Result<String, Self::Error>;
}

#[derive(Debug)]
struct CacheState {
	edition: Edition,
	/// `None` until the first probe.
	expires_at: Option<Instant>,
}

impl CacheState {
	fn is_fresh(&self, now: Instant) -> bool {
		self.expires_at.is_some_and(|expires_at| now < expires_at)
	}
}

/// Lifetime of a successful probe unless configured otherwise.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
/// Lifetime of a failed probe unless configured otherwise.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// Time-to-live cache in front of an [`EditionProbe`].
pub struct CachedEdition<P> {
	probe: P,
	refresh_interval: Duration,
	retry_interval: Duration,
	state: RwLock<CacheState>,
	refresh: Mutex<()>,
}

impl<P: EditionProbe> CachedEdition<P> {
	/// Cache reporting `initial` until the first successful probe.
	pub fn new(probe: P, initial: Edition) -> Self {
		Self {
			probe,
			refresh_interval: DEFAULT_REFRESH_INTERVAL,
			retry_interval: DEFAULT_RETRY_INTERVAL,
			state: RwLock::new(CacheState {
				edition: initial,
				expires_at: None,
			}),
			refresh: Mutex::new(()),
		}
	}

	/// Cache configured from `[edition]` settings.
	pub fn from_settings(probe: P, settings: &EditionSettings) -> Self {
		let initial = Edition::from_name(settings.default).unwrap_or(Edition::Community);
		Self::new(probe, initial).with_intervals(settings.refresh_interval(), settings.retry_interval())
	}

	pub fn with_intervals(mut self, refresh_interval: Duration, retry_interval: Duration) -> Self {
		self.refresh_interval = refresh_interval;
		self.retry_interval = retry_interval;
		self
	}

	/// Edition currently cached, without refreshing.
	pub fn cached(&self) -> Edition {
		self.state.read().edition
	}

	/// Forces the next lookup to probe.
	pub fn invalidate(&self) {
		self.state.write().expires_at = None;
	}

	fn refresh(&self) -> Edition {
		let previous = self.cached();
		let (edition, ttl) = match self.probe.probe() {
			Ok(report) => (Edition::from_report(&report), self.refresh_interval),
			Err(error) => {
				warn!(%error, %previous, retry_in = ?self.retry_interval, "edition probe failed, keeping previous edition");
				(previous, self.retry_interval)
			}
		};

		let mut state = self.state.write();
		state.edition = edition;
		state.expires_at = Some(Instant::now() + ttl);
		debug!(%edition, ttl = ?ttl, "edition cache refreshed");
		edition
	}
}

impl<P: EditionProbe> EditionAuthority for CachedEdition<P> {
	fn current_edition(&self) -> Edition {
		{
			let state = self.state.read();
			if state.is_fresh(Instant::now()) {
				return state.edition;
			}
		}

		let Some(_guard) = self.refresh.try_lock() else {
			return self.cached();
		};

		// Another caller may have refreshed between the check and the lock.
		{
			let state = self.state.read();
			if state.is_fresh(Instant::now()) {
				return state.edition;
			}
		}
		self.refresh()
	}
}
